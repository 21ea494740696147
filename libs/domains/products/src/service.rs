//! Product service: listing, detail and the upload-then-persist creation flow.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum_helpers::{AuditEvent, AuditOutcome, ClientInfo};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::filters::{ListProductsQuery, ProductFilters};
use crate::models::{CreateProductForm, DigitalAsset, PhotoDraft, ProductDraft, VariantDraft};
use crate::repository::ProductRepository;
use crate::storage::{FileStorage, UploadedFile};
use crate::views::{self, ProductListResponse, ProductView};

pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    storage: Arc<dyn FileStorage>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, storage: Arc<dyn FileStorage>) -> Self {
        Self {
            repository: Arc::new(repository),
            storage,
        }
    }

    /// One page of products plus the total match count
    #[instrument(skip(self, query))]
    pub async fn list_products(
        &self,
        query: ListProductsQuery,
        is_admin: bool,
    ) -> ProductResult<ProductListResponse> {
        let filters = ProductFilters::from_query(query, is_admin)?;
        let page = self.repository.find_page(&filters).await?;
        let next_cursor = page.next_cursor(filters.cursor);

        let detailed = self.repository.find_detailed(&page.ids, is_admin).await?;
        let products = detailed
            .iter()
            .map(views::to_list_item)
            .collect::<ProductResult<Vec<_>>>()?;

        Ok(ProductListResponse {
            products,
            next_cursor,
            count: page.total,
        })
    }

    /// Full view; inactive products are invisible to non-admins
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid, is_admin: bool) -> ProductResult<ProductView> {
        let detailed = self
            .repository
            .find_detailed(&[id], is_admin)
            .await?
            .into_iter()
            .next()
            .filter(|d| is_admin || d.product.active)
            .ok_or(ProductError::NotFound(id))?;

        views::to_product_view(&detailed, is_admin)
    }

    /// Validate the form against the received files, upload everything, then
    /// persist the product graph in one transaction.
    ///
    /// Files uploaded for a request that ends in an error are deleted again.
    #[instrument(skip(self, form, files, client), fields(title = %form.title, files = files.len()))]
    pub async fn create_product(
        &self,
        form: CreateProductForm,
        files: HashMap<String, UploadedFile>,
        actor: &str,
        client: &ClientInfo,
    ) -> ProductResult<Uuid> {
        validate_form(&form, &files)?;

        let mut uploaded = Vec::new();
        let result = self.upload_and_persist(form, &files, &mut uploaded).await;

        match &result {
            Ok(product_id) => {
                info!(product_id = %product_id, uploads = uploaded.len(), "Product created");
                AuditEvent::new(
                    Some(actor.to_string()),
                    "product.create",
                    Some(format!("product:{}", product_id)),
                    AuditOutcome::Success,
                )
                .with_client(client)
                .with_details(json!({ "files": uploaded.len() }))
                .log();
            }
            Err(e) => {
                warn!(error = %e, uploads = uploaded.len(), "Product creation failed, removing uploads");
                self.discard_uploads(&uploaded).await;
                AuditEvent::new(
                    Some(actor.to_string()),
                    "product.create",
                    None,
                    AuditOutcome::Failure,
                )
                .with_client(client)
                .with_details(json!({ "error": e.to_string() }))
                .log();
            }
        }

        result
    }

    async fn upload_and_persist(
        &self,
        form: CreateProductForm,
        files: &HashMap<String, UploadedFile>,
        uploaded: &mut Vec<String>,
    ) -> ProductResult<Uuid> {
        let featured_file = file_for(files, &form.featured_image_id)?;
        let thumbnail_url = self.storage.create_thumbnail(featured_file).await?;
        uploaded.push(thumbnail_url.clone());

        let mut variants = Vec::with_capacity(form.variants.len());
        for variant in form.variants {
            let digital_asset = match &variant.digital_asset {
                Some(key) => {
                    let file = file_for(files, key)?;
                    let size = i32::try_from(file.size()).map_err(|_| {
                        ProductError::Validation(format!("Digital asset '{}' is too large", key))
                    })?;
                    let url = self.storage.upload_file(file).await?;
                    uploaded.push(url.clone());
                    Some(DigitalAsset {
                        file_name: file.file_name.clone(),
                        size,
                        url,
                    })
                }
                None => None,
            };

            let mut photos = Vec::with_capacity(variant.photos.len());
            for photo in variant.photos {
                let url = self.storage.upload_file(file_for(files, &photo.id)?).await?;
                uploaded.push(url.clone());
                photos.push(PhotoDraft {
                    temp_id: photo.id,
                    url,
                    sort_order: photo.sort_order,
                });
            }

            variants.push(VariantDraft {
                title: variant.title,
                price: variant.price,
                sort_order: variant.sort_order,
                metadata: variant.metadata,
                active: variant.active,
                digital_asset,
                photos,
            });
        }

        let draft = ProductDraft {
            product_type: form.product_type,
            title: form.title,
            description: form.description,
            thumbnail_url,
            tags: form.tags,
            metadata: form.metadata,
            active: form.active,
            featured_image_id: form.featured_image_id,
            variants,
        };

        self.repository.create(draft).await
    }

    async fn discard_uploads(&self, urls: &[String]) {
        for url in urls {
            if let Err(e) = self.storage.delete_file(url).await {
                warn!(url = %url, error = %e, "Failed to delete orphaned upload");
            }
        }
    }
}

fn file_for<'a>(files: &'a HashMap<String, UploadedFile>, key: &str) -> ProductResult<&'a UploadedFile> {
    files
        .get(key)
        .ok_or_else(|| ProductError::Validation(format!("Missing file for '{}'", key)))
}

/// Structural checks that need the file set, run before anything is uploaded
fn validate_form(form: &CreateProductForm, files: &HashMap<String, UploadedFile>) -> ProductResult<()> {
    form.validate()
        .map_err(|e| ProductError::Validation(e.to_string()))?;

    let mut referenced = HashSet::new();
    let mut photo_ids = HashSet::new();

    for variant in &form.variants {
        for photo in &variant.photos {
            if !referenced.insert(photo.id.as_str()) {
                return Err(ProductError::Validation(format!(
                    "Duplicate temporary id '{}'",
                    photo.id
                )));
            }
            photo_ids.insert(photo.id.as_str());
        }
        if let Some(key) = variant.digital_asset.as_deref() {
            if !referenced.insert(key) {
                return Err(ProductError::Validation(format!(
                    "Duplicate temporary id '{}'",
                    key
                )));
            }
        }
    }

    if !photo_ids.contains(form.featured_image_id.as_str()) {
        return Err(ProductError::Validation(format!(
            "featuredImageId '{}' does not match any photo",
            form.featured_image_id
        )));
    }

    if let Some(missing) = referenced.iter().find(|key| !files.contains_key(**key)) {
        return Err(ProductError::Validation(format!("Missing file for '{}'", missing)));
    }

    let mut unknown: Vec<&str> = files
        .keys()
        .map(String::as_str)
        .filter(|key| !referenced.contains(key))
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(ProductError::Validation(format!(
            "Unexpected file parts: {}",
            unknown.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DetailedProduct, DetailedVariant, Product, ProductType, ProductVariant, VariantPhoto,
    };
    use crate::pagination::ProductPage;
    use crate::repository::MockProductRepository;
    use crate::storage::{MockFileStorage, StorageError};
    use bytes::Bytes;
    use chrono::Utc;

    fn detailed(active: bool) -> DetailedProduct {
        let now = Utc::now();
        let product_id = Uuid::new_v4();
        let variant_id = Uuid::new_v4();
        let photo_id = Uuid::new_v4();

        DetailedProduct {
            product: Product {
                id: product_id,
                title: "Gold foil invitation".into(),
                description: "Letterpress".into(),
                thumbnail_url: "https://cdn/thumb.jpg".into(),
                product_type: ProductType::WeddingInvitation,
                active,
                tags: vec!["gold".into()],
                metadata: json!({}),
                featured_photo_id: Some(photo_id),
                created_at: now,
                updated_at: now,
            },
            variants: vec![DetailedVariant {
                variant: ProductVariant {
                    id: variant_id,
                    product_id,
                    title: "50 pcs".into(),
                    price: 4900,
                    digital_asset: None,
                    active: true,
                    sort_order: 0,
                    metadata: json!({}),
                    created_at: now,
                    updated_at: now,
                },
                photos: vec![VariantPhoto {
                    id: photo_id,
                    variant_id,
                    url: "https://cdn/photo.jpg".into(),
                    sort_order: 0,
                    created_at: now,
                }],
            }],
        }
    }

    fn form() -> CreateProductForm {
        serde_json::from_value(json!({
            "type": "WEDDING_INVITATION",
            "title": "Gold foil invitation",
            "description": "Letterpress",
            "tags": ["gold"],
            "featuredImageId": "front",
            "variants": [
                {
                    "title": "50 pcs",
                    "price": 4900,
                    "digitalAsset": "template",
                    "photos": [{ "id": "front" }, { "id": "back", "sortOrder": 1 }]
                },
                {
                    "title": "100 pcs",
                    "price": 8900,
                    "sortOrder": 1,
                    "photos": [{ "id": "stack" }]
                }
            ]
        }))
        .unwrap()
    }

    fn file(name: &str) -> UploadedFile {
        UploadedFile::new(name, Some("image/png"), Bytes::from_static(b"bytes"))
    }

    fn files(keys: &[&str]) -> HashMap<String, UploadedFile> {
        keys.iter()
            .map(|k| (k.to_string(), file(&format!("{}.png", k))))
            .collect()
    }

    fn all_files() -> HashMap<String, UploadedFile> {
        files(&["front", "back", "stack", "template"])
    }

    fn uploading_storage() -> MockFileStorage {
        let mut storage = MockFileStorage::new();
        storage
            .expect_create_thumbnail()
            .returning(|f| Ok(format!("https://cdn/thumbnails/{}", f.file_name)));
        storage
            .expect_upload_file()
            .returning(|f| Ok(format!("https://cdn/uploads/{}", f.file_name)));
        storage
    }

    #[tokio::test]
    async fn test_list_products_maps_page() {
        let first = detailed(true);
        let second = detailed(true);
        let ids = vec![first.product.id, second.product.id];

        let mut repo = MockProductRepository::new();
        let page_ids = ids.clone();
        repo.expect_find_page()
            .withf(|f| f.cursor == 0 && f.limit == 2 && !f.is_admin)
            .returning(move |_| {
                Ok(ProductPage {
                    ids: page_ids.clone(),
                    total: 5,
                })
            });
        let expected = ids.clone();
        repo.expect_find_detailed()
            .withf(move |ids, is_admin| ids == expected.as_slice() && !*is_admin)
            .returning(move |_, _| Ok(vec![first.clone(), second.clone()]));

        let service = ProductService::new(repo, Arc::new(MockFileStorage::new()));
        let query = ListProductsQuery {
            product_type: Some("WEDDING_INVITATION".into()),
            limit: Some("2".into()),
            ..Default::default()
        };
        let response = service.list_products(query, false).await.unwrap();

        assert_eq!(response.count, 5);
        assert_eq!(response.next_cursor, Some(2));
        assert_eq!(
            response.products.iter().map(|p| p.id).collect::<Vec<_>>(),
            ids
        );
        assert_eq!(response.products[0].price, 4900);
    }

    #[tokio::test]
    async fn test_list_products_rejects_bad_filters_before_querying() {
        let repo = MockProductRepository::new();
        let service = ProductService::new(repo, Arc::new(MockFileStorage::new()));

        let query = ListProductsQuery {
            product_type: Some("WEDDING_INVITATION".into()),
            min_price: Some("-5".into()),
            ..Default::default()
        };
        let err = service.list_products(query, false).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_products_surfaces_integrity_errors() {
        let mut broken = detailed(true);
        broken.product.featured_photo_id = None;
        let id = broken.product.id;

        let mut repo = MockProductRepository::new();
        repo.expect_find_page().returning(move |_| {
            Ok(ProductPage {
                ids: vec![id],
                total: 1,
            })
        });
        repo.expect_find_detailed()
            .returning(move |_, _| Ok(vec![broken.clone()]));

        let service = ProductService::new(repo, Arc::new(MockFileStorage::new()));
        let err = service
            .list_products(ListProductsQuery::default(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::DataIntegrity { .. }));
    }

    #[tokio::test]
    async fn test_get_inactive_product() {
        let hidden = detailed(false);
        let id = hidden.product.id;

        let mut repo = MockProductRepository::new();
        repo.expect_find_detailed()
            .returning(move |_, _| Ok(vec![hidden.clone()]));
        let service = ProductService::new(repo, Arc::new(MockFileStorage::new()));

        let err = service.get_product(id, false).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(missing) if missing == id));

        let view = service.get_product(id, true).await.unwrap();
        assert_eq!(view.id, id);
        assert_eq!(view.active, Some(false));
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_detailed().returning(|_, _| Ok(vec![]));
        let service = ProductService::new(repo, Arc::new(MockFileStorage::new()));

        let id = Uuid::new_v4();
        assert!(matches!(
            service.get_product(id, true).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_product_uploads_then_persists() {
        let product_id = Uuid::new_v4();
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .withf(|draft: &ProductDraft| {
                draft.thumbnail_url == "https://cdn/thumbnails/front.png"
                    && draft.featured_image_id == "front"
                    && draft.variants.len() == 2
                    && draft.variants[0].photos.len() == 2
                    && draft.variants[0].photos[1].url == "https://cdn/uploads/back.png"
                    && draft.variants[0]
                        .digital_asset
                        .as_ref()
                        .is_some_and(|a| a.file_name == "template.png" && a.size == 5)
                    && draft.variants[1].digital_asset.is_none()
            })
            .times(1)
            .returning(move |_| Ok(product_id));

        let mut storage = uploading_storage();
        storage.expect_delete_file().never();

        let service = ProductService::new(repo, Arc::new(storage));
        let created = service
            .create_product(form(), all_files(), "admin@shop.test", &ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(created, product_id);
    }

    #[tokio::test]
    async fn test_failed_transaction_deletes_every_upload() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .returning(|_| Err(ProductError::Database("violates foreign key".into())));

        let mut storage = uploading_storage();
        // thumbnail + template + three photos
        storage.expect_delete_file().times(5).returning(|_| Ok(()));

        let service = ProductService::new(repo, Arc::new(storage));
        let err = service
            .create_product(form(), all_files(), "admin@shop.test", &ClientInfo::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Database(_)));
    }

    #[tokio::test]
    async fn test_cleanup_failures_do_not_mask_the_error() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let mut storage = MockFileStorage::new();
        storage
            .expect_create_thumbnail()
            .returning(|_| Ok("https://cdn/thumbnails/front.jpg".into()));
        storage
            .expect_upload_file()
            .returning(|_| Err(StorageError::Upload("bucket unavailable".into())));
        storage
            .expect_delete_file()
            .withf(|url| url == "https://cdn/thumbnails/front.jpg")
            .times(1)
            .returning(|_| Err(StorageError::Delete("still unavailable".into())));

        let service = ProductService::new(repo, Arc::new(storage));
        let err = service
            .create_product(form(), all_files(), "admin@shop.test", &ClientInfo::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Storage(StorageError::Upload(_))));
    }

    #[tokio::test]
    async fn test_invalid_featured_image_fails_before_upload() {
        let mut storage = MockFileStorage::new();
        storage.expect_create_thumbnail().never();
        storage.expect_upload_file().never();

        let service = ProductService::new(MockProductRepository::new(), Arc::new(storage));
        let mut form = form();
        form.featured_image_id = "nope".into();

        let err = service
            .create_product(form, all_files(), "admin@shop.test", &ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(msg) if msg.contains("featuredImageId")));
    }

    #[test]
    fn test_validate_form_file_set() {
        assert!(validate_form(&form(), &all_files()).is_ok());

        let missing = validate_form(&form(), &files(&["front", "back", "stack"])).unwrap_err();
        assert!(matches!(missing, ProductError::Validation(msg) if msg.contains("template")));

        let mut extra = all_files();
        extra.insert("stray".into(), file("stray.png"));
        let unknown = validate_form(&form(), &extra).unwrap_err();
        assert!(matches!(unknown, ProductError::Validation(msg) if msg.contains("stray")));
    }

    #[test]
    fn test_validate_form_duplicate_temp_ids() {
        let mut form = form();
        form.variants[1].photos[0].id = "front".into();
        let err = validate_form(&form, &all_files()).unwrap_err();
        assert!(matches!(err, ProductError::Validation(msg) if msg.contains("Duplicate")));

        let mut form = self::form();
        form.variants[0].digital_asset = Some("back".into());
        let err = validate_form(&form, &files(&["front", "back", "stack"])).unwrap_err();
        assert!(matches!(err, ProductError::Validation(msg) if msg.contains("Duplicate")));
    }

    #[test]
    fn test_validate_form_runs_field_rules() {
        let mut form = form();
        form.variants[0].price = -100;
        let err = validate_form(&form, &all_files()).unwrap_err();
        assert!(matches!(err, ProductError::Validation(msg) if msg.contains("negative")));
    }
}
