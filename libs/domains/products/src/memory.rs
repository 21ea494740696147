//! In-process [`ProductRepository`] with the same filtering, ordering and
//! visibility rules as the Postgres implementation. Backs handler tests and
//! local runs without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::assembler::assemble;
use crate::error::{ProductError, ProductResult};
use crate::filters::{ProductFilters, SortBy, SortOrder};
use crate::models::{
    AssetEntityType, DetailedProduct, Product, ProductDraft, ProductVariant, VariantPhoto,
};
use crate::pagination::ProductPage;
use crate::repository::ProductRepository;

/// A recorded asset reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub url: String,
    pub entity_type: AssetEntityType,
    pub entity_id: Uuid,
}

#[derive(Default)]
struct Store {
    products: Vec<Product>,
    variants: Vec<ProductVariant>,
    photos: Vec<VariantPhoto>,
    assets: Vec<AssetRecord>,
}

/// Clones share the same store
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an already-assembled product graph as-is.
    pub async fn insert(&self, detailed: DetailedProduct) {
        let mut store = self.store.write().await;
        for dv in detailed.variants {
            store.photos.extend(dv.photos);
            store.variants.push(dv.variant);
        }
        store.products.push(detailed.product);
    }

    pub async fn asset_references(&self) -> Vec<AssetRecord> {
        self.store.read().await.assets.clone()
    }

    pub async fn product_count(&self) -> usize {
        self.store.read().await.products.len()
    }
}

impl Store {
    fn featured_price(&self, product: &Product, is_admin: bool) -> Option<i32> {
        let featured = product.featured_photo_id?;
        let photo = self.photos.iter().find(|p| p.id == featured)?;
        self.variants
            .iter()
            .find(|v| v.id == photo.variant_id && v.product_id == product.id)
            .filter(|v| is_admin || v.active)
            .map(|v| v.price)
    }

    fn matches(&self, product: &Product, filters: &ProductFilters) -> bool {
        let visible = if filters.is_admin {
            filters.active.is_none_or(|a| product.active == a)
        } else {
            product.active
        };
        let typed = filters.product_type.is_none_or(|t| product.product_type == t);
        let searched = filters.search.as_deref().is_none_or(|q| {
            contains_ci(&product.title, q) || contains_ci(&product.description, q)
        });
        let titled = filters
            .title_search
            .as_deref()
            .is_none_or(|q| contains_ci(&product.title, q));
        let tagged =
            filters.tags.is_empty() || filters.tags.iter().any(|t| product.tags.contains(t));
        let dated = filters.created_after.is_none_or(|d| product.created_at >= d)
            && filters.created_before.is_none_or(|d| product.created_at <= d)
            && filters.updated_after.is_none_or(|d| product.updated_at >= d)
            && filters.updated_before.is_none_or(|d| product.updated_at <= d);

        visible && typed && searched && titled && tagged && dated
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn compare(a: &(Product, Option<i32>), b: &(Product, Option<i32>), sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Price => a.1.cmp(&b.1),
        SortBy::CreatedAt => a.0.created_at.cmp(&b.0.created_at),
        SortBy::UpdatedAt => a.0.updated_at.cmp(&b.0.updated_at),
        // Case-folded first, closer to a database collation than byte order
        SortBy::Title => a
            .0
            .title
            .to_lowercase()
            .cmp(&b.0.title.to_lowercase())
            .then_with(|| a.0.title.cmp(&b.0.title)),
        SortBy::Active => a.0.active.cmp(&b.0.active),
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_page(&self, filters: &ProductFilters) -> ProductResult<ProductPage> {
        let store = self.store.read().await;
        let join = filters.needs_featured_price();

        let mut matched: Vec<(Product, Option<i32>)> = store
            .products
            .iter()
            .filter(|p| store.matches(p, filters))
            .map(|p| (p.clone(), store.featured_price(p, filters.is_admin)))
            // Inner join: no featured price, no row
            .filter(|(_, price)| !join || price.is_some())
            .filter(|(_, price)| {
                filters.min_price.is_none_or(|min| price.is_some_and(|p| p >= min))
                    && filters.max_price.is_none_or(|max| price.is_some_and(|p| p <= max))
            })
            .collect();

        matched.sort_by(|a, b| {
            let primary = compare(a, b, filters.sort_by);
            let primary = match filters.sort_order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            primary.then_with(|| a.0.id.cmp(&b.0.id))
        });

        let ids: Vec<Uuid> = matched
            .iter()
            .skip(usize::try_from(filters.cursor).unwrap_or(usize::MAX))
            .take(usize::try_from(filters.limit).unwrap_or(usize::MAX))
            .map(|(p, _)| p.id)
            .collect();

        // Mirrors the window count: no rows, no total
        let total = if ids.is_empty() { 0 } else { matched.len() as u64 };

        Ok(ProductPage { ids, total })
    }

    async fn find_detailed(
        &self,
        ids: &[Uuid],
        is_admin: bool,
    ) -> ProductResult<Vec<DetailedProduct>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let store = self.store.read().await;
        let products: Vec<Product> = store
            .products
            .iter()
            .filter(|p| ids.contains(&p.id) && (is_admin || p.active))
            .cloned()
            .collect();
        let variants: Vec<ProductVariant> = store
            .variants
            .iter()
            .filter(|v| ids.contains(&v.product_id) && (is_admin || v.active))
            .cloned()
            .collect();
        let photos: Vec<VariantPhoto> = store
            .photos
            .iter()
            .filter(|ph| variants.iter().any(|v| v.id == ph.variant_id))
            .cloned()
            .collect();

        Ok(assemble(ids, products, variants, photos))
    }

    async fn create(&self, draft: ProductDraft) -> ProductResult<Uuid> {
        // Build everything first so a failure leaves the store untouched
        let now = Utc::now();
        let product_id = Uuid::new_v4();
        let featured_id = Uuid::new_v4();

        let mut variants = Vec::new();
        let mut photos = Vec::new();
        let mut assets = vec![AssetRecord {
            url: draft.thumbnail_url.clone(),
            entity_type: AssetEntityType::ProductThumbnail,
            entity_id: product_id,
        }];

        for vd in &draft.variants {
            let variant_id = Uuid::new_v4();
            if let Some(asset) = &vd.digital_asset {
                assets.push(AssetRecord {
                    url: asset.url.clone(),
                    entity_type: AssetEntityType::DigitalAsset,
                    entity_id: variant_id,
                });
            }
            for pd in &vd.photos {
                let id = if pd.temp_id == draft.featured_image_id {
                    featured_id
                } else {
                    Uuid::new_v4()
                };
                photos.push(VariantPhoto {
                    id,
                    variant_id,
                    url: pd.url.clone(),
                    sort_order: pd.sort_order,
                    created_at: now,
                });
                assets.push(AssetRecord {
                    url: pd.url.clone(),
                    entity_type: AssetEntityType::VariantPhoto,
                    entity_id: variant_id,
                });
            }
            variants.push(ProductVariant {
                id: variant_id,
                product_id,
                title: vd.title.clone(),
                price: vd.price,
                digital_asset: vd.digital_asset.clone(),
                active: vd.active,
                sort_order: vd.sort_order,
                metadata: vd.metadata.clone(),
                created_at: now,
                updated_at: now,
            });
        }

        // Same outcomes as the table constraints
        match photos.iter().filter(|p| p.id == featured_id).count() {
            0 => {
                return Err(ProductError::Database(
                    "insert or update on table \"products\" violates foreign key constraint \
                     \"fk_products_featured_photo_id\""
                        .to_string(),
                ));
            }
            1 => {}
            _ => {
                return Err(ProductError::Database(
                    "duplicate key value violates unique constraint \"variant_photos_pkey\""
                        .to_string(),
                ));
            }
        }

        let mut store = self.store.write().await;
        store.products.push(Product {
            id: product_id,
            title: draft.title,
            description: draft.description,
            thumbnail_url: draft.thumbnail_url,
            product_type: draft.product_type,
            active: draft.active,
            tags: draft.tags,
            metadata: draft.metadata,
            featured_photo_id: Some(featured_id),
            created_at: now,
            updated_at: now,
        });
        store.variants.extend(variants);
        store.photos.extend(photos);
        store.assets.extend(assets);

        Ok(product_id)
    }
}
