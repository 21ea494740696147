use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    assembler::{assemble, variant_ids},
    entity::{asset_references, product_variants, products, variant_photos},
    error::ProductResult,
    filters::ProductFilters,
    models::{AssetEntityType, DetailedProduct, Product, ProductDraft, ProductVariant, VariantPhoto},
    pagination::{MatchedRow, ProductPage},
    query::compile_page_query,
    repository::ProductRepository,
};

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_page(&self, filters: &ProductFilters) -> ProductResult<ProductPage> {
        let statement = compile_page_query(filters).into_statement();
        let rows = MatchedRow::find_by_statement(statement)
            .all(&self.db)
            .await?;

        Ok(ProductPage::from_rows(rows))
    }

    async fn find_detailed(
        &self,
        ids: &[Uuid],
        is_admin: bool,
    ) -> ProductResult<Vec<DetailedProduct>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut product_query =
            products::Entity::find().filter(products::Column::Id.is_in(ids.iter().copied()));
        if !is_admin {
            product_query = product_query.filter(products::Column::IsActive.eq(true));
        }
        let found: Vec<Product> = product_query
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let mut variant_query = product_variants::Entity::find()
            .filter(product_variants::Column::ProductId.is_in(ids.iter().copied()));
        if !is_admin {
            variant_query = variant_query.filter(product_variants::Column::IsActive.eq(true));
        }
        let variants: Vec<ProductVariant> = variant_query
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let owner_ids = variant_ids(&variants);
        let photos: Vec<VariantPhoto> = if owner_ids.is_empty() {
            Vec::new()
        } else {
            variant_photos::Entity::find()
                .filter(variant_photos::Column::VariantId.is_in(owner_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(Into::into)
                .collect()
        };

        Ok(assemble(ids, found, variants, photos))
    }

    async fn create(&self, draft: ProductDraft) -> ProductResult<Uuid> {
        let txn = self.db.begin().await?;

        // featured_photo_id stays NULL until the photo rows exist
        let product = products::ActiveModel {
            title: Set(draft.title),
            description: Set(draft.description),
            thumbnail_url: Set(draft.thumbnail_url.clone()),
            featured_photo_id: Set(None),
            is_active: Set(draft.active),
            metadata: Set(draft.metadata),
            tags: Set(draft.tags),
            product_type: Set(draft.product_type),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let product_id = product.id;

        asset_references::ActiveModel::record(
            draft.thumbnail_url,
            AssetEntityType::ProductThumbnail,
            product_id,
        )
        .insert(&txn)
        .await?;

        let featured_id = Uuid::new_v4();
        let variant_count = draft.variants.len();

        for vd in draft.variants {
            let (file_name, size, url) = match vd.digital_asset {
                Some(asset) => (Some(asset.file_name), Some(asset.size), Some(asset.url)),
                None => (None, None, None),
            };

            let variant = product_variants::ActiveModel {
                product_id: Set(product_id),
                title: Set(vd.title),
                price: Set(vd.price),
                digital_asset_file_name: Set(file_name),
                digital_asset_size: Set(size),
                digital_asset_url: Set(url.clone()),
                is_active: Set(vd.active),
                metadata: Set(vd.metadata),
                sort_order: Set(vd.sort_order),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            if let Some(url) = url {
                asset_references::ActiveModel::record(url, AssetEntityType::DigitalAsset, variant.id)
                    .insert(&txn)
                    .await?;
            }

            if vd.photos.is_empty() {
                continue;
            }

            let photo_rows = vd.photos.iter().map(|photo| variant_photos::ActiveModel {
                id: Set(if photo.temp_id == draft.featured_image_id {
                    featured_id
                } else {
                    Uuid::new_v4()
                }),
                variant_id: Set(variant.id),
                url: Set(photo.url.clone()),
                sort_order: Set(photo.sort_order),
                ..Default::default()
            });
            variant_photos::Entity::insert_many(photo_rows)
                .exec(&txn)
                .await?;

            let photo_refs = vd.photos.iter().map(|photo| {
                asset_references::ActiveModel::record(
                    photo.url.clone(),
                    AssetEntityType::VariantPhoto,
                    variant.id,
                )
            });
            asset_references::Entity::insert_many(photo_refs)
                .exec(&txn)
                .await?;
        }

        products::ActiveModel {
            id: Set(product_id),
            featured_photo_id: Set(Some(featured_id)),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            product_id = %product_id,
            featured_photo_id = %featured_id,
            variants = variant_count,
            "Created product"
        );
        Ok(product_id)
    }
}
