use sea_orm::entity::prelude::*;

use crate::models::{DigitalAsset, ProductVariant};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_variants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    pub price: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub digital_asset_file_name: Option<String>,
    pub digital_asset_size: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub digital_asset_url: Option<String>,
    pub is_active: bool,
    pub metadata: Json,
    pub sort_order: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductVariant {
    fn from(model: Model) -> Self {
        // The three asset columns are written together
        let digital_asset = match (model.digital_asset_url, model.digital_asset_file_name) {
            (Some(url), Some(file_name)) => Some(DigitalAsset {
                file_name,
                size: model.digital_asset_size.unwrap_or_default(),
                url,
            }),
            _ => None,
        };

        Self {
            id: model.id,
            product_id: model.product_id,
            title: model.title,
            price: model.price,
            digital_asset,
            active: model.is_active,
            sort_order: model.sort_order,
            metadata: model.metadata,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
