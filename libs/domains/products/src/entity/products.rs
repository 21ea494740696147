use sea_orm::entity::prelude::*;

use crate::models::{Product, ProductType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub thumbnail_url: String,
    pub featured_photo_id: Option<Uuid>,
    pub is_active: bool,
    pub metadata: Json,
    pub tags: Vec<String>,
    #[sea_orm(column_name = "type")]
    pub product_type: ProductType,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            thumbnail_url: model.thumbnail_url,
            product_type: model.product_type,
            active: model.is_active,
            tags: model.tags,
            metadata: model.metadata,
            featured_photo_id: model.featured_photo_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
