use sea_orm::entity::prelude::*;

use crate::models::VariantPhoto;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "variant_photos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub variant_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub sort_order: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for VariantPhoto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            variant_id: model.variant_id,
            url: model.url,
            sort_order: model.sort_order,
            created_at: model.created_at.into(),
        }
    }
}
