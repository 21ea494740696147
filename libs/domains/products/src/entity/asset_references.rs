use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::AssetEntityType;

/// Write-only ledger of uploaded files and the row each one is attached to.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "asset_references")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub entity_type: AssetEntityType,
    pub entity_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn record(url: impl Into<String>, entity_type: AssetEntityType, entity_id: Uuid) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            url: Set(url.into()),
            entity_type: Set(entity_type),
            entity_id: Set(entity_id),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
