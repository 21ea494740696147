use sea_orm::entity::prelude::*;

use crate::models::User;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub picture: String,
    #[sea_orm(column_type = "Text")]
    pub google_id: String,
    pub is_admin: bool,
    pub is_deleted: bool,
    pub last_login: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_ip: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_user_agent: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            email: model.email,
            name: model.name,
            picture: model.picture,
            google_id: model.google_id,
            is_admin: model.is_admin,
            is_deleted: model.is_deleted,
            last_login: model.last_login.into(),
            last_ip: model.last_ip,
            last_user_agent: model.last_user_agent,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
