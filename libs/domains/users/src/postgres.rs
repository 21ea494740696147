use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

use crate::entity;
use crate::error::{UserError, UserResult};
use crate::models::{LoginRecord, NewUser, User};
use crate::repository::UserRepository;

#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let found = entity::Entity::find_by_id(email.to_string())
            .one(&self.db)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn create(&self, user: NewUser) -> UserResult<User> {
        let model = entity::ActiveModel {
            email: Set(user.email),
            name: Set(user.name),
            picture: Set(user.picture),
            google_id: Set(user.google_id),
            is_admin: Set(false),
            is_deleted: Set(false),
            last_login: Set(Utc::now().into()),
            last_ip: Set(user.login.ip),
            last_user_agent: Set(user.login.user_agent),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let created = model.insert(&self.db).await?;
        tracing::info!(email = %created.email, "Created user");
        Ok(created.into())
    }

    async fn record_login(&self, email: &str, login: &LoginRecord) -> UserResult<User> {
        let model = entity::ActiveModel {
            email: Set(email.to_string()),
            last_login: Set(Utc::now().into()),
            last_ip: Set(login.ip.clone()),
            last_user_agent: Set(login.user_agent.clone()),
            ..Default::default()
        };

        match model.update(&self.db).await {
            Ok(updated) => Ok(updated.into()),
            Err(sea_orm::DbErr::RecordNotUpdated | sea_orm::DbErr::RecordNotFound(_)) => {
                Err(UserError::NotFound(email.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
