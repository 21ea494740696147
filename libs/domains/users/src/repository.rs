use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{LoginRecord, NewUser, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Insert a non-admin account for a first sign-in
    async fn create(&self, user: NewUser) -> UserResult<User>;

    /// Stamp `last_login`, `last_ip` and `last_user_agent`
    async fn record_login(&self, email: &str, login: &LoginRecord) -> UserResult<User>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account as-is, e.g. an admin
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.email.clone(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create(&self, user: NewUser) -> UserResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(UserError::Database(format!(
                "duplicate key value violates unique constraint \"users_pkey\" ({})",
                user.email
            )));
        }

        let now = Utc::now();
        let created = User {
            email: user.email,
            name: user.name,
            picture: user.picture,
            google_id: user.google_id,
            is_admin: false,
            is_deleted: false,
            last_login: now,
            last_ip: user.login.ip,
            last_user_agent: user.login.user_agent,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.email.clone(), created.clone());
        Ok(created)
    }

    async fn record_login(&self, email: &str, login: &LoginRecord) -> UserResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(email)
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        let now = Utc::now();
        user.last_login = now;
        user.last_ip = login.ip.clone();
        user.last_user_agent = login.user_agent.clone();
        user.updated_at = now;
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Ada".into(),
            picture: "https://lh3.googleusercontent.com/a".into(),
            google_id: "1234".into(),
            login: LoginRecord {
                ip: Some("203.0.113.7".into()),
                user_agent: Some("curl/8".into()),
            },
        }
    }

    #[tokio::test]
    async fn test_create_is_never_admin() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user("ada@example.com")).await.unwrap();

        assert!(!user.is_admin);
        assert!(!user.is_deleted);
        assert_eq!(user.last_ip.as_deref(), Some("203.0.113.7"));
        assert!(repo.create(new_user("ada@example.com")).await.is_err());
    }

    #[tokio::test]
    async fn test_record_login_updates_client() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("ada@example.com")).await.unwrap();

        let updated = repo
            .record_login(
                "ada@example.com",
                &LoginRecord {
                    ip: Some("198.51.100.1".into()),
                    user_agent: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.last_ip.as_deref(), Some("198.51.100.1"));
        assert!(updated.last_user_agent.is_none());

        assert!(matches!(
            repo.record_login("nobody@example.com", &LoginRecord::default()).await,
            Err(UserError::NotFound(_))
        ));
    }
}
