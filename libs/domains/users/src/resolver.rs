use std::sync::Arc;

use async_trait::async_trait;
use axum_helpers::{AppError, Viewer, ViewerResolver};

use crate::repository::UserRepository;

/// Resolves session emails against the users table.
///
/// Deleted accounts resolve to `None` so their sessions stop working at once.
pub struct UserViewerResolver<R: UserRepository> {
    users: Arc<R>,
}

impl<R: UserRepository> UserViewerResolver<R> {
    pub fn new(users: R) -> Self {
        Self {
            users: Arc::new(users),
        }
    }
}

#[async_trait]
impl<R: UserRepository> ViewerResolver for UserViewerResolver<R> {
    async fn resolve(&self, email: &str) -> Result<Option<Viewer>, AppError> {
        let user = self.users.find_by_email(email).await?;
        Ok(user
            .filter(|user| !user.is_deleted)
            .map(|user| Viewer::user(user.email, user.is_admin)))
    }
}
