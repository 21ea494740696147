//! Short-lived storage for logins between `/login` and `/callback`.
//!
//! Each entry is keyed by the OAuth `state` and can be taken exactly once,
//! which rejects replayed callbacks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::Mutex;

use crate::error::{UserError, UserResult};
use crate::models::PendingLogin;

/// How long a started login stays valid
pub const PENDING_LOGIN_TTL: Duration = Duration::from_secs(600);

const KEY_PREFIX: &str = "oauth:pending:";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PendingLoginStore: Send + Sync {
    async fn put(&self, state: &str, login: &PendingLogin) -> UserResult<()>;

    /// Remove and return the entry; `None` when unknown, expired or already taken
    async fn take(&self, state: &str) -> UserResult<Option<PendingLogin>>;
}

#[derive(Clone)]
pub struct RedisPendingLoginStore {
    redis: ConnectionManager,
}

impl RedisPendingLoginStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

fn key(state: &str) -> String {
    format!("{}{}", KEY_PREFIX, state)
}

#[async_trait]
impl PendingLoginStore for RedisPendingLoginStore {
    async fn put(&self, state: &str, login: &PendingLogin) -> UserResult<()> {
        let mut conn = self.redis.clone();
        let value = serde_json::to_string(login)
            .map_err(|e| UserError::Internal(format!("Failed to serialize login: {}", e)))?;

        conn.set_ex::<_, _, ()>(key(state), value, PENDING_LOGIN_TTL.as_secs())
            .await?;
        Ok(())
    }

    async fn take(&self, state: &str) -> UserResult<Option<PendingLogin>> {
        let mut conn = self.redis.clone();

        // GETDEL: read and delete in one step
        let value: Option<String> = redis::cmd("GETDEL")
            .arg(key(state))
            .query_async(&mut conn)
            .await?;

        value
            .map(|v| {
                serde_json::from_str(&v)
                    .map_err(|e| UserError::Internal(format!("Corrupt pending login: {}", e)))
            })
            .transpose()
    }
}

/// Process-local store for tests and single-instance development
#[derive(Clone, Default)]
pub struct InMemoryPendingLoginStore {
    entries: Arc<Mutex<HashMap<String, (PendingLogin, Instant)>>>,
}

impl InMemoryPendingLoginStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingLoginStore for InMemoryPendingLoginStore {
    async fn put(&self, state: &str, login: &PendingLogin) -> UserResult<()> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        entries.retain(|_, (_, expires)| *expires > now);
        entries.insert(state.to_string(), (login.clone(), now + PENDING_LOGIN_TTL));
        Ok(())
    }

    async fn take(&self, state: &str) -> UserResult<Option<PendingLogin>> {
        let mut entries = self.entries.lock().await;
        Ok(entries
            .remove(state)
            .filter(|(_, expires)| *expires > Instant::now())
            .map(|(login, _)| login))
    }
}
