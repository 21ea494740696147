//! Connection cleanup run after the server stops accepting requests.

use tracing::{error, info};

pub async fn close_postgres(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(_) => info!("PostgreSQL connection '{}' closed successfully", name),
        Err(e) => error!("Error closing PostgreSQL connection '{}': {}", name, e),
    }
}

/// `ConnectionManager` has no explicit close; dropping the last clone releases it.
pub async fn close_redis(redis: redis::aio::ConnectionManager, name: &str) {
    drop(redis);
    info!("Redis connection '{}' released", name);
}

/// Runs named cleanup tasks concurrently and waits for all of them.
///
/// ```ignore
/// let mut cleanup = CleanupCoordinator::new();
/// cleanup.add_task("postgres", close_postgres(db, "main"));
/// cleanup.add_task("redis", close_redis(redis, "oauth"));
/// cleanup.run().await;
/// ```
pub struct CleanupCoordinator {
    tasks: Vec<(&'static str, tokio::task::JoinHandle<()>)>,
}

impl CleanupCoordinator {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Spawns the task immediately.
    pub fn add_task<F>(&mut self, name: &'static str, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.tasks.push((name, tokio::spawn(task)));
    }

    /// A panicking task is logged and does not stop the others.
    pub async fn run(self) {
        info!("Running {} cleanup tasks", self.tasks.len());

        for (name, handle) in self.tasks {
            match handle.await {
                Ok(_) => info!("Cleanup task '{}' completed", name),
                Err(e) => error!("Cleanup task '{}' failed: {}", name, e),
            }
        }
    }
}

impl Default for CleanupCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
