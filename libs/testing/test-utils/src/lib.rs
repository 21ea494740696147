//! Shared test utilities for the shop crates
//!
//! - `TestDatabase`: PostgreSQL container with the shop migrations applied (feature: "postgres")
//! - `TestRedis`: Redis container (feature: "redis")
//! - `TestDataBuilder`: deterministic names, emails and ids derived from the test name
//! - `assertions`: assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let title = builder.title("poster");
//!     let email = builder.email("admin");
//! }
//! ```
//!
//! For Redis add `features = ["redis"]` to the dev-dependency.

use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

#[cfg(feature = "redis")]
pub use redis::TestRedis;

/// Seeded test data so reruns of the same test see the same values
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name; the usual entry point.
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic id, distinct per `n`
    pub fn id(&self, n: u64) -> Uuid {
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&self.seed.to_le_bytes());
        uuid_bytes[8..16].copy_from_slice(&n.to_le_bytes());
        Uuid::from_bytes(uuid_bytes)
    }

    /// `test-{prefix}-{seed}`
    pub fn title(&self, prefix: &str) -> String {
        format!("test-{}-{}", prefix, self.seed)
    }

    pub fn email(&self, local: &str) -> String {
        format!("{}-{}@example.com", local, self.seed)
    }

    /// Tag unique to this test, for isolating tag-filter assertions
    pub fn tag(&self, name: &str) -> String {
        format!("{}-{}", name, self.seed)
    }
}

/// Assertion helpers with readable failure messages
pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.id(1), builder2.id(1));
        assert_eq!(builder1.title("poster"), builder2.title("poster"));
        assert_eq!(builder1.email("admin"), "admin-42@example.com");
    }

    #[test]
    fn test_data_builder_ids_differ_per_index() {
        let builder = TestDataBuilder::from_test_name("my_test");
        assert_ne!(builder.id(1), builder.id(2));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.id(0), builder2.id(0));
        assert_ne!(builder1.tag("sale"), builder2.tag("sale"));
    }
}
