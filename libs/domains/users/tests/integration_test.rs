//! Integration tests for the users domain
//!
//! - PgUserRepository against migrated PostgreSQL
//! - RedisPendingLoginStore against a real Redis
//! - UserViewerResolver over the Postgres repository

use axum_helpers::{Viewer, ViewerResolver};
use domain_users::models::{LoginRecord, NewUser, PendingLogin};
use domain_users::*;
use sea_orm::ConnectionTrait;
use test_utils::{TestDataBuilder, TestDatabase, TestRedis, assertions::*};

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: "Grace Hopper".to_string(),
        picture: "https://lh3.googleusercontent.com/a/grace".to_string(),
        google_id: "google-sub-1".to_string(),
        login: LoginRecord {
            ip: Some("198.51.100.7".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
        },
    }
}

#[tokio::test]
async fn test_create_and_find_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_find_user");
    let email = builder.email("grace");

    let created = repo.create(new_user(&email)).await.unwrap();
    assert_eq!(created.email, email);
    assert!(!created.is_admin);
    assert!(!created.is_deleted);
    assert_eq!(created.last_ip.as_deref(), Some("198.51.100.7"));

    let found = assert_some(repo.find_by_email(&email).await.unwrap(), "stored user");
    assert_eq!(found.name, "Grace Hopper");
    assert_eq!(found.google_id, "google-sub-1");

    assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let email = TestDataBuilder::from_test_name("duplicate_email").email("dup");

    repo.create(new_user(&email)).await.unwrap();
    let result = repo.create(new_user(&email)).await;
    assert!(matches!(result, Err(UserError::Database(_))));
}

#[tokio::test]
async fn test_record_login_updates_client_fields() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let email = TestDataBuilder::from_test_name("record_login").email("ada");

    let created = repo.create(new_user(&email)).await.unwrap();
    let updated = repo
        .record_login(
            &email,
            &LoginRecord {
                ip: Some("203.0.113.50".to_string()),
                user_agent: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.last_ip.as_deref(), Some("203.0.113.50"));
    assert_eq!(updated.last_user_agent, None);
    assert!(updated.last_login >= created.last_login);
    assert_eq!(updated.name, created.name);
}

#[tokio::test]
async fn test_record_login_for_missing_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());

    let result = repo
        .record_login("ghost@example.com", &LoginRecord::default())
        .await;
    assert!(matches!(result, Err(UserError::NotFound(_))));
}

#[tokio::test]
async fn test_resolver_reads_admin_and_deleted_flags() {
    let db = TestDatabase::new().await;
    let conn = db.connection();
    let repo = PgUserRepository::new(conn.clone());
    let builder = TestDataBuilder::from_test_name("resolver_flags");
    let admin = builder.email("admin");
    let deleted = builder.email("deleted");

    repo.create(new_user(&admin)).await.unwrap();
    repo.create(new_user(&deleted)).await.unwrap();
    conn.execute_unprepared(&format!(
        "UPDATE users SET is_admin = true WHERE email = '{}'",
        admin
    ))
    .await
    .unwrap();
    conn.execute_unprepared(&format!(
        "UPDATE users SET is_deleted = true WHERE email = '{}'",
        deleted
    ))
    .await
    .unwrap();

    let resolver = UserViewerResolver::new(repo);
    assert_eq!(
        resolver.resolve(&admin).await.unwrap(),
        Some(Viewer::user(admin.clone(), true))
    );
    assert_eq!(resolver.resolve(&deleted).await.unwrap(), None);
}

#[tokio::test]
async fn test_redis_pending_login_is_taken_once() {
    let redis = TestRedis::new().await;
    let store = RedisPendingLoginStore::new(redis.connection());
    let pending = PendingLogin {
        verifier: "pkce-verifier".to_string(),
        redirect_to: Some("admin".to_string()),
    };

    store.put("state-1", &pending).await.unwrap();

    let taken = assert_some(store.take("state-1").await.unwrap(), "pending login");
    assert_eq!(taken, pending);
    assert!(store.take("state-1").await.unwrap().is_none());
    assert!(store.take("state-unknown").await.unwrap().is_none());
}
