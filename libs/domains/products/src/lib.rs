//! Product catalog domain
//!
//! Filtered, paginated browsing and multi-asset product creation over a
//! product / variant / photo schema in Postgres.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Handlers   │  ← HTTP endpoints, multipart parsing
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐     ┌──────────────┐
//! │   Service    │ ──► │ FileStorage  │  ← S3 or local disk
//! └──────┬───────┘     └──────────────┘
//!        │  filters → views
//! ┌──────▼───────┐
//! │  Repository  │  ← trait + Postgres / in-memory implementations
//! └──────┬───────┘
//!        │  query → pagination → assembler
//! ┌──────▼───────┐
//! │   Entities   │  ← sea-orm models
//! └──────────────┘
//! ```
//!
//! # Listing
//!
//! [`ProductFilters`] normalizes the query string. [`query::compile_page_query`]
//! turns it into one statement returning the page's ids together with the total
//! match count (`COUNT(*) OVER()`). When a price bound or price ordering is
//! requested, products are joined to their featured variant, the variant owning
//! the product's featured photo, because that variant's price is the product's
//! price. [`assembler::assemble`] then nests variants and photos under the page's
//! products in page order.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_products::{
//!     handlers, postgres::PgProductRepository, service::ProductService,
//!     storage::{LocalFileStorage, LocalStorageConfig},
//! };
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://localhost/shop").await?;
//! let storage = LocalFileStorage::new(&LocalStorageConfig {
//!     root: "./uploads".into(),
//!     base_url: "http://localhost:8080/uploads".into(),
//! });
//!
//! let service = ProductService::new(PgProductRepository::new(db), Arc::new(storage));
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod entity;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod service;
pub mod storage;
pub mod views;

pub use error::{ProductError, ProductResult};
pub use filters::{ListProductsQuery, ProductFilters, SortBy, SortOrder};
pub use handlers::ApiDoc;
pub use memory::InMemoryProductRepository;
pub use models::{
    CreateProductForm, DetailedProduct, DetailedVariant, DigitalAsset, Product, ProductDraft,
    ProductType, ProductVariant, VariantPhoto,
};
pub use postgres::PgProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
pub use storage::{FileStorage, LocalFileStorage, S3FileStorage, StorageConfig, UploadedFile};
pub use views::{ProductListItem, ProductListResponse, ProductView};
