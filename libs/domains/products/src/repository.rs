use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::filters::ProductFilters;
use crate::models::{DetailedProduct, ProductDraft};
use crate::pagination::ProductPage;

/// Catalog persistence.
///
/// Implementations: [`crate::postgres::PgProductRepository`] and
/// [`crate::memory::InMemoryProductRepository`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of matching product ids in display order, plus the total
    /// number of matches.
    async fn find_page(&self, filters: &ProductFilters) -> ProductResult<ProductPage>;

    /// Loads full aggregates for `ids`, keeping their order. Unless
    /// `is_admin`, inactive products and inactive variants are left out.
    async fn find_detailed(&self, ids: &[Uuid], is_admin: bool)
    -> ProductResult<Vec<DetailedProduct>>;

    /// Persists the product, its variants, photos and asset references in
    /// one transaction and returns the new product id. Nothing is visible
    /// if any step fails.
    async fn create(&self, draft: ProductDraft) -> ProductResult<Uuid>;
}
