//! Nests bulk-fetched rows into [`DetailedProduct`] aggregates.
//!
//! Repositories fetch products, variants and photos with one query each and
//! hand the three row sets here. The output follows the caller's id order,
//! since bulk fetches come back in whatever order the store picks.

use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{DetailedProduct, DetailedVariant, Product, ProductVariant, VariantPhoto};

/// Ids missing from `products` (filtered out or gone) are skipped.
/// Variants and photos are kept in `sort_order`.
pub fn assemble(
    order: &[Uuid],
    products: Vec<Product>,
    variants: Vec<ProductVariant>,
    photos: Vec<VariantPhoto>,
) -> Vec<DetailedProduct> {
    let mut photos_by_variant: HashMap<Uuid, Vec<VariantPhoto>> = HashMap::new();
    for photo in photos {
        photos_by_variant.entry(photo.variant_id).or_default().push(photo);
    }

    let mut variants_by_product: HashMap<Uuid, Vec<DetailedVariant>> = HashMap::new();
    for variant in variants {
        let mut photos = photos_by_variant.remove(&variant.id).unwrap_or_default();
        photos.sort_by_key(|p| p.sort_order);
        variants_by_product
            .entry(variant.product_id)
            .or_default()
            .push(DetailedVariant { variant, photos });
    }

    let mut by_id: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();

    order
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(|product| {
            let mut variants = variants_by_product.remove(&product.id).unwrap_or_default();
            variants.sort_by_key(|v| v.variant.sort_order);
            DetailedProduct { product, variants }
        })
        .collect()
}

/// Variant ids to fetch photos for
pub fn variant_ids(variants: &[ProductVariant]) -> Vec<Uuid> {
    variants.iter().map(|v| v.id).collect()
}
