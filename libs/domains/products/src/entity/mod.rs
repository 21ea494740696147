//! SeaORM entities for the catalog tables

pub mod asset_references;
pub mod product_variants;
pub mod products;
pub mod variant_photos;
