use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Catalog a product is listed in
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_type")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    #[sea_orm(string_value = "DIGITAL_PRINTABLE")]
    DigitalPrintable,
    #[sea_orm(string_value = "WEDDING_INVITATION")]
    WeddingInvitation,
}

/// What an uploaded file is attached to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "asset_entity_type")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetEntityType {
    /// entity id is the product
    #[sea_orm(string_value = "product_thumbnail")]
    ProductThumbnail,
    /// entity id is the owning variant
    #[sea_orm(string_value = "variant_photo")]
    VariantPhoto,
    /// entity id is the owning variant
    #[sea_orm(string_value = "digital_asset")]
    DigitalAsset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub product_type: ProductType,
    pub active: bool,
    pub tags: Vec<String>,
    pub metadata: serde_json::Value,
    /// Unset only while the creating transaction is still running
    pub featured_photo_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Downloadable file sold with a variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalAsset {
    pub file_name: String,
    pub size: i32,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    /// Smallest currency unit
    pub price: i32,
    pub digital_asset: Option<DigitalAsset>,
    pub active: bool,
    pub sort_order: i32,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPhoto {
    pub id: Uuid,
    pub variant_id: Uuid,
    pub url: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailedVariant {
    pub variant: ProductVariant,
    pub photos: Vec<VariantPhoto>,
}

/// A product with its variants and their photos nested underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedProduct {
    pub product: Product,
    pub variants: Vec<DetailedVariant>,
}

impl DetailedProduct {
    /// The variant owning the featured photo, together with that photo.
    pub fn featured(&self) -> Option<(&DetailedVariant, &VariantPhoto)> {
        let featured_id = self.product.featured_photo_id?;
        self.variants.iter().find_map(|variant| {
            variant
                .photos
                .iter()
                .find(|photo| photo.id == featured_id)
                .map(|photo| (variant, photo))
        })
    }
}

/// A product ready to be persisted: every file is already uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub product_type: ProductType,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub tags: Vec<String>,
    pub metadata: serde_json::Value,
    pub active: bool,
    /// Temporary id of the photo that becomes the featured photo
    pub featured_image_id: String,
    pub variants: Vec<VariantDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantDraft {
    pub title: String,
    pub price: i32,
    pub sort_order: i32,
    pub metadata: serde_json::Value,
    pub active: bool,
    pub digital_asset: Option<DigitalAsset>,
    pub photos: Vec<PhotoDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDraft {
    /// Client-chosen id, only meaningful within one creation request
    pub temp_id: String,
    pub url: String,
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

/// JSON carried in the `product` part of the creation form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductForm {
    #[serde(rename = "type")]
    pub product_type: ProductType,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    #[serde(default = "default_true")]
    pub active: bool,
    #[validate(length(min = 1))]
    pub featured_image_id: String,
    #[validate(length(min = 1, message = "at least one variant is required"), nested)]
    pub variants: Vec<VariantForm>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i32,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Name of the form part holding the digital asset
    pub digital_asset: Option<String>,
    #[validate(length(min = 1, message = "every variant needs at least one photo"), nested)]
    pub photos: Vec<PhotoForm>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoForm {
    /// Temporary id; also the name of the form part holding the image
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub sort_order: i32,
}
