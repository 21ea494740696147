//! Response projections of [`DetailedProduct`].
//!
//! Both projections require the featured photo to resolve to a photo of one
//! of the product's variants. When it does not, the creation flow left a
//! broken graph behind; that is reported as a data-integrity error and
//! never papered over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::DetailedProduct;

/// Digital asset category inferred from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Zip,
    Video,
    Audio,
    Unknown,
}

impl FileKind {
    pub fn from_file_name(file_name: &str) -> Self {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return FileKind::Unknown;
        };
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" => FileKind::Image,
            "pdf" => FileKind::Pdf,
            "zip" => FileKind::Zip,
            "mp4" => FileKind::Video,
            "mp3" => FileKind::Audio,
            _ => FileKind::Unknown,
        }
    }
}

/// Product as shown in listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Price of the featured variant
    pub price: i32,
    /// URL of the featured photo
    pub thumbnail_url: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoView {
    pub id: Uuid,
    pub url: String,
    pub sort_order: i32,
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DigitalAssetView {
    pub url: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub size: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantView {
    pub id: Uuid,
    pub title: String,
    pub price: i32,
    /// Admin only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digital_asset: Option<DigitalAssetView>,
    /// Admin only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    pub sort_order: i32,
    pub photos: Vec<PhotoView>,
}

/// Product detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub thumbnail_url: String,
    pub featured_image_id: Uuid,
    pub variants: Vec<VariantView>,
    /// Admin only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductListItem>,
    /// Offset of the next page, `null` on the last page
    pub next_cursor: Option<u64>,
    /// Total number of matching products
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub product: ProductView,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreatedResponse {
    pub product_id: Uuid,
}

fn integrity_error(detailed: &DetailedProduct) -> ProductError {
    let variants: Vec<(Uuid, Vec<Uuid>)> = detailed
        .variants
        .iter()
        .map(|v| (v.variant.id, v.photos.iter().map(|p| p.id).collect()))
        .collect();
    tracing::error!(
        product_id = %detailed.product.id,
        featured_photo_id = ?detailed.product.featured_photo_id,
        variants = ?variants,
        "Featured photo does not resolve to any variant photo"
    );

    ProductError::DataIntegrity {
        product_id: detailed.product.id,
        featured_photo_id: detailed.product.featured_photo_id,
    }
}

pub fn to_list_item(detailed: &DetailedProduct) -> ProductResult<ProductListItem> {
    let (variant, photo) = detailed.featured().ok_or_else(|| integrity_error(detailed))?;
    let product = &detailed.product;

    Ok(ProductListItem {
        id: product.id,
        title: product.title.clone(),
        description: product.description.clone(),
        price: variant.variant.price,
        thumbnail_url: photo.url.clone(),
        tags: product.tags.clone(),
        created_at: product.created_at,
        updated_at: product.updated_at,
        active: product.active,
    })
}

pub fn to_product_view(detailed: &DetailedProduct, is_admin: bool) -> ProductResult<ProductView> {
    let (_, featured) = detailed.featured().ok_or_else(|| integrity_error(detailed))?;
    let featured_id = featured.id;
    let product = &detailed.product;

    let variants = detailed
        .variants
        .iter()
        .map(|dv| {
            let variant = &dv.variant;
            let digital_asset = variant
                .digital_asset
                .as_ref()
                .filter(|_| is_admin)
                .map(|asset| DigitalAssetView {
                    url: asset.url.clone(),
                    name: asset.file_name.clone(),
                    kind: FileKind::from_file_name(&asset.file_name),
                    size: asset.size,
                });

            VariantView {
                id: variant.id,
                title: variant.title.clone(),
                price: variant.price,
                digital_asset,
                active: is_admin.then_some(variant.active),
                sort_order: variant.sort_order,
                photos: dv
                    .photos
                    .iter()
                    .map(|photo| PhotoView {
                        id: photo.id,
                        url: photo.url.clone(),
                        sort_order: photo.sort_order,
                        featured: photo.id == featured_id,
                    })
                    .collect(),
            }
        })
        .collect();

    Ok(ProductView {
        id: product.id,
        title: product.title.clone(),
        description: product.description.clone(),
        tags: product.tags.clone(),
        thumbnail_url: product.thumbnail_url.clone(),
        featured_image_id: featured_id,
        variants,
        active: is_admin.then_some(product.active),
    })
}
