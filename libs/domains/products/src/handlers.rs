//! HTTP handlers for the product catalog

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, ClientInfo, UuidPath, Viewer,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use utoipa::OpenApi;

use crate::filters::ListProductsQuery;
use crate::models::{CreateProductForm, PhotoForm, ProductType, VariantForm};
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::storage::UploadedFile;
use crate::views::{
    DigitalAssetView, FileKind, PhotoView, ProductCreatedResponse, ProductListItem,
    ProductListResponse, ProductResponse, ProductView, VariantView,
};

/// Name of the multipart part carrying the product JSON
pub const PRODUCT_PART: &str = "product";

#[derive(OpenApi)]
#[openapi(
    paths(list_products, create_product, get_product),
    components(
        schemas(
            ProductType, FileKind, ProductListItem, ProductListResponse, ProductView,
            ProductResponse, VariantView, PhotoView, DigitalAssetView,
            ProductCreatedResponse, CreateProductForm, VariantForm, PhotoForm
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog")
    )
)]
pub struct ApiDoc;

/// Routes relative to the mount point (`/api/products` in the API binary).
///
/// Expects a [`Viewer`] in the request extensions; without the viewer
/// middleware every caller is anonymous.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products::<R>).post(create_product::<R>))
        .route("/{id}", get(get_product::<R>))
        .with_state(shared_service)
}

/// List products
///
/// Non-admin callers must pass `productType` and only ever see active
/// products and variants.
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductListResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    viewer: Viewer,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ProductListResponse>, AppError> {
    let response = service.list_products(query, viewer.is_admin).await?;
    Ok(Json(response))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    viewer: Viewer,
    UuidPath(id): UuidPath,
) -> Result<Json<ProductResponse>, AppError> {
    let product = service.get_product(id, viewer.is_admin).await?;
    Ok(Json(ProductResponse { product }))
}

/// Create a product (admin only)
///
/// `multipart/form-data` with a `product` part holding the JSON form and one
/// file part per photo and digital asset, named by its temporary id.
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body(content = CreateProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = ProductCreatedResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    viewer: Viewer,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let client = ClientInfo::from_headers(&headers);
    let actor = match viewer.require_admin() {
        Ok(email) => email.to_string(),
        Err(e) => {
            AuditEvent::new(viewer.email.clone(), "product.create", None, AuditOutcome::Denied)
                .with_client(&client)
                .log();
            return Err(e);
        }
    };

    let (form, files) = read_multipart(multipart).await?;
    let product_id = service
        .create_product(form, files, &actor, &client)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductCreatedResponse { product_id }),
    ))
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(CreateProductForm, HashMap<String, UploadedFile>), AppError> {
    let mut form = None;
    let mut files = HashMap::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            return Err(AppError::BadRequest("Multipart part without a name".to_string()));
        };

        if name == PRODUCT_PART {
            let text = field.text().await?;
            let parsed: CreateProductForm = serde_json::from_str(&text)
                .map_err(|e| AppError::BadRequest(format!("Invalid product JSON: {}", e)))?;
            form = Some(parsed);
            continue;
        }

        let file_name = field.file_name().unwrap_or(&name).to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        let file = UploadedFile::new(file_name, content_type.as_deref(), bytes);
        if files.insert(name.clone(), file).is_some() {
            return Err(AppError::BadRequest(format!("Duplicate file part '{}'", name)));
        }
    }

    let form = form
        .ok_or_else(|| AppError::BadRequest(format!("Missing '{}' part", PRODUCT_PART)))?;
    Ok((form, files))
}
