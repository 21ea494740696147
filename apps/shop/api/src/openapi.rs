//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the shop API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "Product catalog and Google sign-in for the shop",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc),
        (path = "/api/auth", api = domain_users::handlers::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Catalog browsing and admin product creation"),
        (name = "Auth", description = "Google sign-in and sessions")
    )
)]
pub struct ApiDoc;
