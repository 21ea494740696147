//! Handler tests for the product catalog
//!
//! The router runs against the in-memory repository and local-disk storage in
//! a temp dir, so these cover HTTP concerns only: multipart parsing, status
//! codes, viewer-dependent visibility and the response shapes.

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Extension, Router};
use axum_helpers::Viewer;
use chrono::{Duration, Utc};
use domain_products::storage::LocalStorageConfig;
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const BOUNDARY: &str = "----shop-test-boundary";

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct TestApp {
    repo: InMemoryProductRepository,
    uploads: TempDir,
}

impl TestApp {
    fn new() -> Self {
        Self {
            repo: InMemoryProductRepository::new(),
            uploads: tempfile::tempdir().unwrap(),
        }
    }

    fn router(&self, viewer: Viewer) -> Router {
        let storage = LocalFileStorage::new(&LocalStorageConfig {
            root: self.uploads.path().to_path_buf(),
            base_url: "http://localhost:8080/uploads".into(),
        });
        let service = ProductService::new(self.repo.clone(), Arc::new(storage));
        handlers::router(service).layer(Extension(viewer))
    }

    fn stored_files(&self) -> usize {
        fn count(dir: &std::path::Path) -> usize {
            std::fs::read_dir(dir)
                .map(|entries| {
                    entries
                        .flatten()
                        .map(|e| {
                            let path = e.path();
                            if path.is_dir() { count(&path) } else { 1 }
                        })
                        .sum()
                })
                .unwrap_or(0)
        }
        count(self.uploads.path())
    }
}

fn admin() -> Viewer {
    Viewer::user("admin@shop.test", true)
}

fn customer() -> Viewer {
    Viewer::user("customer@shop.test", false)
}

fn product(title: &str, price: i32, active: bool, age_minutes: i64) -> DetailedProduct {
    let created = Utc::now() - Duration::minutes(age_minutes);
    let product_id = Uuid::new_v4();
    let variant_id = Uuid::new_v4();
    let photo_id = Uuid::new_v4();

    DetailedProduct {
        product: Product {
            id: product_id,
            title: title.to_string(),
            description: format!("{} description", title),
            thumbnail_url: format!("https://cdn/{}-thumb.jpg", title),
            product_type: ProductType::DigitalPrintable,
            active,
            tags: vec!["print".into()],
            metadata: json!({}),
            featured_photo_id: Some(photo_id),
            created_at: created,
            updated_at: created,
        },
        variants: vec![DetailedVariant {
            variant: ProductVariant {
                id: variant_id,
                product_id,
                title: "A4".into(),
                price,
                digital_asset: Some(DigitalAsset {
                    file_name: format!("{}.pdf", title),
                    size: 1024,
                    url: format!("https://cdn/{}.pdf", title),
                }),
                active: true,
                sort_order: 0,
                metadata: json!({}),
                created_at: created,
                updated_at: created,
            },
            photos: vec![VariantPhoto {
                id: photo_id,
                variant_id,
                url: format!("https://cdn/{}.jpg", title),
                sort_order: 0,
                created_at: created,
            }],
        }],
    }
}

fn png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(64, 48, image::Rgb([10, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

enum Part {
    Json(&'static str, Value),
    File(&'static str, &'static str, &'static str, Vec<u8>),
}

fn multipart_request(parts: Vec<Part>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Json(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.to_string().as_bytes());
            }
            Part::File(name, file_name, content_type, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn product_json() -> Value {
    json!({
        "type": "WEDDING_INVITATION",
        "title": "Eucalyptus invitation",
        "description": "Greenery suite",
        "tags": ["greenery", "suite"],
        "featuredImageId": "front",
        "variants": [
            {
                "title": "Printable PDF",
                "price": 1500,
                "digitalAsset": "suite-pdf",
                "photos": [{ "id": "front" }, { "id": "detail", "sortOrder": 1 }]
            },
            {
                "title": "Printed, 50 pcs",
                "price": 6500,
                "sortOrder": 1,
                "active": false,
                "photos": [{ "id": "printed" }]
            }
        ]
    })
}

fn full_form() -> Vec<Part> {
    vec![
        Part::Json("product", product_json()),
        Part::File("front", "front.png", "image/png", png()),
        Part::File("detail", "detail.png", "image/png", png()),
        Part::File("printed", "printed.png", "image/png", png()),
        Part::File("suite-pdf", "suite.pdf", "application/pdf", b"%PDF-1.7".to_vec()),
    ]
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_list_requires_product_type_for_customers() {
    let app = TestApp::new();

    let response = app.router(Viewer::anonymous()).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.router(admin()).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_hides_inactive_products_from_customers() {
    let app = TestApp::new();
    app.repo.insert(product("visible", 900, true, 10)).await;
    app.repo.insert(product("hidden", 700, false, 5)).await;

    let response = app
        .router(customer())
        .oneshot(get("/?productType=DIGITAL_PRINTABLE"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["nextCursor"], Value::Null);
    assert_eq!(body["products"][0]["title"], json!("visible"));
    assert_eq!(body["products"][0]["price"], json!(900));
    assert_eq!(body["products"][0]["thumbnailUrl"], json!("https://cdn/visible.jpg"));

    let response = app
        .router(admin())
        .oneshot(get("/?productType=DIGITAL_PRINTABLE&active=false"))
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["products"][0]["title"], json!("hidden"));
}

#[tokio::test]
async fn test_list_pages_through_results_by_price() {
    let app = TestApp::new();
    for (i, price) in [300, 600, 1000, 1400, 2000].into_iter().enumerate() {
        app.repo
            .insert(product(&format!("p{}", price), price, i > 0, i as i64))
            .await;
    }

    let response = app
        .router(Viewer::anonymous())
        .oneshot(get(
            "/?productType=DIGITAL_PRINTABLE&minPrice=500&maxPrice=1500&sortBy=price&sortOrder=asc&limit=2",
        ))
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;

    let prices: Vec<i64> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_i64().unwrap())
        .collect();
    assert_eq!(prices, vec![600, 1000]);
    assert_eq!(body["count"], json!(3));
    assert_eq!(body["nextCursor"], json!(2));

    let response = app
        .router(Viewer::anonymous())
        .oneshot(get(
            "/?productType=DIGITAL_PRINTABLE&minPrice=500&maxPrice=1500&sortBy=price&sortOrder=asc&limit=2&cursor=2",
        ))
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["products"][0]["price"], json!(1400));
    assert_eq!(body["nextCursor"], Value::Null);
}

#[tokio::test]
async fn test_list_sorts_titles_case_insensitively() {
    let app = TestApp::new();
    for (i, title) in ["banner", "Apple", "cherry", "Banner"].into_iter().enumerate() {
        app.repo.insert(product(title, 500, true, i as i64)).await;
    }

    let response = app
        .router(admin())
        .oneshot(get("/?sortBy=title&sortOrder=asc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;

    let titles: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Apple", "Banner", "banner", "cherry"]);
}

#[tokio::test]
async fn test_list_rejects_malformed_filters() {
    let app = TestApp::new();

    for uri in [
        "/?productType=POSTER",
        "/?productType=DIGITAL_PRINTABLE&minPrice=cheap",
        "/?productType=DIGITAL_PRINTABLE&sortBy=colour",
        "/?productType=DIGITAL_PRINTABLE&cursor=-1",
        "/?productType=DIGITAL_PRINTABLE&cursor=18446744073709551615",
    ] {
        let response = app.router(Viewer::anonymous()).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_get_product_visibility() {
    let app = TestApp::new();
    let hidden = product("hidden", 700, false, 0);
    let id = hidden.product.id;
    app.repo.insert(hidden).await;

    let response = app
        .router(customer())
        .oneshot(get(&format!("/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router(admin())
        .oneshot(get(&format!("/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["product"]["active"], json!(false));
    assert_eq!(body["product"]["variants"][0]["digitalAsset"]["type"], json!("pdf"));
    assert_eq!(body["product"]["variants"][0]["photos"][0]["featured"], json!(true));
}

#[tokio::test]
async fn test_get_product_bad_and_unknown_ids() {
    let app = TestApp::new();

    let response = app
        .router(Viewer::anonymous())
        .oneshot(get("/not-a-uuid"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router(Viewer::anonymous())
        .oneshot(get(&format!("/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_requires_admin() {
    let app = TestApp::new();

    let response = app
        .router(Viewer::anonymous())
        .oneshot(multipart_request(full_form()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router(customer())
        .oneshot(multipart_request(full_form()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(app.repo.product_count().await, 0);
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn test_create_product_round_trip() {
    let app = TestApp::new();

    let response = app
        .router(admin())
        .oneshot(multipart_request(full_form()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Value = json_body(response.into_body()).await;
    let product_id = created["productId"].as_str().unwrap().to_string();

    // thumbnail + pdf + three photos
    assert_eq!(app.stored_files(), 5);
    assert_eq!(app.repo.asset_references().await.len(), 5);

    let response = app
        .router(admin())
        .oneshot(get(&format!("/{}", product_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    let product = &body["product"];
    assert_eq!(product["title"], json!("Eucalyptus invitation"));
    assert!(product["thumbnailUrl"].as_str().unwrap().ends_with("-front.jpg"));

    let variants = product["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0]["photos"].as_array().unwrap().len(), 2);
    assert_eq!(variants[1]["photos"].as_array().unwrap().len(), 1);
    assert_eq!(variants[0]["digitalAsset"]["name"], json!("suite.pdf"));
    assert_eq!(variants[0]["digitalAsset"]["size"], json!(8));

    let featured: Vec<&Value> = variants
        .iter()
        .flat_map(|v| v["photos"].as_array().unwrap())
        .filter(|p| p["featured"] == json!(true))
        .collect();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0]["id"], product["featuredImageId"]);
    assert!(featured[0]["url"].as_str().unwrap().ends_with("-front.png"));

    // customers do not see the inactive variant
    let response = app
        .router(customer())
        .oneshot(get(&format!("/{}", product_id)))
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["product"]["variants"].as_array().unwrap().len(), 1);
    assert!(body["product"].get("active").is_none());
}

#[tokio::test]
async fn test_create_rejects_incomplete_forms_without_uploading() {
    let app = TestApp::new();

    let mut missing_file = full_form();
    missing_file.pop();

    let mut stray_file = full_form();
    stray_file.push(Part::File("stray", "stray.png", "image/png", png()));

    let mut wrong_featured = product_json();
    wrong_featured["featuredImageId"] = json!("nope");
    let mut bad_featured = full_form();
    bad_featured[0] = Part::Json("product", wrong_featured);

    let mut negative = product_json();
    negative["variants"][0]["price"] = json!(-1);
    let mut negative_price = full_form();
    negative_price[0] = Part::Json("product", negative);

    let no_product = full_form().into_iter().skip(1).collect();

    for parts in [missing_file, stray_file, bad_featured, negative_price, no_product] {
        let response = app
            .router(admin())
            .oneshot(multipart_request(parts))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(app.repo.product_count().await, 0);
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn test_create_rejects_undecodable_featured_photo() {
    let app = TestApp::new();

    let mut parts = full_form();
    parts[1] = Part::File("front", "front.png", "image/png", b"not a png".to_vec());

    let response = app
        .router(admin())
        .oneshot(multipart_request(parts))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.repo.product_count().await, 0);
    assert_eq!(app.stored_files(), 0);
}
