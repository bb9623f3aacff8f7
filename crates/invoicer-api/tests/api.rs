use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use invoicer_api::{ApiConfig, AppState, build_router};
use invoicer_convert::{ConverterChain, Docx2PdfBackend, LibreOfficeBackend, PdfBackend};
use invoicer_core::InvoicerConfig;

fn invoicer_config(dir: &std::path::Path) -> InvoicerConfig {
    let mut config = InvoicerConfig::default();
    config.assets.assets_dir = dir.join("assets");
    config.assets.paid_stamp = dir.join("assets/paid_stamp.png");
    config
}

fn app_with(dir: &std::path::Path, backends: Vec<Box<dyn PdfBackend>>) -> Router {
    let state = AppState::with_converter(
        ApiConfig::default(),
        invoicer_config(dir),
        ConverterChain::new(backends),
    );
    build_router(state)
}

fn app(dir: &std::path::Path) -> Router {
    let failing = LibreOfficeBackend::with_program("invoicer-no-unoconv", Duration::from_secs(5));
    app_with(dir, vec![Box::new(failing)])
}

fn invoice() -> Value {
    json!({
        "client_name": "Web Client Test",
        "client_address": "123 Browser St.\nWeb City",
        "services": ["API Testing 01.05.25 (2 hours)", "Documentation 01.05.25 (1 hour)"],
        "payment_terms_days": 30,
        "invoice_number": 1010,
        "invoice_date": "01.05.25",
        "company_name": "Test Consulting Ltd",
        "hourly_rate": 200,
        "vat_rate": 20,
        "account_number": "12345678",
        "sort_code": "12-34-56",
        "bank_address": "123 Bank St, London, UK",
        "company_number": 12345678,
        "vat_number": "GB123456789",
        "registered_address": "123 Business St, London, UK",
        "email": "contact@testconsulting.com",
        "contact_number": "07700 900123",
        "paid": true
    })
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invoice Generator API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["cors_enabled"], true);
    assert_eq!(body["cors_origins"], json!(["*"]));
    assert_eq!(body["verbose_logging"], false);
}

#[tokio::test]
async fn test_example_client() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(Request::builder().uri("/example-client").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/generate-invoice"));
}

#[tokio::test]
async fn test_generate_docx() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(post("/generate-invoice", invoice().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"invoice_1010.docx\""
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn test_invalid_service_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = invoice();
    body["services"] = json!(["API Testing 01.05.25", "Documentation (1 hour)"]);

    let response = app(dir.path())
        .oneshot(post("/generate-invoice?format=docx", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
    assert!(detail.contains("hours in parentheses"));
    assert!(detail.contains("DD.MM.YY"));
}

#[tokio::test]
async fn test_missing_field_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = invoice();
    body.as_object_mut().unwrap().remove("hourly_rate");

    let response = app(dir.path())
        .oneshot(post("/generate-invoice", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
    assert!(detail.contains("hourly_rate"));
}

#[tokio::test]
async fn test_oversized_amounts_are_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = invoice();
    body["services"] = json!(["Migration 01.05.25 (99999999999999999999 hours)"]);
    body["hourly_rate"] = json!(1_000_000_000);

    let response = app(dir.path())
        .oneshot(post("/generate-invoice", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
    assert!(detail.contains("services"));
}

#[tokio::test]
async fn test_invalid_format() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(post("/generate-invoice?format=xml", invoice().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["detail"],
        "Invalid format. Must be 'docx' or 'pdf'"
    );
}

#[tokio::test]
async fn test_pdf_conversion_failure() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(post("/generate-invoice?format=pdf", invoice().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
    assert!(detail.starts_with("Failed to generate invoice: "));
    assert!(detail.contains("all PDF backends failed"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_generate_pdf() {
    let dir = tempfile::tempdir().unwrap();
    // `cp <docx> <pdf>` stands in for a real converter.
    let copy = Docx2PdfBackend::with_program("cp", Duration::from_secs(5));
    let response = app_with(dir.path(), vec![Box::new(copy)])
        .oneshot(post("/generate-invoice?format=PDF", invoice().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"invoice_1010.pdf\""
    );
}

#[tokio::test]
async fn test_cors_mirrors_origin_with_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(
            Request::builder()
                .uri("/version")
                .header(header::ORIGIN, "https://client.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://client.example"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}
