use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use dossier::fonts::font_library_from_bytes;
use dossier::DocumentRenderer;
use dossier_layout::FontLibrary;
use dossier_server::{config::ServerConfig, router, AppState};
use dossier_traits::InMemoryResourceProvider;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(fonts: FontLibrary) -> Router {
    let renderer = DocumentRenderer::new(Arc::new(InMemoryResourceProvider::new()), Arc::new(fonts), "Inter");
    router(AppState::new(renderer, ServerConfig::default()))
}

/// An app without any fonts: parsing works, rendering fails.
fn fontless_app() -> Router {
    app_with(FontLibrary::new())
}

fn system_app() -> Option<Router> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let query = fontdb::Query {
        families: &[fontdb::Family::Name("DejaVu Sans"), fontdb::Family::SansSerif],
        ..fontdb::Query::default()
    };
    let id = db.query(&query)?;
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    if index != 0 {
        return None;
    }
    font_library_from_bytes(bytes, "Inter", Path::new("system")).ok().map(app_with)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = fontless_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn missing_data_is_a_bad_request() {
    for (uri, body) in [("/cv", "{}"), ("/cover-letter", r#"{"signatureUrl": "x"}"#), ("/cv", "")] {
        let response = fontless_app().oneshot(post(uri, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {}", uri, body);
        assert_eq!(json_body(response).await, json!({ "error": "Missing data" }));
    }
}

#[tokio::test]
async fn non_json_body_counts_as_missing_data() {
    for body in ["{\"data\":", "fullName=Jane"] {
        let response = fontless_app().oneshot(post("/cv", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(json_body(response).await, json!({ "error": "Missing data" }));
    }
}

#[tokio::test]
async fn wrongly_typed_data_is_invalid() {
    let body = json!({ "data": { "fullName": 5 } }).to_string();
    let response = fontless_app().oneshot(post("/cv", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Invalid data"), "{}", error);
}

#[tokio::test]
async fn render_failures_are_server_errors() {
    let body = json!({ "data": { "fullName": "Jane Doe" } }).to_string();
    let response = fontless_app().oneshot(post("/cv", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn cv_is_served_inline_as_pdf() {
    let Some(app) = system_app() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let body = json!({ "data": { "fullName": "Jane Doe", "summary": "x" } }).to_string();
    let response = app.oneshot(post("/cv", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(response.headers()[header::CONTENT_DISPOSITION], "inline; filename=\"cv.pdf\"");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn cover_letter_is_served_inline_as_pdf() {
    let Some(app) = system_app() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let body = json!({
        "data": {
            "applicant": { "fullName": "Jane Doe" },
            "recipient": { "company": "ACME", "role": "Engineer" },
            "body": "Hello.\n\nBye."
        }
    })
    .to_string();
    let response = app.oneshot(post("/cover-letter", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"cover-letter.pdf\""
    );
}
