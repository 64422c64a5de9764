//! End-to-end HTTP contract tests: boot the router in-process and drive
//! each endpoint with `tower::ServiceExt::oneshot`, the same way the
//! inline tests in `src/lib.rs` do, isolated here as a dedicated
//! integration target.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use cdl_api::{create_router, Config};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = create_router(&Config::default());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn validate_accepts_well_formed_cdl() {
    let app = create_router(&Config::default());
    let payload = serde_json::json!({ "cdl": "cubic[m3m]:{100}@1" });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/validate")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["valid"], true);
}

#[tokio::test]
async fn validate_rejects_empty_input() {
    let app = create_router(&Config::default());
    let payload = serde_json::json!({ "cdl": "" });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/validate")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["valid"], false);
}

#[tokio::test]
async fn render_get_returns_svg() {
    let app = create_router(&Config::default());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/render?cdl=cubic%5Bm3m%5D%3A%7B100%7D%401")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("<svg"));
}

#[tokio::test]
async fn export_stl_sets_attachment_headers() {
    let app = create_router(&Config::default());
    let payload = serde_json::json!({ "cdl": "cubic[m3m]:{100}@1", "scale": 10.0 });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/export/stl")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("crystal.stl"));
}

#[tokio::test]
async fn export_gltf_returns_well_formed_document() {
    let app = create_router(&Config::default());
    let payload = serde_json::json!({ "cdl": "cubic[m3m]:{111}@1", "scale": 1.0 });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/export/gltf")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["asset"]["version"], "2.0");
}

#[tokio::test]
async fn malformed_cdl_returns_bad_request() {
    let app = create_router(&Config::default());
    let payload = serde_json::json!({ "cdl": "" });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/render")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
