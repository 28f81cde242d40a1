pub mod catalog;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ats::handlers::handle_ats_report;
use crate::render::handlers::handle_render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route("/api/v1/templates", get(catalog::handle_list_templates))
        .route("/api/v1/fonts", get(catalog::handle_list_fonts))
        // Render API
        .route("/api/v1/render/:target", post(handle_render))
        // ATS API
        .route("/api/v1/ats/report", post(handle_ats_report))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get_json(build_router(test_state(dir.path())), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "cv-builder-api");
    }

    #[tokio::test]
    async fn test_templates_listing() {
        let dir = TempDir::new().unwrap();
        let (status, body) =
            get_json(build_router(test_state(dir.path())), "/api/v1/templates").await;
        assert_eq!(status, StatusCode::OK);
        let templates = body.as_array().unwrap();
        assert_eq!(templates.len(), 5);
        assert_eq!(templates[0]["key"], "modern_sidebar");
        assert_eq!(templates[0]["display_name"], "Modern Sidebar");
        assert_eq!(templates[0]["layout_family"], "two_region");
        assert_eq!(templates[1]["display_name"], "Classic Professional");
        assert_eq!(templates[1]["layout_family"], "single_region");
        assert_eq!(templates[2]["shows_photo"], false);
    }

    #[tokio::test]
    async fn test_fonts_listing() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get_json(build_router(test_state(dir.path())), "/api/v1/fonts").await;
        assert_eq!(status, StatusCode::OK);
        let fonts = body.as_array().unwrap();
        assert_eq!(fonts.len(), 4);
        assert_eq!(fonts[0]["name"], "Helvetica");
        assert_eq!(fonts[1]["docx"], "Times New Roman");
        assert_eq!(fonts[3]["pdf"], "Helvetica");
    }

    #[tokio::test]
    async fn test_body_limit_rejects_oversized_payloads() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(dir.path());
        state.config.max_body_bytes = 64;
        let app = build_router(state);

        let payload = format!(r#"{{"summary":"{}"}}"#, "x".repeat(256));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/ats/report")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
