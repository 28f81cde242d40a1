//! Axum route handlers for the ATS API.

use axum::Json;

use crate::ats::AtsReport;
use crate::models::CvDocument;

/// POST /api/v1/ats/report
///
/// Scores the posted record and lists what to improve. Never fails once the
/// body has deserialized.
pub async fn handle_ats_report(Json(cv): Json<CvDocument>) -> Json<AtsReport> {
    let report = AtsReport::for_cv(&cv);
    tracing::info!("ATS report: score {}", report.score);
    Json(report)
}

#[cfg(test)]
mod tests {
    use crate::routes::build_router;
    use crate::state::test_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_report_endpoint_scores_scenario_a() {
        let dir = TempDir::new().unwrap();
        let app = build_router(test_state(dir.path()));
        let body = json!({
            "personal_info": {
                "name": "Ada Lovelace",
                "email": "ada@x.com",
                "target_position": "Engineer"
            },
            "skills": ["Mathematics", "Poetry"]
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/ats/report")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["score"], 30);
        let suggestions = value["suggestions"].as_array().unwrap();
        assert_eq!(suggestions.len(), 4);
        assert!(suggestions[0].as_str().unwrap().starts_with("Your ATS score"));
    }
}
