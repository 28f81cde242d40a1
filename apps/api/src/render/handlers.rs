//! Axum route handlers for the Render API.

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info_span;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CvDocument, RenderSettings, RenderTarget};
use crate::render::render;
use crate::state::AppState;

pub const RENDER_ID_HEADER: &str = "x-render-id";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub cv: CvDocument,
    #[serde(default)]
    pub settings: RenderSettings,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/render/:target
///
/// Renders the posted record to `pdf`, `docx` or `html` and streams the bytes
/// back with a download filename derived from the candidate's name.
pub async fn handle_render(
    State(state): State<AppState>,
    Path(target): Path<String>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let target = RenderTarget::from_key(&target).ok_or_else(|| {
        AppError::Validation(format!(
            "Unknown render target '{target}', expected one of pdf, docx, html"
        ))
    })?;

    let render_id = Uuid::new_v4();
    let span = info_span!("render", %render_id, target = target.extension());
    let filename = format!("{}.{}", request.cv.file_stem(), target.extension());
    let env = state.render_env.clone();

    let bytes = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        render(&request.cv, &request.settings, target, &env)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    let disposition = match target {
        RenderTarget::Html => format!("inline; filename=\"{filename}\""),
        _ => format!("attachment; filename=\"{filename}\""),
    };

    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static(target.mime_type()),
        ),
        (header::CONTENT_DISPOSITION, header_value(&disposition)?),
        (
            HeaderName::from_static(RENDER_ID_HEADER),
            header_value(&render_id.to_string())?,
        ),
    ];

    Ok((headers, bytes).into_response())
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid header value '{value}': {e}")))
}
