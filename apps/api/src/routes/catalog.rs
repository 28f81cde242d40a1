//! Read-only listings the editor uses to populate its pickers.

use axum::Json;
use serde::Serialize;

use crate::layout::{strategy_for, PhotoPlacement};
use crate::models::{FontFamily, RenderTarget, TemplateStyle};
use crate::style::resolve_font;

#[derive(Debug, Serialize)]
pub struct TemplateDescriptor {
    pub key: &'static str,
    pub display_name: &'static str,
    pub layout_family: &'static str,
    pub shows_photo: bool,
}

#[derive(Debug, Serialize)]
pub struct FontDescriptor {
    pub name: &'static str,
    pub pdf: &'static str,
    pub docx: &'static str,
    pub html: &'static str,
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateDescriptor>> {
    let templates = TemplateStyle::ALL
        .into_iter()
        .map(|style| {
            let strategy = strategy_for(style);
            TemplateDescriptor {
                key: style.key(),
                display_name: style.display_name(),
                layout_family: strategy.family().label(),
                shows_photo: strategy.photo_placement() != PhotoPlacement::None,
            }
        })
        .collect();
    Json(templates)
}

/// GET /api/v1/fonts
/// The first entry is the fallback for unknown names.
pub async fn handle_list_fonts() -> Json<Vec<FontDescriptor>> {
    let fonts = FontFamily::ALL
        .into_iter()
        .map(|family| FontDescriptor {
            name: family.name(),
            pdf: resolve_font(family, RenderTarget::Pdf),
            docx: resolve_font(family, RenderTarget::Docx),
            html: resolve_font(family, RenderTarget::Html),
        })
        .collect();
    Json(fonts)
}
