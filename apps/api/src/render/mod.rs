// Multi-format rendering engine.
// One `RenderContext` (record + settings + strategy plan + palette + photo)
// feeds whichever format renderer the caller asked for.

pub mod docx;
pub mod handlers;
pub mod html;
pub mod pdf;
pub mod photo;

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::layout::{
    strategy_for, LayoutFamily, LayoutPlan, LayoutStrategy, PhotoPlacement, Region, SidebarFill,
};
use crate::models::{CvDocument, RenderSettings, RenderTarget};
use crate::style::{Palette, Rgb};

use photo::{with_photo, ScopedPhoto};

/// Output-generation failures. Style and content defects never end up here;
/// they degrade to fallbacks and placeholders instead.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("DOCX generation failed: {0}")]
    Docx(String),

    #[error("Photo processing failed: {0}")]
    Photo(String),

    #[error("Scratch file error: {0}")]
    Scratch(#[source] std::io::Error),
}

/// Process-level resources a render call may touch.
#[derive(Debug, Clone)]
pub struct RenderEnv {
    /// Directory the scoped photo resource is materialised in.
    pub scratch_dir: PathBuf,
}

/// Text colours of one region once the fill behind it is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionColors {
    pub text: Rgb,
    /// Name and section headings.
    pub title: Rgb,
    /// Position line and organisation names.
    pub detail: Rgb,
    /// Dates and the contact bar.
    pub muted: Rgb,
}

/// Everything a format renderer needs, passed explicitly.
pub struct RenderContext<'a> {
    pub cv: &'a CvDocument,
    pub settings: &'a RenderSettings,
    pub strategy: &'static dyn LayoutStrategy,
    pub plan: LayoutPlan,
    pub palette: Palette,
    pub photo: Option<&'a ScopedPhoto>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        cv: &'a CvDocument,
        settings: &'a RenderSettings,
        photo: Option<&'a ScopedPhoto>,
    ) -> Self {
        let strategy = strategy_for(settings.template_style);
        Self {
            cv,
            settings,
            strategy,
            plan: strategy.plan(cv),
            palette: Palette::resolve(settings),
            photo,
        }
    }

    /// Background fill of a region, if the template paints one.
    pub fn region_fill(&self, region: Region) -> Option<Rgb> {
        match (region, self.strategy.family()) {
            (Region::Sidebar, LayoutFamily::TwoRegion { .. }) => {
                Some(match self.strategy.sidebar_fill() {
                    SidebarFill::Solid => self.palette.base,
                    SidebarFill::Tint => self.palette.base.tint(0.9),
                })
            }
            (Region::Masthead, _) => self.strategy.masthead_band().map(|_| self.palette.base),
            _ => None,
        }
    }

    pub fn colors(&self, region: Region) -> RegionColors {
        let on_base = match region {
            Region::Sidebar => self.strategy.sidebar_fill() == SidebarFill::Solid,
            Region::Masthead => self.strategy.masthead_band().is_some(),
            _ => false,
        };
        let p = self.palette;
        if on_base {
            RegionColors {
                text: p.on_base,
                title: p.on_base,
                detail: p.on_base,
                muted: p.on_base,
            }
        } else {
            RegionColors {
                text: p.text,
                title: p.base,
                detail: p.accent,
                muted: p.muted,
            }
        }
    }
}

/// Renders one document to one target. Same inputs give byte-identical output.
pub fn render(
    cv: &CvDocument,
    settings: &RenderSettings,
    target: RenderTarget,
    env: &RenderEnv,
) -> Result<Vec<u8>, RenderError> {
    let strategy = strategy_for(settings.template_style);
    let photo_bytes = match strategy.photo_placement() {
        PhotoPlacement::None => None,
        _ => cv.personal_info.photo.as_deref(),
    };

    let bytes = with_photo(photo_bytes, &env.scratch_dir, |photo| {
        let ctx = RenderContext::new(cv, settings, photo);
        match target {
            RenderTarget::Pdf => pdf::render(&ctx),
            RenderTarget::Docx => docx::render(&ctx),
            RenderTarget::Html => html::render(&ctx).map(String::into_bytes),
        }
    })?;

    info!(
        "Rendered {:?} with template {} ({} bytes)",
        target,
        settings.template_style.key(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{long_cv, sample_cv, sample_cv_with_photo};
    use crate::models::TemplateStyle;
    use tempfile::TempDir;

    const TARGETS: [RenderTarget; 3] = [RenderTarget::Pdf, RenderTarget::Docx, RenderTarget::Html];

    fn env(dir: &TempDir) -> RenderEnv {
        RenderEnv {
            scratch_dir: dir.path().to_path_buf(),
        }
    }

    fn settings_for(style: TemplateStyle) -> RenderSettings {
        RenderSettings {
            template_style: style,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn test_empty_cv_renders_on_every_target_and_template() {
        let dir = TempDir::new().unwrap();
        let cv = CvDocument::default();
        for style in TemplateStyle::ALL {
            for target in TARGETS {
                let bytes = render(&cv, &settings_for(style), target, &env(&dir))
                    .unwrap_or_else(|e| panic!("{style:?}/{target:?}: {e}"));
                assert!(!bytes.is_empty(), "{style:?}/{target:?}");
            }
        }
    }

    #[test]
    fn test_photo_render_leaves_no_scratch_files() {
        let dir = TempDir::new().unwrap();
        let cv = sample_cv_with_photo();
        for style in TemplateStyle::ALL {
            for target in TARGETS {
                render(&cv, &settings_for(style), target, &env(&dir)).unwrap();
                assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
            }
        }
    }

    #[test]
    fn test_undecodable_photo_still_renders() {
        let dir = TempDir::new().unwrap();
        let cv = sample_cv(); // photo bytes are [1, 2, 3, 4]
        for target in TARGETS {
            assert!(render(&cv, &RenderSettings::default(), target, &env(&dir)).is_ok());
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let cv = long_cv();
        for style in TemplateStyle::ALL {
            for target in TARGETS {
                let a = render(&cv, &settings_for(style), target, &env(&dir)).unwrap();
                let b = render(&cv, &settings_for(style), target, &env(&dir)).unwrap();
                assert_eq!(a, b, "{style:?}/{target:?}");
            }
        }
    }

    #[test]
    fn test_explicit_line_breaks_survive_every_target() {
        let dir = TempDir::new().unwrap();
        let mut cv = sample_cv();
        cv.experience[0].description = "Line one\nLine two".to_string();
        let settings = settings_for(TemplateStyle::ClassicVertical);

        let pdf = render(&cv, &settings, RenderTarget::Pdf, &env(&dir)).unwrap();
        let text = pdf_extract::extract_text_from_mem(&pdf).unwrap();
        let (one, two) = (text.find("Line one").unwrap(), text.find("Line two").unwrap());
        assert!(text[one..two].contains('\n'), "{text}");

        let html = render(&cv, &settings, RenderTarget::Html, &env(&dir)).unwrap();
        let html = String::from_utf8(html).unwrap();
        assert!(html.contains("<p>Line one\nLine two</p>"));
        assert!(html.contains("white-space: pre-line"));

        let docx = render(&cv, &settings, RenderTarget::Docx, &env(&dir)).unwrap();
        let json = docx_rs::read_docx(&docx).unwrap().json();
        assert!(json.contains("\"Line one\""));
        assert!(json.contains("\"Line two\""));
    }

    #[test]
    fn test_region_colours_follow_fills() {
        let cv = sample_cv();
        let settings = RenderSettings::default();
        let ctx = RenderContext::new(&cv, &settings, None);
        assert_eq!(ctx.region_fill(Region::Sidebar), Some(ctx.palette.base));
        assert_eq!(ctx.colors(Region::Sidebar).text, Rgb::WHITE);
        assert_eq!(ctx.colors(Region::Main).title, ctx.palette.base);
        assert_eq!(ctx.region_fill(Region::Main), None);

        let settings = settings_for(TemplateStyle::Executive);
        let ctx = RenderContext::new(&cv, &settings, None);
        assert_eq!(ctx.region_fill(Region::Sidebar), Some(ctx.palette.base.tint(0.9)));
        assert_eq!(ctx.colors(Region::Sidebar).text, ctx.palette.text);
        assert_eq!(ctx.colors(Region::Masthead).title, Rgb::WHITE);
    }

    #[test]
    fn test_bad_colours_and_fonts_do_not_fail() {
        let dir = TempDir::new().unwrap();
        let settings = RenderSettings {
            base_color: "not-a-colour".to_string(),
            accent_color: "#12".to_string(),
            ..RenderSettings::default()
        };
        for target in TARGETS {
            assert!(render(&sample_cv(), &settings, target, &env(&dir)).is_ok());
        }
    }
}
