//! Presentation settings supplied alongside a `CvDocument` on every render call.

use serde::{Deserialize, Deserializer, Serialize};

/// The five supported layout variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStyle {
    #[default]
    ModernSidebar,
    ClassicVertical,
    MinimalClean,
    Executive,
    Creative,
}

impl TemplateStyle {
    pub const ALL: [TemplateStyle; 5] = [
        TemplateStyle::ModernSidebar,
        TemplateStyle::ClassicVertical,
        TemplateStyle::MinimalClean,
        TemplateStyle::Executive,
        TemplateStyle::Creative,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TemplateStyle::ModernSidebar => "modern_sidebar",
            TemplateStyle::ClassicVertical => "classic_vertical",
            TemplateStyle::MinimalClean => "minimal_clean",
            TemplateStyle::Executive => "executive",
            TemplateStyle::Creative => "creative",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TemplateStyle::ModernSidebar => "Modern Sidebar",
            TemplateStyle::ClassicVertical => "Classic Professional",
            TemplateStyle::MinimalClean => "Minimalist Clean",
            TemplateStyle::Executive => "Executive",
            TemplateStyle::Creative => "Creative",
        }
    }
}

/// Logical font families. Each maps to a different concrete name per render
/// target (see `style::resolve_font`); unknown names go through
/// `style::resolve_family`. The first variant is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
    Arial,
}

impl FontFamily {
    pub const ALL: [FontFamily; 4] = [
        FontFamily::Helvetica,
        FontFamily::Times,
        FontFamily::Courier,
        FontFamily::Arial,
    ];

    /// Case-insensitive lookup by logical name. Common concrete aliases
    /// ("Times New Roman", "Courier New") are accepted too.
    pub fn from_name(name: &str) -> Option<FontFamily> {
        match name.trim().to_ascii_lowercase().as_str() {
            "helvetica" => Some(FontFamily::Helvetica),
            "times" | "times new roman" | "times-roman" => Some(FontFamily::Times),
            "courier" | "courier new" => Some(FontFamily::Courier),
            "arial" => Some(FontFamily::Arial),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::Times => "Times",
            FontFamily::Courier => "Courier",
            FontFamily::Arial => "Arial",
        }
    }
}

// Unknown font names degrade to the default family instead of failing the request.
impl<'de> Deserialize<'de> for FontFamily {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let name = String::deserialize(d)?;
        Ok(crate::style::resolve_family(&name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub template_style: TemplateStyle,
    pub font_family: FontFamily,
    /// Hex colour, e.g. `#2563eb`. Malformed values fall back at resolve time.
    pub base_color: String,
    pub accent_color: String,
    /// Body text size in points, 8–12 by convention.
    pub font_size_body: u32,
    /// Name heading size in points.
    pub font_size_header: u32,
    /// Gap after each section, in page units (mm).
    pub section_spacing: u32,
    /// Only the markup target honours this.
    pub theme: Theme,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            template_style: TemplateStyle::default(),
            font_family: FontFamily::default(),
            base_color: "#2563eb".to_string(),
            accent_color: "#1e40af".to_string(),
            font_size_body: 10,
            font_size_header: 24,
            section_spacing: 5,
            theme: Theme::default(),
        }
    }
}

impl RenderSettings {
    /// Body size with non-positive input pulled up to something drawable.
    pub fn body_size(&self) -> f32 {
        self.font_size_body.max(4) as f32
    }

    pub fn header_size(&self) -> f32 {
        self.font_size_header.max(8) as f32
    }

    /// Footer size: two points below the body size, never under 6pt.
    pub fn footer_size(&self) -> f32 {
        (self.body_size() - 2.0).max(6.0)
    }
}

/// The three output forms a render call can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderTarget {
    /// Paginated print document.
    Pdf,
    /// Editable word-processor document.
    Docx,
    /// Live styled preview markup.
    Html,
}

impl RenderTarget {
    pub const ALL: [RenderTarget; 3] = [RenderTarget::Pdf, RenderTarget::Docx, RenderTarget::Html];

    /// Lookup by the lowercase key used in request paths.
    pub fn from_key(key: &str) -> Option<RenderTarget> {
        RenderTarget::ALL
            .into_iter()
            .find(|t| t.extension() == key.to_ascii_lowercase())
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            RenderTarget::Pdf => "application/pdf",
            RenderTarget::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            RenderTarget::Html => "text/html; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            RenderTarget::Pdf => "pdf",
            RenderTarget::Docx => "docx",
            RenderTarget::Html => "html",
        }
    }
}
