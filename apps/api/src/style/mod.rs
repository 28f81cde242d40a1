//! Style Resolver — turns raw style inputs into drawing primitives.
//!
//! Nothing in here fails: malformed colours resolve to `FALLBACK_COLOR` and
//! unknown font names resolve to the default family, with a warning logged.

pub mod font_metrics;

use serde::Serialize;
use tracing::warn;

use crate::models::{FontFamily, RenderSettings, RenderTarget};

/// Mid-blue used whenever a colour string cannot be parsed.
pub const FALLBACK_COLOR: Rgb = Rgb::new(37, 99, 235);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Components scaled to 0.0–1.0 for PDF colour operators.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }

    /// `RRGGBB` without a leading `#`, the form WordprocessingML expects.
    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `#rrggbb` for CSS.
    pub fn css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Blend towards white; `amount` 0.0 keeps the colour, 1.0 is white.
    pub fn tint(self, amount: f32) -> Rgb {
        let t = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * t).round() as u8;
        Rgb::new(mix(self.r), mix(self.g), mix(self.b))
    }
}

/// Parses `#rrggbb`, `rrggbb`, `#rgb` or `rgb`. Three-digit forms double each
/// digit (`1e4` → `11ee44`). Anything else yields `FALLBACK_COLOR`.
pub fn resolve_color(hex: &str) -> Rgb {
    match parse_hex(hex) {
        Some(rgb) => rgb,
        None => {
            warn!("Malformed colour '{hex}', using fallback {}", FALLBACK_COLOR.css());
            FALLBACK_COLOR
        }
    }
}

fn parse_hex(input: &str) -> Option<Rgb> {
    let digits = input.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Logical family for a font name. Unrecognised names resolve to the first
/// enumerated family. `FontFamily`'s deserializer goes through here, so every
/// `RenderSettings` already carries a resolved family.
pub fn resolve_family(name: &str) -> FontFamily {
    FontFamily::from_name(name).unwrap_or_else(|| {
        warn!("Unknown font '{name}', using {}", FontFamily::default().name());
        FontFamily::default()
    })
}

/// Concrete font identifier of a family for one render target.
pub fn resolve_font(family: FontFamily, target: RenderTarget) -> &'static str {
    match target {
        // Base-14 faces only; Arial has no PDF core font and maps to Helvetica.
        RenderTarget::Pdf => match family {
            FontFamily::Helvetica | FontFamily::Arial => "Helvetica",
            FontFamily::Times => "Times-Roman",
            FontFamily::Courier => "Courier",
        },
        RenderTarget::Docx => match family {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::Times => "Times New Roman",
            FontFamily::Courier => "Courier New",
            FontFamily::Arial => "Arial",
        },
        RenderTarget::Html => match family {
            FontFamily::Helvetica => "Helvetica, Arial, sans-serif",
            FontFamily::Times => "'Times New Roman', Times, serif",
            FontFamily::Courier => "'Courier New', Courier, monospace",
            FontFamily::Arial => "Arial, Helvetica, sans-serif",
        },
    }
}

/// Text weight/slant combinations used by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 4] = [
        FontStyle::Regular,
        FontStyle::Bold,
        FontStyle::Italic,
        FontStyle::BoldItalic,
    ];

    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }
}

/// PostScript name of a base-14 face for the family and style.
pub fn pdf_face(family: FontFamily, style: FontStyle) -> &'static str {
    match (resolve_font(family, RenderTarget::Pdf), style) {
        ("Times-Roman", FontStyle::Regular) => "Times-Roman",
        ("Times-Roman", FontStyle::Bold) => "Times-Bold",
        ("Times-Roman", FontStyle::Italic) => "Times-Italic",
        ("Times-Roman", FontStyle::BoldItalic) => "Times-BoldItalic",
        ("Courier", FontStyle::Regular) => "Courier",
        ("Courier", FontStyle::Bold) => "Courier-Bold",
        ("Courier", FontStyle::Italic) => "Courier-Oblique",
        ("Courier", FontStyle::BoldItalic) => "Courier-BoldOblique",
        (_, FontStyle::Regular) => "Helvetica",
        (_, FontStyle::Bold) => "Helvetica-Bold",
        (_, FontStyle::Italic) => "Helvetica-Oblique",
        (_, FontStyle::BoldItalic) => "Helvetica-BoldOblique",
    }
}

/// Colours every renderer draws with, resolved once per render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Headings, sidebar fill, banner fill.
    pub base: Rgb,
    /// Position line, organisation names, timeline markers.
    pub accent: Rgb,
    /// Text drawn on top of `base`.
    pub on_base: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
}

impl Palette {
    pub fn resolve(settings: &RenderSettings) -> Self {
        Self {
            base: resolve_color(&settings.base_color),
            accent: resolve_color(&settings.accent_color),
            on_base: Rgb::WHITE,
            text: Rgb::BLACK,
            muted: Rgb::grey(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_digit_hex() {
        assert_eq!(resolve_color("#2563eb"), Rgb::new(37, 99, 235));
        assert_eq!(resolve_color("1E40AF"), Rgb::new(30, 64, 175));
    }

    #[test]
    fn test_three_digit_hex_doubles_each_digit() {
        assert_eq!(resolve_color("#1e4"), Rgb::new(0x11, 0xee, 0x44));
        assert_eq!(resolve_color("fff"), Rgb::WHITE);
    }

    #[test]
    fn test_malformed_hex_uses_fallback() {
        for bad in ["", "#", "#12345", "#1234567", "#gg0000", "blue", "##123456", "#12 456"] {
            assert_eq!(resolve_color(bad), FALLBACK_COLOR, "input {bad:?}");
        }
    }

    #[test]
    fn test_every_valid_hex_stays_in_range() {
        // u8 components are in range by construction; check parsing never panics
        // on the extremes of both lengths.
        for hex in ["000", "fff", "000000", "ffffff", "#AbC", "#a1B2c3"] {
            let c = resolve_color(hex);
            assert_ne!(c, FALLBACK_COLOR, "input {hex:?}");
        }
    }

    #[test]
    fn test_resolve_font_per_target() {
        assert_eq!(resolve_font(FontFamily::Times, RenderTarget::Pdf), "Times-Roman");
        assert_eq!(resolve_font(FontFamily::Times, RenderTarget::Docx), "Times New Roman");
        assert!(resolve_font(FontFamily::Courier, RenderTarget::Html).ends_with("monospace"));
        assert_eq!(resolve_font(FontFamily::Arial, RenderTarget::Pdf), "Helvetica");
        assert_eq!(resolve_font(FontFamily::Arial, RenderTarget::Docx), "Arial");
    }

    #[test]
    fn test_unknown_font_falls_back_to_default_family() {
        assert_eq!(resolve_family("Times New Roman"), FontFamily::Times);
        assert_eq!(resolve_family("Wingdings"), FontFamily::Helvetica);
        assert_eq!(resolve_family(""), FontFamily::Helvetica);
        assert_eq!(resolve_font(resolve_family("Wingdings"), RenderTarget::Docx), "Helvetica");
    }

    #[test]
    fn test_pdf_faces() {
        assert_eq!(pdf_face(FontFamily::Times, FontStyle::BoldItalic), "Times-BoldItalic");
        assert_eq!(pdf_face(FontFamily::Arial, FontStyle::Italic), "Helvetica-Oblique");
        assert_eq!(pdf_face(FontFamily::Courier, FontStyle::Bold), "Courier-Bold");
    }

    #[test]
    fn test_colour_formats() {
        let c = Rgb::new(37, 99, 235);
        assert_eq!(c.hex(), "2563EB");
        assert_eq!(c.css(), "#2563eb");
        assert_eq!(Rgb::BLACK.tint(1.0), Rgb::WHITE);
        assert_eq!(c.tint(0.0), c);
    }
}
