//! Markup Renderer: one self-contained HTML page per render call.
//!
//! Styling is an embedded stylesheet generated from the resolved palette;
//! the only non-CSS asset, the photo, travels inline as a data URI. Unlike the
//! fixed-page targets this one honours the dark theme and collapses two-region
//! layouts into a single column on narrow viewports.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::layout::{
    skills_for, Alignment, ContactStyle, EntryMarker, HeadingStyle, LayoutFamily, PhotoPlacement,
    Region, Section, SectionCursor, SidePosition, SidebarFill, SkillStyle, PAGE_WIDTH_MM,
};
use crate::models::{RenderTarget, Theme};
use crate::render::{RenderContext, RenderError};
use crate::style::{resolve_font, Rgb};

/// Viewport width below which columns stack.
const NARROW_VIEWPORT_PX: u32 = 640;

pub fn render(ctx: &RenderContext<'_>) -> Result<String, RenderError> {
    let mut writer = HtmlWriter::new(ctx);
    ctx.plan.render_sections(&mut writer)?;
    let body = writer.assemble();
    let css = stylesheet(ctx);

    let page = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (ctx.cv.display_name()) " - CV" }
                style { (PreEscaped(css)) }
            }
            body {
                (body)
            }
        }
    };
    Ok(page.into_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Colour scheme
// ────────────────────────────────────────────────────────────────────────────

struct Scheme {
    page: Rgb,
    text: Rgb,
    muted: Rgb,
    title: Rgb,
    accent: Rgb,
    side_bg: Option<Rgb>,
    side_text: Rgb,
    side_title: Rgb,
    band_bg: Rgb,
    band_text: Rgb,
    tag_bg: Rgb,
    tag_text: Rgb,
}

impl Scheme {
    fn resolve(ctx: &RenderContext<'_>) -> Self {
        let p = ctx.palette;
        let side = ctx.colors(Region::Sidebar);
        let side_fill = ctx.region_fill(Region::Sidebar);
        match ctx.settings.theme {
            Theme::Light => Scheme {
                page: Rgb::WHITE,
                text: p.text,
                muted: p.muted,
                title: p.base,
                accent: p.accent,
                side_bg: side_fill,
                side_text: side.text,
                side_title: side.title,
                band_bg: p.base,
                band_text: p.on_base,
                tag_bg: p.base.tint(0.85),
                tag_text: p.base,
            },
            Theme::Dark => {
                let solid = ctx.strategy.sidebar_fill() == SidebarFill::Solid;
                let text = Rgb::new(229, 231, 235);
                let title = p.base.tint(0.35);
                Scheme {
                    page: Rgb::new(17, 24, 39),
                    text,
                    muted: Rgb::new(156, 163, 175),
                    title,
                    accent: p.accent.tint(0.35),
                    side_bg: side_fill.map(|fill| if solid { fill } else { Rgb::new(31, 41, 55) }),
                    side_text: if solid { p.on_base } else { text },
                    side_title: if solid { p.on_base } else { title },
                    band_bg: p.base,
                    band_text: p.on_base,
                    tag_bg: p.base,
                    tag_text: p.on_base,
                }
            }
        }
    }
}

fn stylesheet(ctx: &RenderContext<'_>) -> String {
    let s = Scheme::resolve(ctx);
    let settings = ctx.settings;
    let body = settings.body_size();
    let header = settings.header_size();
    let font = resolve_font(settings.font_family, RenderTarget::Html);
    let side_pct = match ctx.strategy.family() {
        LayoutFamily::TwoRegion { side_width_mm, .. } => side_width_mm / PAGE_WIDTH_MM * 100.0,
        LayoutFamily::SingleRegion => 0.0,
    };
    let band_height = ctx.strategy.masthead_band().map_or(0.0, |b| b.height_mm);
    let side_bg = s
        .side_bg
        .map_or_else(|| "transparent".to_string(), Rgb::css);

    format!(
        r#"* {{ box-sizing: border-box; }}
body {{ margin: 0; background: {page}; color: {text}; font-family: {font}; font-size: {body}pt; line-height: 1.45; }}
.cv {{ max-width: 210mm; margin: 0 auto; }}
.columns {{ display: flex; align-items: stretch; }}
.sidebar {{ flex: 0 0 {side_pct:.1}%; background: {side_bg}; color: {side_text}; padding: 8mm 6mm; }}
.sidebar .heading {{ color: {side_title}; }}
.main {{ flex: 1; padding: 8mm; }}
.single {{ padding: 8mm 15mm; }}
.masthead {{ padding: 8mm 15mm; overflow: hidden; }}
.masthead.band {{ background: {band_bg}; color: {band_text}; min-height: {band_height}mm; }}
.masthead.band .name, .masthead.band .position, .masthead.band .contact-bar {{ color: {band_text}; }}
.name {{ font-size: {header}pt; color: {title}; margin: 0; line-height: 1.15; }}
.position {{ font-size: {position}pt; color: {accent}; margin: 1mm 0 2mm; }}
.contact-bar {{ color: {muted}; margin: 0; }}
.section {{ margin-bottom: {spacing}mm; }}
.heading {{ font-size: {heading}pt; text-transform: uppercase; color: {title}; margin: 0 0 2mm; }}
.heading-underline {{ border-bottom: 1.5px solid currentColor; padding-bottom: 1mm; }}
.heading-banner {{ background: {title}; color: {band_text}; padding: 1mm 2mm; }}
.heading-accent-bar {{ border-left: 2mm solid {accent}; padding-left: 2mm; }}
.entry {{ margin-bottom: 3mm; position: relative; }}
.entry-title {{ display: flex; justify-content: space-between; gap: 4mm; }}
.period {{ color: {muted}; white-space: nowrap; }}
.org {{ color: {accent}; font-style: italic; }}
.entry p, .summary {{ margin: 0.5mm 0; white-space: pre-line; }}
.entry.timeline {{ padding-left: 7mm; }}
.entry.timeline::before {{ content: ""; position: absolute; left: 0; top: 1.2mm; width: 3.2mm; height: 3.2mm; border-radius: 50%; background: {accent}; }}
.entry.timeline::after {{ content: ""; position: absolute; left: 1.45mm; top: 4.4mm; bottom: -2mm; width: 0.3mm; background: {accent}; }}
ul.items {{ margin: 0; padding-left: 4mm; }}
.tags {{ display: flex; flex-wrap: wrap; gap: 2mm; }}
.tag {{ background: {tag_bg}; color: {tag_text}; padding: 0.5mm 2mm; border-radius: 3mm; }}
.align-center {{ text-align: center; }}
.align-center .entry-title {{ justify-content: center; }}
.align-center ul.items {{ list-style: none; padding-left: 0; }}
.photo {{ display: block; }}
.photo-sidebar {{ width: 100%; max-width: 40mm; margin: 0 auto 5mm; }}
.photo-header {{ float: right; width: 30mm; margin-left: 5mm; }}
@media (max-width: {narrow}px) {{
  .columns {{ flex-direction: column; }}
  .sidebar {{ flex-basis: auto; }}
  .name {{ font-size: {header_narrow}pt; }}
  .heading {{ font-size: {heading_narrow}pt; }}
  .photo-header {{ float: none; margin: 0 0 3mm; }}
}}
"#,
        page = s.page.css(),
        text = s.text.css(),
        muted = s.muted.css(),
        title = s.title.css(),
        accent = s.accent.css(),
        side_text = s.side_text.css(),
        side_title = s.side_title.css(),
        band_bg = s.band_bg.css(),
        band_text = s.band_text.css(),
        tag_bg = s.tag_bg.css(),
        tag_text = s.tag_text.css(),
        position = body + 3.0,
        heading = body + 2.0,
        spacing = settings.section_spacing,
        narrow = NARROW_VIEWPORT_PX,
        header_narrow = (header * 0.75).round(),
        heading_narrow = body + 1.0,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Markup
// ────────────────────────────────────────────────────────────────────────────

struct HtmlWriter<'c> {
    ctx: &'c RenderContext<'c>,
    regions: Vec<(Region, Markup)>,
    current: Vec<Markup>,
    photo_uri: Option<String>,
}

impl<'c> HtmlWriter<'c> {
    fn new(ctx: &'c RenderContext<'c>) -> Self {
        Self {
            ctx,
            regions: Vec::new(),
            current: Vec::new(),
            photo_uri: None,
        }
    }

    fn photo(&mut self, class: &str) -> Result<Option<Markup>, RenderError> {
        let Some(photo) = self.ctx.photo else {
            return Ok(None);
        };
        if self.photo_uri.is_none() {
            let png = photo.png_bytes()?;
            self.photo_uri = Some(format!("data:image/png;base64,{}", STANDARD.encode(png)));
        }
        Ok(self.photo_uri.as_deref().map(|uri| {
            html! { img class={ "photo " (class) } src=(uri) alt="Profile photo"; }
        }))
    }

    fn heading(&self, region: Region, section: Section) -> Markup {
        let class = match self.ctx.strategy.heading_style(region) {
            HeadingStyle::Underline => "heading-underline",
            HeadingStyle::Banner => "heading-banner",
            HeadingStyle::Caps => "heading-caps",
            HeadingStyle::AccentBar => "heading-accent-bar",
        };
        html! { h2 class={ "heading " (class) } { (section.title()) } }
    }

    fn items(&self, items: &[&str], style: SkillStyle) -> Markup {
        html! {
            @match style {
                SkillStyle::List => { ul.items { @for item in items { li { (item) } } } }
                SkillStyle::Inline => { p.inline-items { (items.join(", ")) } }
                SkillStyle::Tags => { div.tags { @for item in items { span.tag { (item) } } } }
            }
        }
    }

    fn header(&mut self) -> Result<Markup, RenderError> {
        let photo = match self.ctx.strategy.photo_placement() {
            PhotoPlacement::HeaderRight => self.photo("photo-header")?,
            _ => None,
        };
        let cv = self.ctx.cv;
        Ok(html! {
            @if let Some(photo) = photo { (photo) }
            h1.name { (cv.display_name()) }
            p.position { (cv.display_position()) }
        })
    }

    fn section(&mut self, region: Region, section: Section) -> Result<Markup, RenderError> {
        let cv = self.ctx.cv;
        let strategy = self.ctx.strategy;
        let body = match section {
            Section::Header => self.header()?,
            Section::Contact => match strategy.contact_style() {
                ContactStyle::List => html! {
                    (self.heading(region, section))
                    ul.items.contact { @for line in cv.contact_lines() { li { (line) } } }
                },
                ContactStyle::InlineBar => html! { p.contact-bar { (cv.contact_bar()) } },
            },
            Section::Summary => html! {
                (self.heading(region, section))
                p.summary { (cv.summary.trim()) }
            },
            Section::Experience => {
                let timeline = strategy.entry_marker() == EntryMarker::Timeline;
                html! {
                    (self.heading(region, section))
                    @for entry in &cv.experience {
                        div.entry.timeline[timeline] {
                            div.entry-title {
                                strong { (entry.role.trim()) }
                                @if !entry.period.trim().is_empty() {
                                    span.period { (entry.period.trim()) }
                                }
                            }
                            @if !entry.organization.trim().is_empty() {
                                div.org { (entry.organization.trim()) }
                            }
                            @if !entry.description.trim().is_empty() {
                                p { (entry.description.trim()) }
                            }
                        }
                    }
                }
            }
            Section::Education => html! {
                (self.heading(region, section))
                @for entry in &cv.education {
                    div.entry {
                        div.entry-title {
                            strong { (entry.degree.trim()) }
                            @if !entry.year.trim().is_empty() {
                                span.period { (entry.year.trim()) }
                            }
                        }
                        @if !entry.institution.trim().is_empty() {
                            p { (entry.institution.trim()) }
                        }
                    }
                }
            },
            Section::Skills => {
                let skills = skills_for(strategy, region, cv);
                html! {
                    (self.heading(region, section))
                    (self.items(&skills, strategy.skill_style(region)))
                }
            }
            Section::Languages => {
                let languages: Vec<&str> = cv.visible_languages().collect();
                let style = match strategy.skill_style(region) {
                    SkillStyle::Tags => SkillStyle::Inline,
                    other => other,
                };
                html! {
                    (self.heading(region, section))
                    (self.items(&languages, style))
                }
            }
        };
        let key = section_key(section);
        Ok(html! { section class={ "section " (key) } { (body) } })
    }

    fn region_markup(&self, region: Region, sections: Markup) -> Markup {
        let band = region == Region::Masthead && self.ctx.strategy.masthead_band().is_some();
        html! {
            @match region {
                Region::Masthead => { header.region.masthead.band[band] { (sections) } }
                Region::Sidebar => { aside.region.sidebar { (sections) } }
                Region::Main => { main.region.main { (sections) } }
                Region::Single => { main.region.single { (sections) } }
            }
        }
    }

    fn assemble(self) -> Markup {
        let strategy = self.ctx.strategy;
        let align = match strategy.alignment() {
            Alignment::Left => "align-left",
            Alignment::Center => "align-center",
        };
        let root_class = format!(
            "cv template-{} {} {}",
            strategy.style().key().replace('_', "-"),
            strategy.family().label().replace('_', "-"),
            align
        );

        let mut sidebar = None;
        let mut main = None;
        let mut blocks: Vec<Option<Markup>> = Vec::new();
        for (region, markup) in self.regions {
            match (region, strategy.family()) {
                (Region::Sidebar, LayoutFamily::TwoRegion { .. }) => sidebar = Some(markup),
                (Region::Main, LayoutFamily::TwoRegion { .. }) => main = Some(markup),
                _ => {
                    blocks.push(Some(markup));
                    continue;
                }
            }
            // Both columns share one flex row, placed where the first appears.
            if !blocks.iter().any(Option::is_none) {
                blocks.push(None);
            }
        }

        let side_left = matches!(
            strategy.family(),
            LayoutFamily::TwoRegion {
                side: SidePosition::Left,
                ..
            }
        );
        html! {
            div class=(root_class) {
                @for block in &blocks {
                    @match block {
                        Some(markup) => { (markup) }
                        None => { div.columns {
                            @if side_left {
                                @if let Some(s) = &sidebar { (s) }
                                @if let Some(m) = &main { (m) }
                            } @else {
                                @if let Some(m) = &main { (m) }
                                @if let Some(s) = &sidebar { (s) }
                            }
                        } }
                    }
                }
            }
        }
    }
}

fn section_key(section: Section) -> &'static str {
    match section {
        Section::Header => "section-header",
        Section::Contact => "section-contact",
        Section::Summary => "section-summary",
        Section::Experience => "section-experience",
        Section::Education => "section-education",
        Section::Skills => "section-skills",
        Section::Languages => "section-languages",
    }
}

impl SectionCursor for HtmlWriter<'_> {
    type Error = RenderError;

    fn begin_region(&mut self, region: Region) -> Result<(), RenderError> {
        self.current.clear();
        if region == Region::Sidebar
            && self.ctx.strategy.photo_placement() == PhotoPlacement::SidebarTop
        {
            if let Some(photo) = self.photo("photo-sidebar")? {
                self.current.push(photo);
            }
        }
        Ok(())
    }

    fn render_section(&mut self, region: Region, section: Section) -> Result<(), RenderError> {
        let markup = self.section(region, section)?;
        self.current.push(markup);
        Ok(())
    }

    fn end_region(&mut self, region: Region) -> Result<(), RenderError> {
        let parts = std::mem::take(&mut self.current);
        let sections = html! { @for part in &parts { (part) } };
        let markup = self.region_markup(region, sections);
        self.regions.push((region, markup));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{long_cv, sample_cv, sample_cv_with_photo};
    use crate::models::{CvDocument, RenderSettings, TemplateStyle};
    use crate::render::photo::with_photo;
    use tempfile::TempDir;

    fn render_with(cv: &CvDocument, settings: &RenderSettings) -> String {
        let dir = TempDir::new().unwrap();
        with_photo(cv.personal_info.photo.as_deref(), dir.path(), |photo| {
            render(&RenderContext::new(cv, settings, photo))
        })
        .unwrap()
    }

    fn style(style: TemplateStyle) -> RenderSettings {
        RenderSettings {
            template_style: style,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn test_empty_cv_keeps_chrome_and_drops_list_headings() {
        for template in TemplateStyle::ALL {
            let html = render_with(&CvDocument::default(), &style(template));
            assert!(html.starts_with("<!DOCTYPE html>"));
            assert!(html.contains("Your Name"), "{template:?}");
            assert!(html.contains("Position"), "{template:?}");
            assert!(html.contains("section-summary"), "{template:?}");
            assert!(html.contains("<p class=\"summary\"></p>"), "{template:?}");
            for absent in [
                "section-experience",
                "section-education",
                "section-skills",
                "section-languages",
            ] {
                assert!(!html.contains(absent), "{template:?} has {absent}");
            }
        }
    }

    #[test]
    fn test_section_order_matches_plan() {
        let cv = sample_cv();
        for template in TemplateStyle::ALL {
            let settings = style(template);
            let html = render_with(&cv, &settings);
            let ctx = RenderContext::new(&cv, &settings, None);
            assert_eq!(ctx.plan.sections().count(), 7);
            // Two-region layouts may reorder columns in the DOM; within a
            // region the plan order always holds.
            for region in &ctx.plan.regions {
                let pos: Vec<usize> = region
                    .sections
                    .iter()
                    .map(|s| html.find(section_key(*s)).unwrap())
                    .collect();
                assert!(pos.windows(2).all(|w| w[0] < w[1]), "{template:?}");
            }
        }
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut cv = sample_cv();
        cv.personal_info.name = "<script>alert(1)</script>".to_string();
        let html = render_with(&cv, &RenderSettings::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_dark_theme_switches_palette() {
        let light = render_with(&sample_cv(), &RenderSettings::default());
        let dark = render_with(
            &sample_cv(),
            &RenderSettings {
                theme: Theme::Dark,
                ..RenderSettings::default()
            },
        );
        assert!(light.contains("background: #ffffff"));
        assert!(dark.contains("background: #111827"));
    }

    #[test]
    fn test_responsive_rule_stacks_columns() {
        let html = render_with(&sample_cv(), &RenderSettings::default());
        assert!(html.contains("@media (max-width: 640px)"));
        assert!(html.contains("flex-direction: column"));
    }

    #[test]
    fn test_photo_inlined_as_data_uri() {
        let html = render_with(&sample_cv_with_photo(), &RenderSettings::default());
        assert!(html.contains("src=\"data:image/png;base64,"));
        let html = render_with(&sample_cv_with_photo(), &style(TemplateStyle::MinimalClean));
        assert!(!html.contains("data:image"));
    }

    #[test]
    fn test_sidebar_skill_cap_applies() {
        let html = render_with(&long_cv(), &RenderSettings::default());
        assert!(html.contains("<li>Skill 12</li>"));
        assert!(!html.contains("<li>Skill 13</li>"));
    }

    #[test]
    fn test_creative_timeline_and_tags() {
        let html = render_with(&sample_cv(), &style(TemplateStyle::Creative));
        assert!(html.contains("entry timeline"));
        assert!(html.contains("<span class=\"tag\">Algorithms</span>"));
    }
}
