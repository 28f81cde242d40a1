// Page Renderer: executes a layout plan on the absolute-coordinate canvas.
// Regions map to column margins; the two-region layouts draw one column,
// jump back to the first page and draw the other, so either column may flow
// onto pages the other created.

pub mod canvas;

use tracing::debug;

use crate::layout::{
    skills_for, Alignment, ContactStyle, EntryMarker, HeadingStyle, LayoutFamily, PhotoPlacement,
    Region, Section, SectionCursor, SidePosition, SkillStyle, PAGE_HEIGHT_MM,
    PAGE_WIDTH_MM,
};
use crate::render::photo::ScopedPhoto;
use crate::render::{RegionColors, RenderContext, RenderError};
use crate::style::{FontStyle, Rgb};

use canvas::{Align, Decoration, PdfCanvas, TOP_MARGIN};

/// Outer margin of full-width and main columns.
const PAGE_MARGIN: f32 = 15.0;
/// Inner padding of a sidebar column.
const SIDE_PAD: f32 = 6.0;
/// Gap between the main column and the sidebar.
const GUTTER: f32 = 8.0;
/// Top padding inside a masthead band.
const BAND_PAD: f32 = 8.0;
const SIDEBAR_PHOTO_WIDTH: f32 = 40.0;
const HEADER_PHOTO_WIDTH: f32 = 30.0;
const HEADER_PHOTO_MAX_HEIGHT: f32 = 40.0;
/// Text indent of an entry with a timeline marker.
const TIMELINE_INDENT: f32 = 7.0;
const TIMELINE_RADIUS: f32 = 1.6;
const TAG_PAD: f32 = 2.0;
const TAG_GAP: f32 = 2.0;

pub fn render(ctx: &RenderContext<'_>) -> Result<Vec<u8>, RenderError> {
    let mut renderer = PageRenderer::new(ctx);
    ctx.plan.render_sections(&mut renderer)?;
    debug!(
        "PDF layout {} finished on {} page(s)",
        ctx.strategy.family().label(),
        renderer.canvas.page_count()
    );
    renderer.canvas.finish(ctx.settings, ctx.cv.display_name())
}

#[derive(Debug, Clone, Copy)]
struct Column {
    left: f32,
    right: f32,
}

struct PageRenderer<'c> {
    ctx: &'c RenderContext<'c>,
    canvas: PdfCanvas,
    column: Column,
    /// Where regions below the masthead start on the first page.
    body_top: f32,
    /// Bottom edge of a header photo still beside the text cursor.
    photo_bottom: Option<f32>,
    /// Width kept free at the right of the column while `photo_bottom` is set.
    photo_reserve: f32,
}

impl<'c> PageRenderer<'c> {
    fn new(ctx: &'c RenderContext<'c>) -> Self {
        let mut canvas = PdfCanvas::new(ctx.settings.font_family);
        if let (
            LayoutFamily::TwoRegion {
                side,
                side_width_mm,
            },
            Some(color),
        ) = (ctx.strategy.family(), ctx.region_fill(Region::Sidebar))
        {
            let x = match side {
                SidePosition::Left => 0.0,
                SidePosition::Right => PAGE_WIDTH_MM - side_width_mm,
            };
            canvas.add_decoration(Decoration {
                x,
                y: 0.0,
                w: side_width_mm,
                h: PAGE_HEIGHT_MM,
                color,
            });
        }
        Self {
            ctx,
            canvas,
            column: Column {
                left: PAGE_MARGIN,
                right: PAGE_MARGIN,
            },
            body_top: TOP_MARGIN + 5.0,
            photo_bottom: None,
            photo_reserve: 0.0,
        }
    }

    // ── geometry and colour ─────────────────────────────────────────────────

    fn column_for(&self, region: Region) -> Column {
        let full = Column {
            left: PAGE_MARGIN,
            right: PAGE_MARGIN,
        };
        let LayoutFamily::TwoRegion {
            side,
            side_width_mm: w,
        } = self.ctx.strategy.family()
        else {
            return full;
        };
        match (region, side) {
            (Region::Sidebar, SidePosition::Left) => Column {
                left: SIDE_PAD,
                right: PAGE_WIDTH_MM - w + SIDE_PAD,
            },
            (Region::Sidebar, SidePosition::Right) => Column {
                left: PAGE_WIDTH_MM - w + SIDE_PAD,
                right: SIDE_PAD,
            },
            (Region::Main, SidePosition::Left) => Column {
                left: w + GUTTER,
                right: PAGE_MARGIN,
            },
            (Region::Main, SidePosition::Right) => Column {
                left: PAGE_MARGIN,
                right: w + GUTTER,
            },
            _ => full,
        }
    }

    fn line_height(&self) -> f32 {
        self.ctx.settings.body_size() * 0.5
    }

    fn align(&self) -> Align {
        match self.ctx.strategy.alignment() {
            Alignment::Left => Align::Left,
            Alignment::Center => Align::Center,
        }
    }

    fn body_font(&mut self, style: FontStyle) {
        let size = self.ctx.settings.body_size();
        self.canvas.set_font(style, size);
    }

    /// Moves the cursor below a header photo once text no longer flows beside it.
    fn settle_photo(&mut self) {
        if let Some(bottom) = self.photo_bottom.take() {
            if self.canvas.y() < bottom + 2.0 {
                self.canvas.set_y(bottom + 2.0);
            }
        }
        self.photo_reserve = 0.0;
    }

    // ── building blocks ─────────────────────────────────────────────────────

    fn heading(&mut self, region: Region, title: &str) {
        let line_h = self.line_height();
        self.canvas.ensure_space(line_h * 3.0);
        let size = self.ctx.settings.body_size() + 2.0;
        let h = size * 0.6;
        let label = title.to_uppercase();
        let align = self.align();
        let palette = self.ctx.palette;
        self.canvas.set_font(FontStyle::Bold, size);

        match self.ctx.strategy.heading_style(region) {
            HeadingStyle::Underline => {
                let color = self.ctx.colors(region).title;
                self.canvas.set_text_color(color);
                self.canvas.cell(0.0, h, &label, align, false);
                self.canvas.ln(h);
                let y = self.canvas.y() + 0.5;
                let left = self.column.left;
                let right = PAGE_WIDTH_MM - self.column.right;
                self.canvas.set_draw_color(color);
                self.canvas.set_line_width(0.4);
                self.canvas.line(left, y, right, y);
                self.canvas.ln(2.5);
            }
            HeadingStyle::Banner => {
                self.canvas.set_fill_color(palette.base);
                self.canvas.set_text_color(palette.on_base);
                self.canvas.cell(0.0, h + 2.0, &label, align, true);
                self.canvas.ln(h + 4.0);
            }
            HeadingStyle::Caps => {
                let color = self.ctx.colors(region).title;
                self.canvas.set_text_color(color);
                self.canvas.cell(0.0, h, &label, align, false);
                self.canvas.ln(h + 1.5);
            }
            HeadingStyle::AccentBar => {
                let (x, y) = (self.canvas.x(), self.canvas.y());
                self.canvas.set_fill_color(palette.accent);
                self.canvas.rect(x, y + 0.5, 2.0, h - 1.0);
                self.canvas.set_x(x + 4.0);
                self.canvas.set_text_color(palette.base);
                self.canvas.cell(0.0, h, &label, Align::Left, false);
                self.canvas.ln(h + 2.0);
            }
        }
    }

    /// Bold line with a right-aligned detail on the first row.
    fn title_row(&mut self, region: Region, title: &str, detail: &str) {
        let line_h = self.line_height();
        self.canvas.ensure_space(line_h * 3.0);
        let RegionColors { text, muted, .. } = self.ctx.colors(region);

        if self.align() == Align::Center {
            let joined = [title.trim(), detail.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" | ");
            self.body_font(FontStyle::Bold);
            self.canvas.set_text_color(text);
            self.canvas.multi_cell(0.0, line_h, &joined, Align::Center);
            return;
        }

        let (x, y) = (self.canvas.x(), self.canvas.y());
        self.body_font(FontStyle::Regular);
        let detail_w = if detail.trim().is_empty() {
            0.0
        } else {
            self.canvas.text_width(detail) + 2.0
        };
        if detail_w > 0.0 {
            self.canvas.set_text_color(muted);
            self.canvas.cell(0.0, line_h, detail, Align::Right, false);
        }
        self.canvas.set_xy(x, y);
        self.body_font(FontStyle::Bold);
        self.canvas.set_text_color(text);
        let width = (self.canvas.column_width() - detail_w - 2.0).max(10.0);
        self.canvas.multi_cell(width, line_h, title, Align::Left);
    }

    fn paragraph(&mut self, text: &str, style: FontStyle, color: Rgb) {
        if text.trim().is_empty() {
            return;
        }
        let line_h = self.line_height();
        let align = self.align();
        self.body_font(style);
        self.canvas.set_text_color(color);
        self.canvas.multi_cell(0.0, line_h, text.trim(), align);
    }

    fn items(&mut self, region: Region, items: &[&str], style: SkillStyle) {
        let line_h = self.line_height();
        let align = self.align();
        let color = self.ctx.colors(region).text;
        self.body_font(FontStyle::Regular);
        self.canvas.set_text_color(color);
        match style {
            SkillStyle::List => {
                for item in items {
                    self.canvas.multi_cell(0.0, line_h, &format!("• {item}"), align);
                }
            }
            SkillStyle::Inline => {
                self.canvas.multi_cell(0.0, line_h, &items.join(", "), align);
            }
            SkillStyle::Tags => self.tags(items),
        }
    }

    fn tags(&mut self, items: &[&str]) {
        let palette = self.ctx.palette;
        let size = (self.ctx.settings.body_size() - 1.0).max(4.0);
        let h = self.line_height() + 1.0;
        let left = self.column.left;
        let right_edge = PAGE_WIDTH_MM - self.column.right;
        self.canvas.set_font(FontStyle::Regular, size);
        self.canvas.set_fill_color(palette.base.tint(0.85));
        self.canvas.set_text_color(palette.base);
        self.canvas.set_x(left);
        for item in items {
            let w = (self.canvas.text_width(item) + 2.0 * TAG_PAD).min(right_edge - left);
            if self.canvas.x() + w > right_edge && self.canvas.x() > left {
                self.canvas.ln(h + TAG_GAP);
            }
            self.canvas.cell(w, h, item, Align::Center, true);
            let x = self.canvas.x();
            self.canvas.set_x(x + TAG_GAP);
        }
        self.canvas.ln(h + TAG_GAP);
    }

    fn fit_photo(photo: &ScopedPhoto, max_w: f32, max_h: f32) -> f32 {
        let h = photo.height_for(max_w);
        if h > max_h && h > 0.0 {
            max_w * max_h / h
        } else {
            max_w
        }
    }

    // ── sections ────────────────────────────────────────────────────────────

    fn header(&mut self, region: Region) {
        let ctx = self.ctx;
        let top = self.canvas.y();

        if ctx.strategy.photo_placement() == PhotoPlacement::HeaderRight {
            if let Some(photo) = ctx.photo {
                let max_h = match (region, ctx.strategy.masthead_band()) {
                    (Region::Masthead, Some(band)) => band.height_mm - 2.0 * BAND_PAD + 4.0,
                    _ => HEADER_PHOTO_MAX_HEIGHT,
                };
                let w = Self::fit_photo(photo, HEADER_PHOTO_WIDTH, max_h);
                let x = PAGE_WIDTH_MM - self.column.right - w;
                let h = self.canvas.image(photo, x, top, w);
                self.photo_bottom = Some(top + h);
                self.photo_reserve = w + 5.0;
            }
        }

        let width = self.canvas.column_width() - self.photo_reserve;
        let align = self.align();
        let RegionColors { title, detail, .. } = ctx.colors(region);
        let header_size = ctx.settings.header_size();
        self.canvas.set_font(FontStyle::Bold, header_size);
        self.canvas.set_text_color(title);
        self.canvas
            .multi_cell(width, header_size * 0.45, ctx.cv.display_name(), align);

        let position_size = ctx.settings.body_size() + 3.0;
        self.canvas.set_font(FontStyle::Regular, position_size);
        self.canvas.set_text_color(detail);
        self.canvas
            .multi_cell(width, position_size * 0.5, ctx.cv.display_position(), align);
    }

    fn contact(&mut self, region: Region) {
        let line_h = self.line_height();
        let align = self.align();
        match self.ctx.strategy.contact_style() {
            ContactStyle::List => {
                self.heading(region, Section::Contact.title());
                let color = self.ctx.colors(region).text;
                self.body_font(FontStyle::Regular);
                self.canvas.set_text_color(color);
                let cv = self.ctx.cv;
                for line in cv.contact_lines() {
                    self.canvas.multi_cell(0.0, line_h, line, align);
                }
            }
            ContactStyle::InlineBar => {
                let bar = self.ctx.cv.contact_bar();
                if !bar.is_empty() {
                    let width = self.canvas.column_width() - self.photo_reserve;
                    let color = self.ctx.colors(region).muted;
                    self.body_font(FontStyle::Regular);
                    self.canvas.set_text_color(color);
                    self.canvas.multi_cell(width, line_h, &bar, align);
                }
            }
        }
    }

    fn summary(&mut self, region: Region) {
        let cv = self.ctx.cv;
        self.heading(region, Section::Summary.title());
        let color = self.ctx.colors(region).text;
        self.paragraph(&cv.summary, FontStyle::Regular, color);
    }

    fn experience(&mut self, region: Region) {
        self.heading(region, Section::Experience.title());
        let timeline = self.ctx.strategy.entry_marker() == EntryMarker::Timeline;
        let accent = self.ctx.palette.accent;
        let line_h = self.line_height();
        let column = self.column;
        let cv = self.ctx.cv;

        for entry in &cv.experience {
            self.canvas.ensure_space(line_h * 3.0);
            let (start_page, start_y) = (self.canvas.page(), self.canvas.y());
            let marker_x = column.left + TIMELINE_RADIUS + 0.5;
            if timeline {
                self.canvas.set_fill_color(accent);
                self.canvas
                    .circle(marker_x, start_y + line_h / 2.0, TIMELINE_RADIUS);
                self.canvas
                    .set_margins(column.left + TIMELINE_INDENT, column.right);
            }

            self.title_row(region, &entry.role, &entry.period);
            let detail = self.ctx.colors(region).detail;
            self.paragraph(&entry.organization, FontStyle::Italic, detail);
            let text = self.ctx.colors(region).text;
            self.paragraph(&entry.description, FontStyle::Regular, text);
            self.canvas.ln(2.0);

            if timeline {
                if self.canvas.page() == start_page {
                    self.canvas.set_draw_color(accent);
                    self.canvas.set_line_width(0.3);
                    self.canvas.line(
                        marker_x,
                        start_y + line_h / 2.0 + TIMELINE_RADIUS,
                        marker_x,
                        self.canvas.y() - 1.0,
                    );
                }
                self.canvas.set_margins(column.left, column.right);
            }
        }
    }

    fn education(&mut self, region: Region) {
        let cv = self.ctx.cv;
        self.heading(region, Section::Education.title());
        for entry in &cv.education {
            self.title_row(region, &entry.degree, &entry.year);
            let color = self.ctx.colors(region).text;
            self.paragraph(&entry.institution, FontStyle::Regular, color);
            self.canvas.ln(1.5);
        }
    }

    fn skills(&mut self, region: Region) {
        let skills = skills_for(self.ctx.strategy, region, self.ctx.cv);
        self.heading(region, Section::Skills.title());
        let style = self.ctx.strategy.skill_style(region);
        self.items(region, &skills, style);
    }

    fn languages(&mut self, region: Region) {
        let languages: Vec<&str> = self.ctx.cv.visible_languages().collect();
        self.heading(region, Section::Languages.title());
        let style = match self.ctx.strategy.skill_style(region) {
            SkillStyle::Tags => SkillStyle::Inline,
            other => other,
        };
        self.items(region, &languages, style);
    }
}

impl SectionCursor for PageRenderer<'_> {
    type Error = RenderError;

    fn begin_region(&mut self, region: Region) -> Result<(), RenderError> {
        self.column = self.column_for(region);
        self.canvas.set_page(0);
        self.canvas.set_margins(self.column.left, self.column.right);

        if region == Region::Masthead {
            match self.ctx.strategy.masthead_band() {
                Some(band) => {
                    let fill = self.ctx.region_fill(region).unwrap_or(self.ctx.palette.base);
                    self.canvas.set_fill_color(fill);
                    self.canvas
                        .rect(0.0, 0.0, PAGE_WIDTH_MM, band.height_mm);
                    self.canvas.set_y(BAND_PAD);
                }
                None => self.canvas.set_y(TOP_MARGIN),
            }
            return Ok(());
        }

        self.canvas.set_y(self.body_top);
        if region == Region::Sidebar
            && self.ctx.strategy.photo_placement() == PhotoPlacement::SidebarTop
        {
            if let Some(photo) = self.ctx.photo {
                let w = SIDEBAR_PHOTO_WIDTH.min(self.canvas.column_width());
                let x = self.column.left + (self.canvas.column_width() - w) / 2.0;
                let h = self.canvas.image(photo, x, self.body_top, w);
                self.canvas.set_y(self.body_top + h + 5.0);
            }
        }
        Ok(())
    }

    fn render_section(&mut self, region: Region, section: Section) -> Result<(), RenderError> {
        if section != Section::Contact {
            self.settle_photo();
        }
        match section {
            Section::Header => self.header(region),
            Section::Contact => self.contact(region),
            Section::Summary => self.summary(region),
            Section::Experience => self.experience(region),
            Section::Education => self.education(region),
            Section::Skills => self.skills(region),
            Section::Languages => self.languages(region),
        }
        if section == Section::Contact {
            self.settle_photo();
        }
        let y = self.canvas.y() + self.ctx.settings.section_spacing as f32;
        self.canvas.set_y(y);
        Ok(())
    }

    fn end_region(&mut self, region: Region) -> Result<(), RenderError> {
        self.settle_photo();
        if region == Region::Masthead {
            let band = self
                .ctx
                .strategy
                .masthead_band()
                .map_or(0.0, |b| b.height_mm);
            self.body_top = self.canvas.y().max(band) + 6.0;
        }
        Ok(())
    }
}
