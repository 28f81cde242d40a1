//! Absolute-coordinate page canvas over `pdf-writer`.
//!
//! Callers work in millimetres from the top-left corner of an A4 page with a
//! moving text cursor, the way a form-filling PDF library does; conversion to
//! PDF user space (points, bottom-left origin) happens when operators are
//! emitted. Text uses the four base-14 faces of one family with WinAnsi
//! encoding, so no font data is embedded.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::layout::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::models::{FontFamily, RenderSettings};
use crate::render::photo::ScopedPhoto;
use crate::render::RenderError;
use crate::style::font_metrics::{get_metrics, FontMetricTable, BOLD_EXPANSION};
use crate::style::{pdf_face, FontStyle, Rgb};

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Content that would cross this distance from the bottom edge moves to the
/// next page.
pub const AUTO_BREAK_MARGIN: f32 = 15.0;
pub const TOP_MARGIN: f32 = 10.0;
/// Horizontal padding inside a text cell.
pub const CELL_MARGIN: f32 = 1.0;

/// Bézier control-point ratio for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

pub const FOOTER_TEXT: &str = "Created with CV Builder Pro - Page";

const IMAGE_RESOURCE: Name<'static> = Name(b"Im1");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A filled rectangle painted behind the content of every page, current and
/// future. Used for sidebar bands that must continue across page breaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: Rgb,
}

struct Page {
    content: Content,
    uses_image: bool,
}

struct RasterImage {
    rgb: Vec<u8>,
    width: u32,
    height: u32,
}

pub struct PdfCanvas {
    family: FontFamily,
    metrics: &'static FontMetricTable,
    pages: Vec<Page>,
    page: usize,
    x: f32,
    y: f32,
    left_margin: f32,
    right_margin: f32,
    font_style: FontStyle,
    font_size: f32,
    text_color: Rgb,
    fill_color: Rgb,
    draw_color: Rgb,
    line_width: f32,
    decorations: Vec<Decoration>,
    image: Option<RasterImage>,
}

impl PdfCanvas {
    /// A canvas with one blank page and the cursor at the top-left margin.
    pub fn new(family: FontFamily) -> Self {
        Self {
            family,
            metrics: get_metrics(family),
            pages: vec![Page {
                content: Content::new(),
                uses_image: false,
            }],
            page: 0,
            x: 10.0,
            y: TOP_MARGIN,
            left_margin: 10.0,
            right_margin: 10.0,
            font_style: FontStyle::Regular,
            font_size: 10.0,
            text_color: Rgb::BLACK,
            fill_color: Rgb::WHITE,
            draw_color: Rgb::BLACK,
            line_width: 0.2,
            decorations: Vec::new(),
            image: None,
        }
    }

    // ── cursor and state ────────────────────────────────────────────────────

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn set_xy(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Column bounds for subsequent cells; `right` is measured from the
    /// right page edge. Moves the cursor to the new left margin.
    pub fn set_margins(&mut self, left: f32, right: f32) {
        self.left_margin = left;
        self.right_margin = right;
        self.x = left;
    }

    /// Width between the cursor and the right margin.
    pub fn remaining_width(&self) -> f32 {
        (PAGE_WIDTH_MM - self.right_margin - self.x).max(0.0)
    }

    /// Width of the current column.
    pub fn column_width(&self) -> f32 {
        (PAGE_WIDTH_MM - self.right_margin - self.left_margin).max(0.0)
    }

    pub fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.font_style = style;
        self.font_size = size_pt;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    pub fn set_draw_color(&mut self, color: Rgb) {
        self.draw_color = color;
    }

    pub fn set_line_width(&mut self, width_mm: f32) {
        self.line_width = width_mm;
    }

    /// Width of `text` in millimetres in the current font.
    pub fn text_width(&self, text: &str) -> f32 {
        self.metrics.width_pt(text, self.font_size, self.font_style) / PT_PER_MM
    }

    fn font_size_mm(&self) -> f32 {
        self.font_size / PT_PER_MM
    }

    // ── pages ───────────────────────────────────────────────────────────────

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Returns to an existing page; used when a second column restarts at the
    /// top of the first page after the first column has flowed on.
    pub fn set_page(&mut self, index: usize) {
        self.page = index.min(self.pages.len() - 1);
    }

    /// Moves to the next page, creating it only if it does not exist yet,
    /// and puts the cursor at the top margin of the current column.
    pub fn page_break(&mut self) {
        let next = self.page + 1;
        if next == self.pages.len() {
            let mut content = Content::new();
            for decoration in &self.decorations {
                fill_rect(&mut content, decoration);
            }
            self.pages.push(Page {
                content,
                uses_image: false,
            });
        }
        self.page = next;
        self.x = self.left_margin;
        self.y = TOP_MARGIN;
    }

    /// Breaks the page if an element of height `h` would cross the bottom
    /// margin. Returns whether a break happened.
    pub fn ensure_space(&mut self, h: f32) -> bool {
        if self.y + h > PAGE_HEIGHT_MM - AUTO_BREAK_MARGIN && self.y > TOP_MARGIN {
            let x = self.x;
            self.page_break();
            self.x = x;
            true
        } else {
            false
        }
    }

    /// Paints `decoration` on the current page and on every page created
    /// afterwards.
    pub fn add_decoration(&mut self, decoration: Decoration) {
        fill_rect(&mut self.pages[self.page].content, &decoration);
        self.decorations.push(decoration);
    }

    // ── text ────────────────────────────────────────────────────────────────

    /// Single-line cell of width `w` (0 = to the right margin). Advances the
    /// cursor horizontally; call `ln` to move to the next line.
    pub fn cell(&mut self, w: f32, h: f32, text: &str, align: Align, fill: bool) {
        self.ensure_space(h);
        self.draw_cell(w, h, text, align, fill);
    }

    /// Returns the cursor to the left margin and moves down by `h`.
    pub fn ln(&mut self, h: f32) {
        self.x = self.left_margin;
        self.y += h;
    }

    /// Wrapping block: one cell per wrapped line, the cursor advancing by
    /// `h` per line and breaking pages as needed. Leaves the cursor at the
    /// left margin below the block.
    pub fn multi_cell(&mut self, w: f32, h: f32, text: &str, align: Align) {
        let w = if w <= 0.0 { self.remaining_width() } else { w };
        let x = self.x;
        for line in self.wrap(text, w - 2.0 * CELL_MARGIN) {
            self.x = x;
            self.cell(w, h, &line, align, false);
            self.y += h;
        }
        self.x = self.left_margin;
    }

    /// Wraps `text` to `width_mm` in the current font.
    pub fn wrap(&self, text: &str, width_mm: f32) -> Vec<String> {
        let factor = if self.font_style.is_bold() {
            BOLD_EXPANSION
        } else {
            1.0
        };
        let max_em = (width_mm / (self.font_size_mm() * factor)).max(0.5);
        self.metrics.wrap(text, max_em)
    }

    fn draw_cell(&mut self, w: f32, h: f32, text: &str, align: Align, fill: bool) {
        let w = if w <= 0.0 { self.remaining_width() } else { w };
        if fill {
            self.rect(self.x, self.y, w, h);
        }
        if !text.is_empty() {
            let text_w = self.text_width(text);
            let text_x = match align {
                Align::Left => self.x + CELL_MARGIN,
                Align::Center => self.x + (w - text_w) / 2.0,
                Align::Right => self.x + w - CELL_MARGIN - text_w,
            };
            let baseline = self.y + h / 2.0 + 0.3 * self.font_size_mm();
            self.show_text(text_x, baseline, text);
        }
        self.x += w;
    }

    fn show_text(&mut self, x: f32, baseline: f32, text: &str) {
        let encoded = encode_win_ansi(text);
        let font = font_resource(self.font_style);
        let size = self.font_size;
        let (r, g, b) = self.text_color.unit();
        let content = &mut self.pages[self.page].content;
        content.set_fill_rgb(r, g, b);
        content.begin_text();
        content.set_font(font, size);
        content.next_line(x * PT_PER_MM, (PAGE_HEIGHT_MM - baseline) * PT_PER_MM);
        content.show(Str(&encoded));
        content.end_text();
    }

    // ── shapes ──────────────────────────────────────────────────────────────

    /// Filled rectangle in the current fill colour.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.prepare_paint();
        let content = &mut self.pages[self.page].content;
        content.rect(
            x * PT_PER_MM,
            (PAGE_HEIGHT_MM - y - h) * PT_PER_MM,
            w * PT_PER_MM,
            h * PT_PER_MM,
        );
        content.fill_nonzero();
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.prepare_paint();
        let content = &mut self.pages[self.page].content;
        content.move_to(x1 * PT_PER_MM, (PAGE_HEIGHT_MM - y1) * PT_PER_MM);
        content.line_to(x2 * PT_PER_MM, (PAGE_HEIGHT_MM - y2) * PT_PER_MM);
        content.stroke();
    }

    /// Filled ellipse centred at `(cx, cy)` built from four cubic Bézier arcs.
    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        self.prepare_paint();
        let (cx, cy) = (cx * PT_PER_MM, (PAGE_HEIGHT_MM - cy) * PT_PER_MM);
        let (rx, ry) = (rx * PT_PER_MM, ry * PT_PER_MM);
        let (ox, oy) = (rx * KAPPA, ry * KAPPA);
        let content = &mut self.pages[self.page].content;
        content.move_to(cx + rx, cy);
        content.cubic_to(cx + rx, cy + oy, cx + ox, cy + ry, cx, cy + ry);
        content.cubic_to(cx - ox, cy + ry, cx - rx, cy + oy, cx - rx, cy);
        content.cubic_to(cx - rx, cy - oy, cx - ox, cy - ry, cx, cy - ry);
        content.cubic_to(cx + ox, cy - ry, cx + rx, cy - oy, cx + rx, cy);
        content.close_path();
        content.fill_nonzero();
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.ellipse(cx, cy, r, r);
    }

    fn prepare_paint(&mut self) {
        let fill = self.fill_color.unit();
        let stroke = self.draw_color.unit();
        let width = self.line_width * PT_PER_MM;
        let content = &mut self.pages[self.page].content;
        content.set_fill_rgb(fill.0, fill.1, fill.2);
        content.set_stroke_rgb(stroke.0, stroke.1, stroke.2);
        content.set_line_width(width);
    }

    // ── images ──────────────────────────────────────────────────────────────

    /// Places the photo with its top-left corner at `(x, y)` scaled to width
    /// `w`. Returns the drawn height.
    pub fn image(&mut self, photo: &ScopedPhoto, x: f32, y: f32, w: f32) -> f32 {
        let h = photo.height_for(w);
        if self.image.is_none() {
            self.image = Some(RasterImage {
                rgb: photo.pixels().as_raw().clone(),
                width: photo.width(),
                height: photo.height(),
            });
        }
        let page = &mut self.pages[self.page];
        page.uses_image = true;
        page.content.save_state();
        page.content.transform([
            w * PT_PER_MM,
            0.0,
            0.0,
            h * PT_PER_MM,
            x * PT_PER_MM,
            (PAGE_HEIGHT_MM - y - h) * PT_PER_MM,
        ]);
        page.content.x_object(IMAGE_RESOURCE);
        page.content.restore_state();
        h
    }

    // ── output ──────────────────────────────────────────────────────────────

    fn draw_footer(&mut self, settings: &RenderSettings, number: usize) {
        self.set_font(FontStyle::Italic, settings.footer_size());
        self.set_text_color(Rgb::grey(128));
        self.x = 0.0;
        self.y = PAGE_HEIGHT_MM - AUTO_BREAK_MARGIN;
        let text = format!("{FOOTER_TEXT} {number}");
        self.draw_cell(PAGE_WIDTH_MM, 10.0, &text, Align::Center, false);
    }

    /// Draws the footer on every page and assembles the document.
    pub fn finish(mut self, settings: &RenderSettings, title: &str) -> Result<Vec<u8>, RenderError> {
        for index in 0..self.pages.len() {
            self.page = index;
            self.draw_footer(settings, index + 1);
        }

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();
        let info_id = alloc.bump();
        let font_ids: Vec<(FontStyle, Ref)> = FontStyle::ALL
            .iter()
            .map(|style| (*style, alloc.bump()))
            .collect();
        let image_id = self.image.as_ref().map(|_| alloc.bump());
        let page_ids: Vec<(Ref, Ref)> = self
            .pages
            .iter()
            .map(|_| (alloc.bump(), alloc.bump()))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);
        pdf.document_info(info_id).title(TextStr(title));

        for (style, id) in &font_ids {
            pdf.type1_font(*id)
                .base_font(Name(pdf_face(self.family, *style).as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        if let (Some(raster), Some(id)) = (&self.image, image_id) {
            let data = deflate(&raster.rgb)?;
            let mut xobject = pdf.image_xobject(id, &data);
            xobject.filter(Filter::FlateDecode);
            xobject.width(raster.width as i32);
            xobject.height(raster.height as i32);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
        }

        for (page, (page_id, content_id)) in self.pages.into_iter().zip(&page_ids) {
            let data = deflate(&page.content.finish())?;
            pdf.stream(*content_id, &data).filter(Filter::FlateDecode);

            let mut writer = pdf.page(*page_id);
            writer.media_box(Rect::new(
                0.0,
                0.0,
                PAGE_WIDTH_MM * PT_PER_MM,
                PAGE_HEIGHT_MM * PT_PER_MM,
            ));
            writer.parent(tree_id);
            writer.contents(*content_id);
            let mut resources = writer.resources();
            {
                let mut fonts = resources.fonts();
                for (style, id) in &font_ids {
                    fonts.pair(font_resource(*style), *id);
                }
            }
            if let (true, Some(id)) = (page.uses_image, image_id) {
                resources.x_objects().pair(IMAGE_RESOURCE, id);
            }
        }

        Ok(pdf.finish())
    }
}

fn font_resource(style: FontStyle) -> Name<'static> {
    match style {
        FontStyle::Regular => Name(b"F1"),
        FontStyle::Bold => Name(b"F2"),
        FontStyle::Italic => Name(b"F3"),
        FontStyle::BoldItalic => Name(b"F4"),
    }
}

fn fill_rect(content: &mut Content, decoration: &Decoration) {
    let (r, g, b) = decoration.color.unit();
    content.set_fill_rgb(r, g, b);
    content.rect(
        decoration.x * PT_PER_MM,
        (PAGE_HEIGHT_MM - decoration.y - decoration.h) * PT_PER_MM,
        decoration.w * PT_PER_MM,
        decoration.h * PT_PER_MM,
    );
    content.fill_nonzero();
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| RenderError::Pdf(format!("stream compression failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| RenderError::Pdf(format!("stream compression failed: {e}")))
}

/// Encodes text for a base-14 font with `WinAnsiEncoding`. Latin-1 maps
/// straight through; typographic punctuation uses the 0x80–0x9F block;
/// anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> PdfCanvas {
        PdfCanvas::new(FontFamily::Helvetica)
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Ab 1"), b"Ab 1".to_vec());
        assert_eq!(encode_win_ansi("é•"), vec![0xe9, 0x95]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn test_multi_cell_advances_by_line_count() {
        let mut c = canvas();
        c.set_font(FontStyle::Regular, 10.0);
        c.set_xy(10.0, 20.0);
        let text = "word ".repeat(80);
        let lines = c.wrap(&text, 100.0 - 2.0 * CELL_MARGIN).len();
        assert!(lines > 1);
        c.multi_cell(100.0, 5.0, &text, Align::Left);
        assert!((c.y() - (20.0 + 5.0 * lines as f32)).abs() < 1e-3);
        assert_eq!(c.x(), c.left_margin);
    }

    #[test]
    fn test_auto_page_break_at_bottom_margin() {
        let mut c = canvas();
        c.set_y(PAGE_HEIGHT_MM - AUTO_BREAK_MARGIN - 2.0);
        c.cell(50.0, 6.0, "overflow", Align::Left, false);
        assert_eq!(c.page_count(), 2);
        assert_eq!(c.page(), 1);
        assert_eq!(c.y(), TOP_MARGIN);
    }

    #[test]
    fn test_page_break_reuses_existing_page() {
        let mut c = canvas();
        c.page_break();
        c.page_break();
        assert_eq!(c.page_count(), 3);
        c.set_page(0);
        c.page_break();
        assert_eq!(c.page(), 1);
        assert_eq!(c.page_count(), 3);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut c = canvas();
        c.set_page(9);
        assert_eq!(c.page(), 0);
    }

    #[test]
    fn test_finish_produces_one_pdf_page_per_canvas_page() {
        let mut c = canvas();
        c.add_decoration(Decoration {
            x: 0.0,
            y: 0.0,
            w: 65.0,
            h: PAGE_HEIGHT_MM,
            color: Rgb::new(37, 99, 235),
        });
        c.cell(0.0, 8.0, "Hello", Align::Center, false);
        c.circle(20.0, 40.0, 2.0);
        c.page_break();
        let bytes = c.finish(&RenderSettings::default(), "Test").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        let compact: String = text.split_whitespace().collect();
        assert!(compact.contains("Hello"), "{compact}");
        assert!(compact.contains("Page1"), "{compact}");
        assert!(compact.contains("Page2"), "{compact}");
    }

    #[test]
    fn test_text_width_grows_with_size_and_weight() {
        let mut c = canvas();
        c.set_font(FontStyle::Regular, 10.0);
        let small = c.text_width("Experience");
        c.set_font(FontStyle::Bold, 10.0);
        let bold = c.text_width("Experience");
        c.set_font(FontStyle::Regular, 20.0);
        let large = c.text_width("Experience");
        assert!(bold > small);
        assert!((large - 2.0 * small).abs() < 1e-3);
    }
}
