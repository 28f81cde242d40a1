// Document Renderer: the same layout plan as a flow document.
// Two-region layouts become a borderless two-column table with a shaded
// sidebar cell; single-region layouts are a run of paragraphs. Every run
// carries its own font, size, weight and colour.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, Footer, LineSpacing, PageMargin, Paragraph, Pic, Run, RunFonts,
    Shading, Table, TableBorders, TableCell, TableLayoutType, TableRow, WidthType,
};
use tracing::debug;

use crate::layout::{
    skills_for, Alignment, ContactStyle, EntryMarker, HeadingStyle, LayoutFamily, PhotoPlacement,
    Region, Section, SectionCursor, SidePosition, SkillStyle, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use crate::models::RenderTarget;
use crate::render::{RenderContext, RenderError};
use crate::style::{resolve_font, Rgb};

const TWIPS_PER_MM: f32 = 1440.0 / 25.4;
const EMU_PER_MM: f32 = 36_000.0;
/// Printable width: 7in of the A4 page.
const TEXT_WIDTH_DXA: usize = 7 * 1440;
const SIDEBAR_PHOTO_MM: f32 = 35.0;
const HEADER_PHOTO_MM: f32 = 25.0;
/// Relationship id of the one picture a document can carry.
const PHOTO_REL_ID: &str = "rIdImage1";

pub const FOOTER_TEXT: &str = "Created with CV Builder Pro";

pub fn render(ctx: &RenderContext<'_>) -> Result<Vec<u8>, RenderError> {
    let mut writer = DocxWriter::new(ctx);
    ctx.plan.render_sections(&mut writer)?;
    let docx = writer.assemble();

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| RenderError::Docx(e.to_string()))?;
    debug!("DOCX packed, {} region block(s)", ctx.plan.regions.len());
    Ok(buf.into_inner())
}

fn mm_to_dxa(mm: f32) -> usize {
    (mm * TWIPS_PER_MM).round() as usize
}

fn emu(mm: f32) -> u32 {
    (mm * EMU_PER_MM).round() as u32
}

struct DocxWriter<'c> {
    ctx: &'c RenderContext<'c>,
    font: &'static str,
    /// Finished regions in plan order.
    regions: Vec<(Region, Vec<Paragraph>)>,
    current: Vec<Paragraph>,
    photo_png: Option<Vec<u8>>,
}

impl<'c> DocxWriter<'c> {
    fn new(ctx: &'c RenderContext<'c>) -> Self {
        Self {
            ctx,
            font: resolve_font(ctx.settings.font_family, RenderTarget::Docx),
            regions: Vec::new(),
            current: Vec::new(),
            photo_png: None,
        }
    }

    // ── runs and paragraphs ─────────────────────────────────────────────────

    fn run(&self, text: &str, color: Rgb, size_pt: f32) -> Run {
        self.styled_run(color, size_pt).add_text(text)
    }

    fn styled_run(&self, color: Rgb, size_pt: f32) -> Run {
        Run::new()
            .fonts(
                RunFonts::new()
                    .ascii(self.font)
                    .hi_ansi(self.font)
                    .cs(self.font),
            )
            .size((size_pt * 2.0).round() as usize)
            .color(color.hex())
    }

    fn body_run(&self, text: &str, color: Rgb) -> Run {
        self.run(text, color, self.ctx.settings.body_size())
    }

    fn paragraph(&self) -> Paragraph {
        let p = Paragraph::new().line_spacing(LineSpacing::new().before(0).after(40));
        match self.ctx.strategy.alignment() {
            Alignment::Left => p,
            Alignment::Center => p.align(AlignmentType::Center),
        }
    }

    fn push(&mut self, paragraph: Paragraph) {
        self.current.push(paragraph);
    }

    /// One paragraph; explicit newlines in `text` become line breaks.
    fn text_line(&mut self, text: &str, color: Rgb) {
        let mut run = self.styled_run(color, self.ctx.settings.body_size());
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                run = run.add_break(BreakType::TextWrapping);
            }
            run = run.add_text(line.trim_end_matches('\r'));
        }
        let p = self.paragraph().add_run(run);
        self.push(p);
    }

    fn heading(&mut self, region: Region, title: &str) {
        let palette = self.ctx.palette;
        let colors = self.ctx.colors(region);
        let size = self.ctx.settings.body_size() + 2.0;
        let label = title.to_uppercase();
        let p = self
            .paragraph()
            .line_spacing(LineSpacing::new().before(120).after(80));
        let p = match self.ctx.strategy.heading_style(region) {
            HeadingStyle::Underline => {
                p.add_run(self.run(&label, colors.title, size).bold().underline("single"))
            }
            // No filled box in flow text: a larger coloured run stands in for the banner.
            HeadingStyle::Banner => p.add_run(self.run(&label, palette.base, size + 1.0).bold()),
            HeadingStyle::Caps => p.add_run(self.run(&label, colors.title, size).bold()),
            HeadingStyle::AccentBar => p
                .add_run(self.run("▌ ", palette.accent, size).bold())
                .add_run(self.run(&label, palette.base, size).bold()),
        };
        self.push(p);
    }

    fn items(&mut self, region: Region, items: &[&str], style: SkillStyle) {
        let colors = self.ctx.colors(region);
        match style {
            SkillStyle::List => {
                for item in items {
                    self.text_line(&format!("• {item}"), colors.text);
                }
            }
            SkillStyle::Inline => self.text_line(&items.join(", "), colors.text),
            SkillStyle::Tags => {
                let base = self.ctx.palette.base;
                let mut p = self.paragraph();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        p = p.add_run(self.body_run("   ", base));
                    }
                    p = p.add_run(self.body_run(&format!("[{item}]"), base).bold());
                }
                self.push(p);
            }
        }
    }

    fn photo_paragraph(
        &mut self,
        width_mm: f32,
        align: AlignmentType,
    ) -> Result<Option<Paragraph>, RenderError> {
        let Some(photo) = self.ctx.photo else {
            return Ok(None);
        };
        if self.photo_png.is_none() {
            self.photo_png = Some(photo.png_bytes()?);
        }
        let Some(png) = self.photo_png.as_deref() else {
            return Ok(None);
        };
        let height_mm = photo.height_for(width_mm);
        let pic = Pic::new(png)
            .id(PHOTO_REL_ID)
            .size(emu(width_mm), emu(height_mm));
        Ok(Some(
            Paragraph::new()
                .align(align)
                .add_run(Run::new().add_image(pic)),
        ))
    }

    // ── sections ────────────────────────────────────────────────────────────

    fn header(&mut self, region: Region) -> Result<(), RenderError> {
        if self.ctx.strategy.photo_placement() == PhotoPlacement::HeaderRight {
            if let Some(p) = self.photo_paragraph(HEADER_PHOTO_MM, AlignmentType::Right)? {
                self.push(p);
            }
        }
        let colors = self.ctx.colors(region);
        let settings = self.ctx.settings;
        let name = self.paragraph().add_run(
            self.run(self.ctx.cv.display_name(), colors.title, settings.header_size())
                .bold(),
        );
        let position = self.paragraph().add_run(self.run(
            self.ctx.cv.display_position(),
            colors.detail,
            settings.body_size() + 3.0,
        ));
        self.push(name);
        self.push(position);
        Ok(())
    }

    fn contact(&mut self, region: Region) {
        let cv = self.ctx.cv;
        let colors = self.ctx.colors(region);
        match self.ctx.strategy.contact_style() {
            ContactStyle::List => {
                self.heading(region, Section::Contact.title());
                for line in cv.contact_lines() {
                    self.text_line(line, colors.text);
                }
            }
            ContactStyle::InlineBar => {
                let bar = cv.contact_bar();
                if !bar.is_empty() {
                    self.text_line(&bar, colors.muted);
                }
            }
        }
    }

    fn summary(&mut self, region: Region) {
        let cv = self.ctx.cv;
        self.heading(region, Section::Summary.title());
        let color = self.ctx.colors(region).text;
        self.text_line(cv.summary.trim(), color);
    }

    fn experience(&mut self, region: Region) {
        let cv = self.ctx.cv;
        let colors = self.ctx.colors(region);
        let timeline = self.ctx.strategy.entry_marker() == EntryMarker::Timeline;
        self.heading(region, Section::Experience.title());
        for entry in &cv.experience {
            let mut title = self.paragraph();
            if timeline {
                title = title.add_run(self.body_run("● ", self.ctx.palette.accent));
            }
            title = title.add_run(self.body_run(entry.role.trim(), colors.text).bold());
            if !entry.period.trim().is_empty() {
                let period = format!("   {}", entry.period.trim());
                title = title.add_run(self.body_run(&period, colors.muted));
            }
            self.push(title);
            if !entry.organization.trim().is_empty() {
                let p = self
                    .paragraph()
                    .add_run(self.body_run(entry.organization.trim(), colors.detail).italic());
                self.push(p);
            }
            if !entry.description.trim().is_empty() {
                self.text_line(entry.description.trim(), colors.text);
            }
        }
    }

    fn education(&mut self, region: Region) {
        let cv = self.ctx.cv;
        let colors = self.ctx.colors(region);
        self.heading(region, Section::Education.title());
        for entry in &cv.education {
            let mut title = self
                .paragraph()
                .add_run(self.body_run(entry.degree.trim(), colors.text).bold());
            if !entry.year.trim().is_empty() {
                let year = format!("   {}", entry.year.trim());
                title = title.add_run(self.body_run(&year, colors.muted));
            }
            self.push(title);
            if !entry.institution.trim().is_empty() {
                self.text_line(entry.institution.trim(), colors.text);
            }
        }
    }

    fn skills(&mut self, region: Region) {
        let skills = skills_for(self.ctx.strategy, region, self.ctx.cv);
        self.heading(region, Section::Skills.title());
        let style = self.ctx.strategy.skill_style(region);
        self.items(region, &skills, style);
    }

    fn languages(&mut self, region: Region) {
        let cv = self.ctx.cv;
        let languages: Vec<&str> = cv.visible_languages().collect();
        self.heading(region, Section::Languages.title());
        let style = match self.ctx.strategy.skill_style(region) {
            SkillStyle::Tags => SkillStyle::Inline,
            other => other,
        };
        self.items(region, &languages, style);
    }

    fn spacer(&mut self) {
        let after = (self.ctx.settings.section_spacing as f32 * TWIPS_PER_MM).round() as u32;
        self.push(Paragraph::new().line_spacing(LineSpacing::new().before(0).after(after)));
    }

    // ── assembly ────────────────────────────────────────────────────────────

    fn cell(&self, region: Region, paragraphs: Vec<Paragraph>, width: usize) -> TableCell {
        let mut cell = TableCell::new().width(width, WidthType::Dxa);
        if let Some(fill) = self.ctx.region_fill(region) {
            cell = cell.shading(Shading::new().fill(fill.hex()));
        }
        if paragraphs.is_empty() {
            // A cell must hold at least one paragraph.
            return cell.add_paragraph(Paragraph::new());
        }
        paragraphs
            .into_iter()
            .fold(cell, |cell, p| cell.add_paragraph(p))
    }

    fn columns_table(
        &self,
        sidebar: Vec<Paragraph>,
        main: Vec<Paragraph>,
        side: SidePosition,
        side_mm: f32,
    ) -> Table {
        let side_w = mm_to_dxa(side_mm).min(TEXT_WIDTH_DXA / 2);
        let main_w = TEXT_WIDTH_DXA - side_w;
        let side_cell = self.cell(Region::Sidebar, sidebar, side_w);
        let main_cell = self.cell(Region::Main, main, main_w);
        let (cells, grid) = match side {
            SidePosition::Left => (vec![side_cell, main_cell], vec![side_w, main_w]),
            SidePosition::Right => (vec![main_cell, side_cell], vec![main_w, side_w]),
        };
        Table::new(vec![TableRow::new(cells)])
            .set_grid(grid)
            .width(TEXT_WIDTH_DXA, WidthType::Dxa)
            .layout(TableLayoutType::Fixed)
            .set_borders(TableBorders::with_empty())
    }

    fn assemble(mut self) -> Docx {
        let margin_x = (mm_to_dxa(PAGE_WIDTH_MM) - TEXT_WIDTH_DXA) / 2;
        let mut docx = Docx::new()
            .page_size(
                mm_to_dxa(PAGE_WIDTH_MM) as u32,
                mm_to_dxa(PAGE_HEIGHT_MM) as u32,
            )
            .page_margin(
                PageMargin::new()
                    .top(720)
                    .bottom(720)
                    .left(margin_x as i32)
                    .right(margin_x as i32),
            );

        let footer_p = Paragraph::new().align(AlignmentType::Center).add_run(
            self.run(FOOTER_TEXT, Rgb::grey(128), self.ctx.settings.footer_size())
                .italic(),
        );
        docx = docx.footer(Footer::new().add_paragraph(footer_p));

        let two_region = match self.ctx.strategy.family() {
            LayoutFamily::TwoRegion {
                side,
                side_width_mm,
            } => Some((side, side_width_mm)),
            LayoutFamily::SingleRegion => None,
        };

        let mut sidebar = Vec::new();
        let mut main = Vec::new();
        let mut blocks: Vec<Block> = Vec::new();
        for (region, paragraphs) in std::mem::take(&mut self.regions) {
            match (region, two_region) {
                (Region::Sidebar | Region::Main, Some(_)) => {
                    if region == Region::Sidebar {
                        sidebar = paragraphs;
                    } else {
                        main = paragraphs;
                    }
                    // Both columns share one table, placed where the first appears.
                    if !blocks.iter().any(|b| matches!(b, Block::Columns)) {
                        blocks.push(Block::Columns);
                    }
                }
                (Region::Masthead, _) if self.ctx.region_fill(region).is_some() => {
                    blocks.push(Block::Band(paragraphs));
                }
                _ => blocks.push(Block::Flow(paragraphs)),
            }
        }

        for block in blocks {
            docx = match block {
                Block::Flow(paragraphs) => paragraphs
                    .into_iter()
                    .fold(docx, |docx, p| docx.add_paragraph(p)),
                Block::Band(paragraphs) => {
                    let cell = self.cell(Region::Masthead, paragraphs, TEXT_WIDTH_DXA);
                    docx.add_table(
                        Table::new(vec![TableRow::new(vec![cell])])
                            .set_grid(vec![TEXT_WIDTH_DXA])
                            .width(TEXT_WIDTH_DXA, WidthType::Dxa)
                            .layout(TableLayoutType::Fixed)
                            .set_borders(TableBorders::with_empty()),
                    )
                }
                Block::Columns => match two_region {
                    Some((side, side_mm)) => docx.add_table(self.columns_table(
                        std::mem::take(&mut sidebar),
                        std::mem::take(&mut main),
                        side,
                        side_mm,
                    )),
                    None => docx,
                },
            };
        }
        docx
    }
}

enum Block {
    Flow(Vec<Paragraph>),
    /// Masthead inside a shaded full-width cell.
    Band(Vec<Paragraph>),
    Columns,
}

impl SectionCursor for DocxWriter<'_> {
    type Error = RenderError;

    fn begin_region(&mut self, region: Region) -> Result<(), RenderError> {
        self.current.clear();
        if region == Region::Sidebar
            && self.ctx.strategy.photo_placement() == PhotoPlacement::SidebarTop
        {
            if let Some(p) = self.photo_paragraph(SIDEBAR_PHOTO_MM, AlignmentType::Center)? {
                self.push(p);
            }
        }
        Ok(())
    }

    fn render_section(&mut self, region: Region, section: Section) -> Result<(), RenderError> {
        match section {
            Section::Header => self.header(region)?,
            Section::Contact => self.contact(region),
            Section::Summary => self.summary(region),
            Section::Experience => self.experience(region),
            Section::Education => self.education(region),
            Section::Skills => self.skills(region),
            Section::Languages => self.languages(region),
        }
        self.spacer();
        Ok(())
    }

    fn end_region(&mut self, region: Region) -> Result<(), RenderError> {
        let paragraphs = std::mem::take(&mut self.current);
        self.regions.push((region, paragraphs));
        Ok(())
    }
}
