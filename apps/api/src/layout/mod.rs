// Layout Strategy — the single place template styles make spatial decisions.
// Every renderer asks the strategy where a section goes, in which order, how
// headings and skills look and where the photo sits; no renderer branches on
// `TemplateStyle` directly.

pub mod templates;

use serde::Serialize;

use crate::models::{CvDocument, TemplateStyle};

pub use templates::strategy_for;

/// Cap on skills listed in a fixed-width side column.
pub const SIDEBAR_SKILL_LIMIT: usize = 12;

/// A4 portrait, in millimetres. Region widths are expressed against this so
/// the flow targets can derive proportional widths from the same constants.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Content blocks a résumé is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Name and target position.
    Header,
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Header => "",
            Section::Contact => "Contact",
            Section::Summary => "Summary",
            Section::Experience => "Work Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Languages => "Languages",
        }
    }
}

/// Spatial subdivision a section is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Full-width band across the top of the first page.
    Masthead,
    /// Fixed-width column of a two-region layout.
    Sidebar,
    /// Complementary column of a two-region layout.
    Main,
    /// The one flowing column of a single-region layout.
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidePosition {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutFamily {
    TwoRegion {
        side: SidePosition,
        /// Width of the sidebar column, millimetres on the page.
        side_width_mm: f32,
    },
    SingleRegion,
}

impl LayoutFamily {
    pub fn label(&self) -> &'static str {
        match self {
            LayoutFamily::TwoRegion { .. } => "two_region",
            LayoutFamily::SingleRegion => "single_region",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoPlacement {
    None,
    /// Top of the sidebar column, above the first sidebar section.
    SidebarTop,
    /// Right-hand end of the header block (or masthead band).
    HeaderRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStyle {
    /// One contact field per line under a "Contact" heading.
    List,
    /// `a | b | c` on one line under the header.
    InlineBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    /// Bold caps in `base` colour with a rule underneath.
    Underline,
    /// Bold caps on a filled `base` band.
    Banner,
    /// Bold caps in the region's text colour, no decoration (sidebars).
    Caps,
    /// Bold caps with a short `accent` bar in front.
    AccentBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillStyle {
    /// One bullet per line.
    List,
    /// Comma-separated paragraph.
    Inline,
    /// Small filled chips that wrap.
    Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMarker {
    None,
    /// A filled circle per experience entry joined by a vertical rule.
    Timeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// How a two-region layout paints its sidebar column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarFill {
    /// `base` colour with light text on top.
    Solid,
    /// A pale tint of `base` with regular text.
    Tint,
}

/// Full-width coloured band behind the masthead region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub height_mm: f32,
}

/// One template style's spatial algorithm.
pub trait LayoutStrategy: Send + Sync {
    fn style(&self) -> TemplateStyle;

    fn family(&self) -> LayoutFamily;

    /// Regions in drawing order, each with its fixed section order.
    fn regions(&self) -> &'static [(Region, &'static [Section])];

    fn photo_placement(&self) -> PhotoPlacement;

    fn contact_style(&self) -> ContactStyle;

    fn heading_style(&self, region: Region) -> HeadingStyle;

    fn skill_style(&self, region: Region) -> SkillStyle;

    fn alignment(&self) -> Alignment {
        Alignment::Left
    }

    fn entry_marker(&self) -> EntryMarker {
        EntryMarker::None
    }

    fn masthead_band(&self) -> Option<Band> {
        None
    }

    fn sidebar_fill(&self) -> SidebarFill {
        SidebarFill::Tint
    }

    fn skill_limit(&self, region: Region) -> Option<usize> {
        (region == Region::Sidebar).then_some(SIDEBAR_SKILL_LIMIT)
    }

    /// Flattened section order across all regions.
    #[cfg(test)]
    fn section_order(&self) -> Vec<Section> {
        self.regions()
            .iter()
            .flat_map(|(_, sections)| sections.iter().copied())
            .collect()
    }

    #[cfg(test)]
    fn region_for(&self, section: Section) -> Option<Region> {
        self.regions()
            .iter()
            .find(|(_, sections)| sections.contains(&section))
            .map(|(region, _)| *region)
    }

    /// Applies inclusion rules to the fixed order for one document.
    ///
    /// Header and Summary are structural chrome and always present. Contact
    /// appears when any contact field is filled. List sections appear only
    /// when they have visible entries.
    fn plan(&self, cv: &CvDocument) -> LayoutPlan {
        let regions = self
            .regions()
            .iter()
            .map(|(region, sections)| RegionPlan {
                region: *region,
                sections: sections
                    .iter()
                    .copied()
                    .filter(|section| is_included(*section, cv))
                    .collect(),
            })
            .collect();
        LayoutPlan { regions }
    }
}

fn is_included(section: Section, cv: &CvDocument) -> bool {
    match section {
        Section::Header | Section::Summary => true,
        Section::Contact => !cv.contact_lines().is_empty(),
        Section::Experience => !cv.experience.is_empty(),
        Section::Education => !cv.education.is_empty(),
        Section::Skills => cv.has_skills(),
        Section::Languages => cv.has_languages(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionPlan {
    pub region: Region,
    pub sections: Vec<Section>,
}

/// The per-document outcome of a strategy: which sections go where, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub regions: Vec<RegionPlan>,
}

impl LayoutPlan {
    #[cfg(test)]
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.regions.iter().flat_map(|r| r.sections.iter().copied())
    }

    /// Drives a renderer through the plan region by region.
    pub fn render_sections<C: SectionCursor>(&self, cursor: &mut C) -> Result<(), C::Error> {
        for region in &self.regions {
            cursor.begin_region(region.region)?;
            for section in &region.sections {
                cursor.render_section(region.region, *section)?;
            }
            cursor.end_region(region.region)?;
        }
        Ok(())
    }
}

/// What each format renderer implements to consume a `LayoutPlan`.
pub trait SectionCursor {
    type Error;

    fn begin_region(&mut self, region: Region) -> Result<(), Self::Error>;

    fn render_section(&mut self, region: Region, section: Section) -> Result<(), Self::Error>;

    fn end_region(&mut self, _region: Region) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Visible skills for a region after the strategy's cap is applied.
/// The cap is cosmetic; the record keeps every skill.
pub fn skills_for<'a>(
    strategy: &dyn LayoutStrategy,
    region: Region,
    cv: &'a CvDocument,
) -> Vec<&'a str> {
    let limit = strategy.skill_limit(region).unwrap_or(usize::MAX);
    cv.visible_skills().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::sample_cv;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl SectionCursor for Recorder {
        type Error = ();

        fn begin_region(&mut self, region: Region) -> Result<(), ()> {
            self.events.push(format!("begin {region:?}"));
            Ok(())
        }

        fn render_section(&mut self, _region: Region, section: Section) -> Result<(), ()> {
            self.events.push(format!("{section:?}"));
            Ok(())
        }

        fn end_region(&mut self, region: Region) -> Result<(), ()> {
            self.events.push(format!("end {region:?}"));
            Ok(())
        }
    }

    #[test]
    fn test_empty_cv_keeps_only_chrome() {
        let cv = CvDocument::default();
        for style in TemplateStyle::ALL {
            let plan = strategy_for(style).plan(&cv);
            let sections: Vec<_> = plan.sections().collect();
            assert!(sections.contains(&Section::Header), "{style:?}");
            assert!(sections.contains(&Section::Summary), "{style:?}");
            for optional in [
                Section::Contact,
                Section::Experience,
                Section::Education,
                Section::Skills,
                Section::Languages,
            ] {
                assert!(!sections.contains(&optional), "{style:?} kept {optional:?}");
            }
        }
    }

    #[test]
    fn test_full_cv_includes_every_section_once() {
        let cv = sample_cv();
        for style in TemplateStyle::ALL {
            let plan = strategy_for(style).plan(&cv);
            let sections: Vec<_> = plan.sections().collect();
            assert_eq!(sections.len(), 7, "{style:?}: {sections:?}");
        }
    }

    #[test]
    fn test_render_sections_visits_regions_in_order() {
        let cv = sample_cv();
        let plan = strategy_for(TemplateStyle::ModernSidebar).plan(&cv);
        let mut recorder = Recorder::default();
        plan.render_sections(&mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec![
                "begin Sidebar",
                "Contact",
                "Skills",
                "Languages",
                "end Sidebar",
                "begin Main",
                "Header",
                "Summary",
                "Experience",
                "Education",
                "end Main",
            ]
        );
    }

    #[test]
    fn test_sidebar_skills_are_capped() {
        let mut cv = sample_cv();
        cv.skills = (0..20).map(|i| format!("s{i}")).collect();
        let strategy = strategy_for(TemplateStyle::ModernSidebar);
        assert_eq!(skills_for(strategy, Region::Sidebar, &cv).len(), SIDEBAR_SKILL_LIMIT);
        assert_eq!(skills_for(strategy, Region::Single, &cv).len(), 20);
        assert_eq!(cv.skills.len(), 20);
    }

    #[test]
    fn test_region_for() {
        let s = strategy_for(TemplateStyle::ModernSidebar);
        assert_eq!(s.region_for(Section::Skills), Some(Region::Sidebar));
        assert_eq!(s.region_for(Section::Experience), Some(Region::Main));
        let s = strategy_for(TemplateStyle::ClassicVertical);
        assert_eq!(s.region_for(Section::Skills), Some(Region::Single));
    }
}
