//! The five concrete layout strategies.

use super::{
    Alignment, Band, ContactStyle, EntryMarker, HeadingStyle, LayoutFamily, LayoutStrategy,
    PhotoPlacement, Region, Section, SidePosition, SidebarFill, SkillStyle,
};
use crate::models::TemplateStyle;

pub fn strategy_for(style: TemplateStyle) -> &'static dyn LayoutStrategy {
    match style {
        TemplateStyle::ModernSidebar => &ModernSidebar,
        TemplateStyle::ClassicVertical => &ClassicVertical,
        TemplateStyle::MinimalClean => &MinimalClean,
        TemplateStyle::Executive => &Executive,
        TemplateStyle::Creative => &Creative,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Two-region
// ────────────────────────────────────────────────────────────────────────────

/// Coloured left sidebar with contact, skills and languages; name and the
/// narrative sections in the main column.
pub struct ModernSidebar;

impl LayoutStrategy for ModernSidebar {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::ModernSidebar
    }

    fn family(&self) -> LayoutFamily {
        LayoutFamily::TwoRegion {
            side: SidePosition::Left,
            side_width_mm: 65.0,
        }
    }

    fn regions(&self) -> &'static [(Region, &'static [Section])] {
        &[
            (
                Region::Sidebar,
                &[Section::Contact, Section::Skills, Section::Languages],
            ),
            (
                Region::Main,
                &[
                    Section::Header,
                    Section::Summary,
                    Section::Experience,
                    Section::Education,
                ],
            ),
        ]
    }

    fn photo_placement(&self) -> PhotoPlacement {
        PhotoPlacement::SidebarTop
    }

    fn contact_style(&self) -> ContactStyle {
        ContactStyle::List
    }

    fn heading_style(&self, region: Region) -> HeadingStyle {
        match region {
            Region::Sidebar => HeadingStyle::Caps,
            _ => HeadingStyle::Underline,
        }
    }

    fn skill_style(&self, _region: Region) -> SkillStyle {
        SkillStyle::List
    }

    fn sidebar_fill(&self) -> SidebarFill {
        SidebarFill::Solid
    }
}

/// Full-width masthead band, a wide narrative column on the left and a
/// lightly tinted fixed-width column on the right.
pub struct Executive;

impl LayoutStrategy for Executive {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::Executive
    }

    fn family(&self) -> LayoutFamily {
        LayoutFamily::TwoRegion {
            side: SidePosition::Right,
            side_width_mm: 62.0,
        }
    }

    fn regions(&self) -> &'static [(Region, &'static [Section])] {
        &[
            (Region::Masthead, &[Section::Header, Section::Contact]),
            (Region::Main, &[Section::Summary, Section::Experience]),
            (
                Region::Sidebar,
                &[Section::Education, Section::Skills, Section::Languages],
            ),
        ]
    }

    fn photo_placement(&self) -> PhotoPlacement {
        PhotoPlacement::HeaderRight
    }

    fn contact_style(&self) -> ContactStyle {
        ContactStyle::InlineBar
    }

    fn heading_style(&self, region: Region) -> HeadingStyle {
        match region {
            Region::Sidebar => HeadingStyle::Caps,
            _ => HeadingStyle::Underline,
        }
    }

    fn skill_style(&self, _region: Region) -> SkillStyle {
        SkillStyle::List
    }

    fn masthead_band(&self) -> Option<Band> {
        Some(Band { height_mm: 42.0 })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Single-region
// ────────────────────────────────────────────────────────────────────────────

const SINGLE_ORDER: &[Section] = &[
    Section::Header,
    Section::Contact,
    Section::Summary,
    Section::Experience,
    Section::Education,
    Section::Skills,
    Section::Languages,
];

/// One left-aligned column with filled section banners.
pub struct ClassicVertical;

impl LayoutStrategy for ClassicVertical {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::ClassicVertical
    }

    fn family(&self) -> LayoutFamily {
        LayoutFamily::SingleRegion
    }

    fn regions(&self) -> &'static [(Region, &'static [Section])] {
        &[(Region::Single, SINGLE_ORDER)]
    }

    fn photo_placement(&self) -> PhotoPlacement {
        PhotoPlacement::HeaderRight
    }

    fn contact_style(&self) -> ContactStyle {
        ContactStyle::InlineBar
    }

    fn heading_style(&self, _region: Region) -> HeadingStyle {
        HeadingStyle::Banner
    }

    fn skill_style(&self, _region: Region) -> SkillStyle {
        SkillStyle::Inline
    }
}

/// ATS-plain: centred text, underlined headings, no fills, no photo.
pub struct MinimalClean;

impl LayoutStrategy for MinimalClean {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::MinimalClean
    }

    fn family(&self) -> LayoutFamily {
        LayoutFamily::SingleRegion
    }

    fn regions(&self) -> &'static [(Region, &'static [Section])] {
        &[(Region::Single, SINGLE_ORDER)]
    }

    fn photo_placement(&self) -> PhotoPlacement {
        PhotoPlacement::None
    }

    fn contact_style(&self) -> ContactStyle {
        ContactStyle::InlineBar
    }

    fn heading_style(&self, _region: Region) -> HeadingStyle {
        HeadingStyle::Underline
    }

    fn skill_style(&self, _region: Region) -> SkillStyle {
        SkillStyle::Inline
    }

    fn alignment(&self) -> Alignment {
        Alignment::Center
    }
}

/// Coloured hero band, accent-bar headings, skill chips and a timeline
/// marker in front of every experience entry.
pub struct Creative;

impl LayoutStrategy for Creative {
    fn style(&self) -> TemplateStyle {
        TemplateStyle::Creative
    }

    fn family(&self) -> LayoutFamily {
        LayoutFamily::SingleRegion
    }

    fn regions(&self) -> &'static [(Region, &'static [Section])] {
        &[
            (Region::Masthead, &[Section::Header, Section::Contact]),
            (
                Region::Single,
                &[
                    Section::Summary,
                    Section::Experience,
                    Section::Skills,
                    Section::Education,
                    Section::Languages,
                ],
            ),
        ]
    }

    fn photo_placement(&self) -> PhotoPlacement {
        PhotoPlacement::HeaderRight
    }

    fn contact_style(&self) -> ContactStyle {
        ContactStyle::InlineBar
    }

    fn heading_style(&self, _region: Region) -> HeadingStyle {
        HeadingStyle::AccentBar
    }

    fn skill_style(&self, _region: Region) -> SkillStyle {
        SkillStyle::Tags
    }

    fn entry_marker(&self) -> EntryMarker {
        EntryMarker::Timeline
    }

    fn masthead_band(&self) -> Option<Band> {
        Some(Band { height_mm: 50.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_for_round_trips_style() {
        for style in TemplateStyle::ALL {
            assert_eq!(strategy_for(style).style(), style);
        }
    }

    #[test]
    fn test_every_section_placed_exactly_once() {
        for style in TemplateStyle::ALL {
            let order = strategy_for(style).section_order();
            assert_eq!(order.len(), 7, "{style:?}");
            let mut dedup = order.clone();
            dedup.sort_by_key(|s| *s as u8);
            dedup.dedup();
            assert_eq!(dedup.len(), 7, "{style:?} repeats a section");
        }
    }

    #[test]
    fn test_two_region_families() {
        for style in [TemplateStyle::ModernSidebar, TemplateStyle::Executive] {
            assert!(matches!(
                strategy_for(style).family(),
                LayoutFamily::TwoRegion { .. }
            ));
        }
        for style in [
            TemplateStyle::ClassicVertical,
            TemplateStyle::MinimalClean,
            TemplateStyle::Creative,
        ] {
            assert_eq!(strategy_for(style).family(), LayoutFamily::SingleRegion);
        }
    }

    #[test]
    fn test_contact_goes_to_sidebar_or_bar() {
        let modern = strategy_for(TemplateStyle::ModernSidebar);
        assert_eq!(modern.contact_style(), ContactStyle::List);
        assert_eq!(modern.region_for(Section::Contact), Some(Region::Sidebar));
        let classic = strategy_for(TemplateStyle::ClassicVertical);
        assert_eq!(classic.contact_style(), ContactStyle::InlineBar);
    }

    #[test]
    fn test_minimal_is_ats_plain() {
        let minimal = strategy_for(TemplateStyle::MinimalClean);
        assert_eq!(minimal.alignment(), Alignment::Center);
        assert_eq!(minimal.photo_placement(), PhotoPlacement::None);
        assert_ne!(minimal.heading_style(Region::Single), HeadingStyle::Banner);
        assert!(minimal.masthead_band().is_none());
    }

    #[test]
    fn test_sidebar_fills() {
        assert_eq!(
            strategy_for(TemplateStyle::ModernSidebar).sidebar_fill(),
            SidebarFill::Solid
        );
        assert_eq!(
            strategy_for(TemplateStyle::Executive).sidebar_fill(),
            SidebarFill::Tint
        );
    }

    #[test]
    fn test_creative_motifs() {
        let creative = strategy_for(TemplateStyle::Creative);
        assert_eq!(creative.entry_marker(), EntryMarker::Timeline);
        assert!(creative.masthead_band().is_some());
    }
}
