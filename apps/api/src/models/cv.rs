//! The résumé record every renderer and the ATS engine read from.
//!
//! All list fields default to empty vectors and all text fields to empty
//! strings, so a partially filled JSON backup deserializes without gaps.
//! Placeholders ("Your Name", "Position") are a presentation concern and live
//! in the `display_*` helpers; nothing here mutates the record.

use serde::{Deserialize, Serialize};

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const POSITION_PLACEHOLDER: &str = "Position";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvDocument {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    /// Reserved: carried through backups, never rendered or scored.
    pub certifications: Vec<String>,
    /// Reserved: carried through backups, never rendered or scored.
    pub projects: Vec<String>,
    pub languages: Vec<String>,
    /// Reserved: carried through backups, never rendered or scored.
    pub hobbies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
    pub target_position: String,
    /// Raw encoded image bytes (PNG/JPEG), base64 in JSON.
    #[serde(with = "photo_base64", skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub role: String,
    pub organization: String,
    /// Free-text date range, e.g. "2021 - Present".
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub year: String,
}

impl CvDocument {
    /// Name as shown on every target, falling back to the placeholder.
    pub fn display_name(&self) -> &str {
        non_blank_or(&self.personal_info.name, NAME_PLACEHOLDER)
    }

    /// Target position as shown on every target, falling back to the placeholder.
    pub fn display_position(&self) -> &str {
        non_blank_or(&self.personal_info.target_position, POSITION_PLACEHOLDER)
    }

    /// Non-blank skills in insertion order. Blank entries come from trailing
    /// commas in the input form and are never rendered.
    pub fn visible_skills(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.skills)
    }

    pub fn visible_languages(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.languages)
    }

    pub fn has_skills(&self) -> bool {
        self.visible_skills().next().is_some()
    }

    pub fn has_languages(&self) -> bool {
        self.visible_languages().next().is_some()
    }

    /// Contact lines for sidebar layouts: every non-blank contact field.
    pub fn contact_lines(&self) -> Vec<&str> {
        let p = &self.personal_info;
        [
            p.email.as_str(),
            p.phone.as_str(),
            p.address.as_str(),
            p.linkedin.as_str(),
            p.github.as_str(),
            p.website.as_str(),
        ]
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
    }

    /// Single-line contact bar for single-region layouts:
    /// `email | phone | LinkedIn | address`.
    pub fn contact_bar(&self) -> String {
        let p = &self.personal_info;
        let mut parts: Vec<&str> = Vec::new();
        if !p.email.trim().is_empty() {
            parts.push(p.email.trim());
        }
        if !p.phone.trim().is_empty() {
            parts.push(p.phone.trim());
        }
        if !p.linkedin.trim().is_empty() {
            parts.push("LinkedIn");
        }
        if !p.address.trim().is_empty() {
            parts.push(p.address.trim());
        }
        parts.join(" | ")
    }

    /// Download stem, e.g. `CV_Ada_Lovelace`.
    pub fn file_stem(&self) -> String {
        let cleaned: String = self
            .display_name()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        format!("CV_{cleaned}")
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

fn non_blank(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

mod photo_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(photo: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match photo {
            Some(bytes) => s.serialize_str(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(d)?;
        match encoded {
            Some(text) if !text.trim().is_empty() => {
                // Accept both bare base64 and `data:image/...;base64,` URIs.
                let payload = text.rsplit_once(',').map_or(text.as_str(), |(_, b)| b);
                match STANDARD.decode(payload.trim()) {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) => {
                        tracing::warn!("Photo is not valid base64, ignoring it: {e}");
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::sample_cv;

    #[test]
    fn test_json_round_trip_preserves_every_field() {
        let cv = sample_cv();
        let json = serde_json::to_string(&cv).unwrap();
        let back: CvDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cv);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let cv: CvDocument =
            serde_json::from_str(r#"{"personal_info":{"name":"Ada"}}"#).unwrap();
        assert_eq!(cv.personal_info.name, "Ada");
        assert!(cv.experience.is_empty());
        assert!(cv.hobbies.is_empty());
        assert!(cv.personal_info.photo.is_none());
    }

    #[test]
    fn test_photo_accepts_data_uri() {
        let cv: CvDocument = serde_json::from_str(
            r#"{"personal_info":{"photo":"data:image/png;base64,AQID"}}"#,
        )
        .unwrap();
        assert_eq!(cv.personal_info.photo, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_invalid_base64_photo_is_dropped() {
        let cv: CvDocument = serde_json::from_str(
            r#"{"personal_info":{"name":"Ada","photo":"data:image/png;base64,@@not-base64@@"}}"#,
        )
        .unwrap();
        assert_eq!(cv.personal_info.name, "Ada");
        assert!(cv.personal_info.photo.is_none());
    }

    #[test]
    fn test_placeholders_only_at_presentation() {
        let cv = CvDocument::default();
        assert_eq!(cv.display_name(), NAME_PLACEHOLDER);
        assert_eq!(cv.display_position(), POSITION_PLACEHOLDER);
        assert!(cv.personal_info.name.is_empty());
    }

    #[test]
    fn test_contact_bar_uses_linkedin_label() {
        let cv = sample_cv();
        assert_eq!(
            cv.contact_bar(),
            "ada@x.com | +44 20 7946 0000 | LinkedIn | London, UK"
        );
    }

    #[test]
    fn test_blank_skills_are_hidden() {
        let mut cv = CvDocument::default();
        cv.skills = vec!["Rust".to_string(), " ".to_string(), String::new()];
        assert_eq!(cv.visible_skills().collect::<Vec<_>>(), vec!["Rust"]);
        cv.skills = vec![String::new()];
        assert!(!cv.has_skills());
    }

    #[test]
    fn test_file_stem() {
        let cv = sample_cv();
        assert_eq!(cv.file_stem(), "CV_Ada_Lovelace");
        assert_eq!(CvDocument::default().file_stem(), "CV_Your_Name");
    }
}
