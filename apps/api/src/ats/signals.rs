//! Content signals shared by the scorer and the suggestion engine.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::CvDocument;

/// Summary length from which the summary counts as substantial.
pub const SUBSTANTIAL_SUMMARY_WORDS: usize = 50;

/// Achievement verbs recruiters' parsers look for.
pub const ACTION_VERBS: [&str; 8] = [
    "managed",
    "developed",
    "created",
    "improved",
    "increased",
    "reduced",
    "led",
    "achieved",
];

// "30%", "12.5 %"
static PERCENT: LazyLock<Regex> = LazyLock::new(|| compile(r"\d+(?:[.,]\d+)?\s?%"));

// "3x", "10x faster"
static MULTIPLIER: LazyLock<Regex> = LazyLock::new(|| compile(r"\b\d+(?:\.\d+)?x\b"));

// "$2m", "€ 40k", "rp 5.000.000", "200k usd"
static CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"[$€£¥]\s?\d|\b(?:rp|usd|eur|gbp|idr)\.?\s?\d|\d[km]?\s?(?:usd|eur|gbp|idr)\b")
});

static ACTION_VERB: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"\b(?:{})\b", ACTION_VERBS.join("|"))));

// Patterns are literals, exercised by the tests below.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static ATS pattern must compile")
}

/// Everything the ATS heuristics look at, extracted once per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CvSignals {
    pub has_name: bool,
    pub has_email: bool,
    pub has_target_position: bool,
    pub summary_words: usize,
    pub experience_count: usize,
    pub education_count: usize,
    /// Non-blank skills only.
    pub skill_count: usize,
    pub has_quantified_achievement: bool,
    pub has_action_verb: bool,
}

impl CvSignals {
    pub fn extract(cv: &CvDocument) -> Self {
        let info = &cv.personal_info;
        let text = achievement_text(cv);

        Self {
            has_name: !info.name.trim().is_empty(),
            has_email: !info.email.trim().is_empty(),
            has_target_position: !info.target_position.trim().is_empty(),
            summary_words: cv.summary.split_whitespace().count(),
            experience_count: cv.experience.len(),
            education_count: cv.education.len(),
            skill_count: cv.visible_skills().count(),
            has_quantified_achievement: has_quantified_achievement(&text),
            has_action_verb: ACTION_VERB.is_match(&text),
        }
    }

    pub fn has_summary(&self) -> bool {
        self.summary_words > 0
    }

    pub fn has_substantial_summary(&self) -> bool {
        self.summary_words >= SUBSTANTIAL_SUMMARY_WORDS
    }
}

/// Summary plus every experience description, lowercased.
fn achievement_text(cv: &CvDocument) -> String {
    let mut text = cv.summary.to_lowercase();
    for entry in &cv.experience {
        text.push('\n');
        text.push_str(&entry.description.to_lowercase());
    }
    text
}

fn has_quantified_achievement(text: &str) -> bool {
    PERCENT.is_match(text) || MULTIPLIER.is_match(text) || CURRENCY.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::sample_cv;
    use crate::models::Experience;

    fn with_description(description: &str) -> CvDocument {
        CvDocument {
            experience: vec![Experience {
                description: description.to_string(),
                ..Experience::default()
            }],
            ..CvDocument::default()
        }
    }

    #[test]
    fn test_quantified_patterns() {
        for text in [
            "Increased revenue 30%",
            "cut latency by 12.5 %",
            "made the build 3x faster",
            "saved $2M a year",
            "closed deals worth Rp 5.000.000",
            "budget of 200k USD",
        ] {
            assert!(
                CvSignals::extract(&with_description(text)).has_quantified_achievement,
                "{text}"
            );
        }
        for text in ["", "worked on the payments team", "box of 3 items", "exploring xml"] {
            assert!(
                !CvSignals::extract(&with_description(text)).has_quantified_achievement,
                "{text}"
            );
        }
    }

    #[test]
    fn test_action_verbs_match_whole_words_only() {
        assert!(CvSignals::extract(&with_description("Led a team of five")).has_action_verb);
        assert!(CvSignals::extract(&with_description("MANAGED the roadmap")).has_action_verb);
        // "led" inside another word does not count
        assert!(!CvSignals::extract(&with_description("filed reports, settled accounts")).has_action_verb);
    }

    #[test]
    fn test_summary_is_scanned_too() {
        let cv = CvDocument {
            summary: "Improved onboarding conversion by 15%.".to_string(),
            ..CvDocument::default()
        };
        let signals = CvSignals::extract(&cv);
        assert!(signals.has_action_verb);
        assert!(signals.has_quantified_achievement);
        assert_eq!(signals.summary_words, 5);
    }

    #[test]
    fn test_blank_fields_do_not_count() {
        let mut cv = sample_cv();
        cv.personal_info.name = "   ".to_string();
        cv.skills.push("  ".to_string());
        let signals = CvSignals::extract(&cv);
        assert!(!signals.has_name);
        assert!(signals.has_email);
        assert_eq!(signals.skill_count, 2);
        assert_eq!(signals.experience_count, 1);
    }
}
