//! Advisory messages, most important first.

use super::scoring::{score_signals, MAX_SCORE};
use super::signals::{CvSignals, SUBSTANTIAL_SUMMARY_WORDS};

pub const MAX_SUGGESTIONS: usize = 4;

/// Score below which the overall warning leads the list.
pub const PASSING_SCORE: u32 = 70;

/// Skill count below which more skills are suggested.
pub const RECOMMENDED_SKILLS: usize = 8;

/// Experience count below which more entries are suggested.
pub const RECOMMENDED_EXPERIENCE: usize = 2;

pub const ALL_GOOD: &str =
    "Great job! Your CV covers everything automated screening looks for.";

/// Each rule is checked in order; the first `MAX_SUGGESTIONS` that fire are kept.
pub fn suggestions_for(signals: &CvSignals) -> Vec<String> {
    let score = score_signals(signals);
    let mut out = Vec::new();

    if score < PASSING_SCORE {
        out.push(format!(
            "Your ATS score is {score}/{MAX_SCORE}. Fill in the gaps below to get past automated screening."
        ));
    }

    if !signals.has_summary() {
        out.push(format!(
            "Add a professional summary of at least {SUBSTANTIAL_SUMMARY_WORDS} words."
        ));
    } else if !signals.has_substantial_summary() {
        out.push(format!(
            "Expand your summary to at least {SUBSTANTIAL_SUMMARY_WORDS} words (currently {}).",
            signals.summary_words
        ));
    }

    if signals.skill_count < RECOMMENDED_SKILLS {
        out.push(format!(
            "List at least {RECOMMENDED_SKILLS} relevant skills (currently {}).",
            signals.skill_count
        ));
    }

    if signals.experience_count == 0 {
        out.push("Add your work experience, including internships and projects.".to_string());
    } else if signals.experience_count < RECOMMENDED_EXPERIENCE {
        out.push("Add at least one more experience entry to show career progression.".to_string());
    }

    if !signals.has_quantified_achievement {
        out.push(
            "Quantify your achievements with numbers: percentages, multipliers (3x) or amounts."
                .to_string(),
        );
    }

    if !signals.has_action_verb {
        out.push(
            "Start descriptions with action verbs such as led, developed, improved or achieved."
                .to_string(),
        );
    }

    if out.is_empty() {
        out.push(ALL_GOOD.to_string());
    }
    out.truncate(MAX_SUGGESTIONS);
    out
}
