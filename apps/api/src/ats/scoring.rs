//! ATS score: a fixed point table over `CvSignals`.
//!
//! | Signal                        | Points        |
//! |-------------------------------|---------------|
//! | name / email / position       | 10 each       |
//! | summary present, ≥ 50 words   | 5, +5         |
//! | experience ≥ 1 / ≥ 2 / ≥ 3    | 10 / +5 / +3  |
//! | education ≥ 1 / ≥ 2           | 5 / +5        |
//! | skills ≥ 5 / ≥ 8 / ≥ 12       | 3 / +3 / +6   |
//! | quantified achievement        | 5             |
//! | action verb                   | 5             |
//!
//! The table tops out at 90; the sum is still clamped to 100.

use super::signals::CvSignals;

pub const MAX_SCORE: u32 = 100;

/// (threshold, points) tiers; every reached tier adds its points.
const EXPERIENCE_TIERS: [(usize, u32); 3] = [(1, 10), (2, 5), (3, 3)];
const EDUCATION_TIERS: [(usize, u32); 2] = [(1, 5), (2, 5)];
const SKILL_TIERS: [(usize, u32); 3] = [(5, 3), (8, 3), (12, 6)];

/// Score of a whole document; the report computes signals once and shares them.
#[cfg(test)]
pub fn ats_score(cv: &crate::models::CvDocument) -> u32 {
    score_signals(&CvSignals::extract(cv))
}

pub fn score_signals(s: &CvSignals) -> u32 {
    let mut score = 0;

    score += points(s.has_name, 10);
    score += points(s.has_email, 10);
    score += points(s.has_target_position, 10);

    score += points(s.has_summary(), 5);
    score += points(s.has_substantial_summary(), 5);

    score += tiers(s.experience_count, &EXPERIENCE_TIERS);
    score += tiers(s.education_count, &EDUCATION_TIERS);
    score += tiers(s.skill_count, &SKILL_TIERS);

    score += points(s.has_quantified_achievement, 5);
    score += points(s.has_action_verb, 5);

    score.min(MAX_SCORE)
}

fn points(reached: bool, value: u32) -> u32 {
    if reached {
        value
    } else {
        0
    }
}

fn tiers(count: usize, table: &[(usize, u32)]) -> u32 {
    table
        .iter()
        .filter(|(threshold, _)| count >= *threshold)
        .map(|(_, value)| value)
        .sum()
}
