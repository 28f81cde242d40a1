//! ATS compatibility heuristics: a 0–100 score and a short advisory list.
//! Pure functions over `CvDocument`; both read the same `CvSignals`.

pub mod handlers;
pub mod scoring;
pub mod signals;
pub mod suggestions;

use serde::Serialize;

use crate::models::CvDocument;
use signals::CvSignals;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtsReport {
    pub score: u32,
    pub suggestions: Vec<String>,
}

impl AtsReport {
    pub fn for_cv(cv: &CvDocument) -> Self {
        let signals = CvSignals::extract(cv);
        Self {
            score: scoring::score_signals(&signals),
            suggestions: suggestions::suggestions_for(&signals),
        }
    }
}
