use serde::{Deserialize, Serialize};

/// One gradeable part of a multi-part item (a matrix row, a bow-tie pool
/// slot, a cloze slot, a case-study step).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartScore {
    pub label: String,
    pub matched: bool,
}

/// Outcome of grading one response against one item. Pure data; the
/// reporting collaborator decides what to do with `ungradable` results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub is_correct: bool,
    /// 0.0..=1.0; equals 1.0 exactly when `is_correct`.
    pub credit_fraction: f64,
    /// Per-part breakdown for partial-credit formats; empty for simple ones.
    pub parts: Vec<PartScore>,
    /// The response could not be interpreted against the answer shape.
    pub ungradable: bool,
    pub reason: Option<String>,
}

impl ScoreResult {
    pub fn correct() -> ScoreResult {
        ScoreResult {
            is_correct: true,
            credit_fraction: 1.0,
            parts: Vec::new(),
            ungradable: false,
            reason: None,
        }
    }

    pub fn incorrect() -> ScoreResult {
        ScoreResult {
            is_correct: false,
            credit_fraction: 0.0,
            parts: Vec::new(),
            ungradable: false,
            reason: None,
        }
    }

    /// Fraction of matched parts over all parts; full credit only when every
    /// part matched. `parts` must be non-empty.
    pub fn from_parts(parts: Vec<PartScore>) -> ScoreResult {
        let total = parts.len();
        let matched = parts.iter().filter(|p| p.matched).count();
        let credit = if total == 0 { 0.0 } else { matched as f64 / total as f64 };
        ScoreResult {
            is_correct: total > 0 && matched == total,
            credit_fraction: credit,
            parts,
            ungradable: false,
            reason: None,
        }
    }

    pub fn ungradable(reason: impl Into<String>) -> ScoreResult {
        ScoreResult {
            is_correct: false,
            credit_fraction: 0.0,
            parts: Vec::new(),
            ungradable: true,
            reason: Some(reason.into()),
        }
    }
}
