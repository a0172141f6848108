use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::models::body::*;
use crate::models::score::{PartScore, ScoreResult};
use crate::utils::markup;

/// Pure, stateless grading of one response against one item body. Total:
/// malformed responses (wrong type, wrong cardinality, out-of-range index,
/// non-permutation) come back `ungradable` with zero credit, never a panic.
/// Statelessness is what makes batch grading embarrassingly parallel: N
/// responses are N independent invocations.
pub struct GradingService;

impl GradingService {
    pub fn score(body: &ItemBody, response: &JsonValue) -> ScoreResult {
        let result = match body {
            ItemBody::MultipleChoice { payload, key } => {
                single_index(&payload.options, key, response)
            }
            ItemBody::TrendItem { payload, key } => single_index(&payload.options, key, response),
            ItemBody::Sata { payload, key } => {
                exact_set(payload.options.len(), &key.correct, response)
            }
            ItemBody::SelectN { payload, key } => select_n(payload, key, response),
            ItemBody::HighlightText { payload, key } => {
                exact_set(markup::clickable_count(&payload.tokens), &key.correct, response)
            }
            ItemBody::MatrixMultipleResponse { payload, key } => matrix(payload, key, response),
            ItemBody::Bowtie { payload, key } => bowtie(payload, key, response),
            ItemBody::ClozeDropdown { payload, key }
            | ItemBody::ExtendedDragDrop { payload, key }
            | ItemBody::ExtendedMultipleResponse { payload, key } => slots(payload, key, response),
            ItemBody::Ranking { payload, key } => ranking(payload, key, response),
            ItemBody::DosageCalculation { payload, key } => dosage(payload, key, response),
            ItemBody::CaseStudy { payload, key } => case_study(payload, key, response),
        };
        if result.ungradable {
            tracing::warn!(
                format = %body.tag(),
                reason = result.reason.as_deref().unwrap_or(""),
                "response could not be graded"
            );
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Response probing. Responses arrive as raw JSON from the delivery layer;
// every parse failure is an ungradable verdict for the caller to route to
// manual review or zero credit.
// ---------------------------------------------------------------------------

/// A single selected index, either a bare number or `{"selected": n}`.
fn probe_index(value: &JsonValue) -> Option<usize> {
    let raw = value
        .as_u64()
        .or_else(|| value.get("selected").and_then(JsonValue::as_u64))?;
    usize::try_from(raw).ok()
}

fn probe_index_set(value: &JsonValue) -> Option<BTreeSet<usize>> {
    let array = value.as_array()?;
    let mut set = BTreeSet::new();
    for entry in array {
        set.insert(usize::try_from(entry.as_u64()?).ok()?);
    }
    Some(set)
}

/// An array of exactly `expected` indices, one per row/slot/step. A short
/// array or a null entry means an unanswered part, which is the caller's
/// malformed-response case, not a zero for that part.
fn probe_index_array(value: &JsonValue, expected: usize) -> Option<Vec<usize>> {
    let array = value.as_array()?;
    if array.len() != expected {
        return None;
    }
    array
        .iter()
        .map(|entry| usize::try_from(entry.as_u64()?).ok())
        .collect()
}

/// Dosage responses may arrive as a JSON number or a numeric string; both
/// go through `Decimal` so the tolerance comparison is exact.
fn probe_decimal(value: &JsonValue) -> Option<Decimal> {
    match value {
        JsonValue::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        JsonValue::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Per-format policies.
// ---------------------------------------------------------------------------

fn single_index(options: &[String], key: &SingleIndexKey, response: &JsonValue) -> ScoreResult {
    let Some(correct) = key.correct else {
        return ScoreResult::ungradable("item has no answer key");
    };
    let Some(given) = probe_index(response) else {
        return ScoreResult::ungradable("response is not a single option index");
    };
    if given >= options.len() {
        return ScoreResult::ungradable(format!("option index {given} out of range"));
    }
    if given == correct {
        ScoreResult::correct()
    } else {
        ScoreResult::incorrect()
    }
}

fn exact_set(clickable: usize, correct: &BTreeSet<usize>, response: &JsonValue) -> ScoreResult {
    if correct.is_empty() {
        return ScoreResult::ungradable("item has no answer key");
    }
    let Some(given) = probe_index_set(response) else {
        return ScoreResult::ungradable("response is not an index array");
    };
    if let Some(&max) = given.iter().max() {
        if max >= clickable {
            return ScoreResult::ungradable(format!("index {max} out of range"));
        }
    }
    if given == *correct {
        ScoreResult::correct()
    } else {
        ScoreResult::incorrect()
    }
}

/// Select-N carries a fixed selection cardinality; a response of the wrong
/// size has the wrong shape and is ungradable, not merely incorrect.
fn select_n(payload: &SelectNPayload, key: &IndexSetKey, response: &JsonValue) -> ScoreResult {
    if key.correct.is_empty() {
        return ScoreResult::ungradable("item has no answer key");
    }
    let Some(given) = probe_index_set(response) else {
        return ScoreResult::ungradable("response is not an index array");
    };
    if given.len() != payload.required {
        return ScoreResult::ungradable(format!(
            "response must select exactly {} option(s), got {}",
            payload.required,
            given.len()
        ));
    }
    if let Some(&max) = given.iter().max() {
        if max >= payload.options.len() {
            return ScoreResult::ungradable(format!("index {max} out of range"));
        }
    }
    if given == key.correct {
        ScoreResult::correct()
    } else {
        ScoreResult::incorrect()
    }
}

fn matrix(payload: &MatrixPayload, key: &MatrixKey, response: &JsonValue) -> ScoreResult {
    if payload.rows.is_empty()
        || key.by_row.len() != payload.rows.len()
        || key.by_row.iter().any(Option::is_none)
    {
        return ScoreResult::ungradable("item has an incomplete answer key");
    }
    // A response that skips a row is ungradable as a whole; the missing row
    // is neither scored as wrong nor dropped from the denominator.
    let Some(given) = probe_index_array(response, payload.rows.len()) else {
        return ScoreResult::ungradable("response must answer every row");
    };
    if let Some(&bad) = given.iter().find(|&&col| col >= payload.columns.len()) {
        return ScoreResult::ungradable(format!("column index {bad} out of range"));
    }
    let parts = payload
        .rows
        .iter()
        .zip(key.by_row.iter())
        .zip(given.iter())
        .map(|((row, correct), chosen)| PartScore {
            label: row.clone(),
            matched: *correct == Some(*chosen),
        })
        .collect();
    ScoreResult::from_parts(parts)
}

fn bowtie(payload: &BowtiePayload, key: &BowtieKey, response: &JsonValue) -> ScoreResult {
    let limits = &payload.limits;
    if key.findings.len() != limits.findings
        || key.condition.len() != limits.condition
        || key.actions.len() != limits.actions
    {
        return ScoreResult::ungradable("item has an incomplete answer key");
    }
    let Some(obj) = response.as_object() else {
        return ScoreResult::ungradable("response must name the three pools");
    };
    let mut parts = Vec::with_capacity(limits.total());
    let pools: [(&str, &Vec<String>, &BTreeSet<usize>, usize); 3] = [
        ("findings", &payload.findings, &key.findings, limits.findings),
        ("condition", &payload.conditions, &key.condition, limits.condition),
        ("actions", &payload.actions, &key.actions, limits.actions),
    ];
    for (name, options, correct, limit) in pools {
        let Some(given) = obj.get(name).and_then(probe_index_set) else {
            return ScoreResult::ungradable(format!("missing or malformed pool '{name}'"));
        };
        if given.len() > limit {
            return ScoreResult::ungradable(format!(
                "pool '{name}' allows {limit} selection(s), got {}",
                given.len()
            ));
        }
        if let Some(&max) = given.iter().max() {
            if max >= options.len() {
                return ScoreResult::ungradable(format!("pool '{name}' index {max} out of range"));
            }
        }
        // One part per key slot: the denominator is the total number of key
        // selections across all three pools.
        for &idx in correct {
            parts.push(PartScore {
                label: format!("{name}[{idx}]"),
                matched: given.contains(&idx),
            });
        }
    }
    ScoreResult::from_parts(parts)
}

fn slots(payload: &SlotPayload, key: &SlotKey, response: &JsonValue) -> ScoreResult {
    if payload.slots.is_empty()
        || key.by_slot.len() != payload.slots.len()
        || key.by_slot.iter().any(Option::is_none)
    {
        return ScoreResult::ungradable("item has an incomplete answer key");
    }
    let Some(given) = probe_index_array(response, payload.slots.len()) else {
        return ScoreResult::ungradable("response must fill every slot");
    };
    for (i, (slot, chosen)) in payload.slots.iter().zip(given.iter()).enumerate() {
        if *chosen >= slot.options.len() {
            return ScoreResult::ungradable(format!("slot {i} option index {chosen} out of range"));
        }
    }
    let parts = payload
        .slots
        .iter()
        .zip(key.by_slot.iter())
        .zip(given.iter())
        .map(|((slot, correct), chosen)| PartScore {
            label: slot.label.clone(),
            matched: *correct == Some(*chosen),
        })
        .collect();
    ScoreResult::from_parts(parts)
}

fn ranking(payload: &RankingPayload, key: &RankingKey, response: &JsonValue) -> ScoreResult {
    use crate::services::editors::ranking::is_permutation;
    let len = payload.items.len();
    if !is_permutation(&key.order, len) {
        return ScoreResult::ungradable("item has an incomplete answer key");
    }
    let Some(given) = probe_index_array(response, len) else {
        return ScoreResult::ungradable("response must order every item");
    };
    if !is_permutation(&given, len) {
        return ScoreResult::ungradable("response is not a permutation of the items");
    }
    // All-or-nothing by policy; partial ordering credit is deliberately not
    // offered for ranking items.
    if given == key.order {
        ScoreResult::correct()
    } else {
        ScoreResult::incorrect()
    }
}

fn dosage(_payload: &DosagePayload, key: &DosageKey, response: &JsonValue) -> ScoreResult {
    let Some(correct) = key.correct_value else {
        return ScoreResult::ungradable("item has no answer key");
    };
    let Some(given) = probe_decimal(response) else {
        return ScoreResult::ungradable("response is not a numeric value");
    };
    // Inclusive band: the boundary value counts as correct.
    if (given - correct).abs() <= key.tolerance {
        ScoreResult::correct()
    } else {
        ScoreResult::incorrect()
    }
}

fn case_study(payload: &CaseStudyPayload, key: &CaseStudyKey, response: &JsonValue) -> ScoreResult {
    if key.correct.iter().any(Option::is_none) {
        return ScoreResult::ungradable("item has an incomplete answer key");
    }
    let Some(given) = probe_index_array(response, CASE_STUDY_STEPS) else {
        return ScoreResult::ungradable("response must answer all six steps");
    };
    for (i, (step, chosen)) in payload.steps.iter().zip(given.iter()).enumerate() {
        if *chosen >= step.options.len() {
            return ScoreResult::ungradable(format!(
                "step {} option index {chosen} out of range",
                i + 1
            ));
        }
    }
    // Each step is a classic single-best-answer sub-item; credit is the
    // number of correct steps over six.
    let parts = key
        .correct
        .iter()
        .zip(given.iter())
        .enumerate()
        .map(|(i, (correct, chosen))| PartScore {
            label: CASE_STUDY_STEP_LABELS[i].to_string(),
            matched: *correct == Some(*chosen),
        })
        .collect();
    ScoreResult::from_parts(parts)
}
