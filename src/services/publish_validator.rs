use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

use crate::models::body::{ItemBody, CASE_STUDY_STEP_LABELS};
use crate::models::item::AssessmentItem;
use crate::utils::markup;

/// One missing or invalid field blocking the ready-for-delivery transition.
/// `field` is a path the authoring UI anchors its error display to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct MissingFieldError {
    pub field: String,
    pub message: String,
}

impl MissingFieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> MissingFieldError {
        MissingFieldError { field: field.into(), message: message.into() }
    }
}

/// Flat shared fields, checked with the `validator` derive; per-format
/// structure is audited by hand below.
#[derive(Validate)]
struct SharedFields<'a> {
    #[validate(length(min = 1, message = "stem must not be empty"))]
    stem: &'a str,
}

/// Completeness audit for the ready-for-delivery transition. Idempotent and
/// side-effect-free; an empty result is the only green light `mark_ready`
/// accepts. Editing is never blocked by these errors.
pub struct PublishValidator;

impl PublishValidator {
    pub fn validate(item: &AssessmentItem) -> Vec<MissingFieldError> {
        let mut errors = Vec::new();

        let shared = SharedFields { stem: item.stem.trim() };
        if let Err(field_errors) = shared.validate() {
            for (field, errs) in field_errors.field_errors() {
                for err in errs {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"));
                    errors.push(MissingFieldError::new(field.to_string(), message));
                }
            }
        }

        match &item.body {
            ItemBody::MultipleChoice { payload, key } => {
                check_options(&mut errors, "options", &payload.options, 2);
                check_single_index(&mut errors, "answer_key.correct", key.correct, payload.options.len());
            }
            ItemBody::Sata { payload, key } => {
                check_options(&mut errors, "options", &payload.options, 2);
                check_index_set(&mut errors, "answer_key.correct", &key.correct, payload.options.len(), 1);
            }
            ItemBody::SelectN { payload, key } => {
                check_options(&mut errors, "options", &payload.options, 2);
                if payload.required == 0 {
                    errors.push(MissingFieldError::new("required", "selection quota must be at least 1"));
                } else if payload.options.len() < payload.required {
                    errors.push(MissingFieldError::new(
                        "options",
                        format!("need at least {} options for a select-{} item", payload.required, payload.required),
                    ));
                }
                if key.correct.len() != payload.required {
                    errors.push(MissingFieldError::new(
                        "answer_key.correct",
                        format!("exactly {} selections required, found {}", payload.required, key.correct.len()),
                    ));
                }
                for &idx in &key.correct {
                    if idx >= payload.options.len() {
                        errors.push(MissingFieldError::new(
                            "answer_key.correct",
                            format!("selection {idx} out of range"),
                        ));
                    }
                }
            }
            ItemBody::MatrixMultipleResponse { payload, key } => {
                if payload.columns.len() < 2 {
                    errors.push(MissingFieldError::new("columns", "at least 2 column labels required"));
                }
                if payload.rows.is_empty() {
                    errors.push(MissingFieldError::new("rows", "at least 1 row required"));
                }
                for (i, label) in payload.columns.iter().enumerate() {
                    if label.trim().is_empty() {
                        errors.push(MissingFieldError::new(format!("columns[{i}]"), "column label is empty"));
                    }
                }
                for (i, label) in payload.rows.iter().enumerate() {
                    if label.trim().is_empty() {
                        errors.push(MissingFieldError::new(format!("rows[{i}]"), "row label is empty"));
                    }
                }
                for i in 0..payload.rows.len() {
                    match key.by_row.get(i) {
                        Some(Some(col)) if *col < payload.columns.len() => {}
                        Some(Some(_)) => errors.push(MissingFieldError::new(
                            format!("answer_key.by_row[{i}]"),
                            "correct column out of range",
                        )),
                        _ => errors.push(MissingFieldError::new(
                            format!("answer_key.by_row[{i}]"),
                            "row has no correct column",
                        )),
                    }
                }
            }
            ItemBody::Bowtie { payload, key } => {
                let pools = [
                    ("findings", &payload.findings, &key.findings, payload.limits.findings),
                    ("condition", &payload.conditions, &key.condition, payload.limits.condition),
                    ("actions", &payload.actions, &key.actions, payload.limits.actions),
                ];
                for (name, options, selected, limit) in pools {
                    check_options(&mut errors, name, options, limit.max(1));
                    if selected.len() != limit {
                        errors.push(MissingFieldError::new(
                            format!("answer_key.{name}"),
                            format!("exactly {} selection(s) required, found {}", limit, selected.len()),
                        ));
                    }
                    for &idx in selected {
                        if idx >= options.len() {
                            errors.push(MissingFieldError::new(
                                format!("answer_key.{name}"),
                                format!("selection {idx} out of range"),
                            ));
                        }
                    }
                }
            }
            ItemBody::ClozeDropdown { payload, key }
            | ItemBody::ExtendedDragDrop { payload, key }
            | ItemBody::ExtendedMultipleResponse { payload, key } => {
                if payload.slots.is_empty() {
                    errors.push(MissingFieldError::new("slots", "at least 1 slot required"));
                }
                for (i, slot) in payload.slots.iter().enumerate() {
                    if slot.options.len() < 2 {
                        errors.push(MissingFieldError::new(
                            format!("slots[{i}].options"),
                            "at least 2 options required",
                        ));
                    }
                    match key.by_slot.get(i) {
                        Some(Some(opt)) if *opt < slot.options.len() => {}
                        Some(Some(_)) => errors.push(MissingFieldError::new(
                            format!("answer_key.by_slot[{i}]"),
                            "correct option out of range",
                        )),
                        _ => errors.push(MissingFieldError::new(
                            format!("answer_key.by_slot[{i}]"),
                            "slot has no correct option",
                        )),
                    }
                }
            }
            ItemBody::HighlightText { payload, key } => {
                if payload.source.trim().is_empty() {
                    errors.push(MissingFieldError::new("source", "source text must not be empty"));
                }
                if key.correct.is_empty() {
                    errors.push(MissingFieldError::new(
                        "answer_key.correct",
                        "markup contains no correct token",
                    ));
                }
                let clickable = markup::clickable_count(&payload.tokens);
                for &idx in &key.correct {
                    if idx >= clickable {
                        errors.push(MissingFieldError::new(
                            "answer_key.correct",
                            format!("token index {idx} out of range"),
                        ));
                    }
                }
            }
            ItemBody::Ranking { payload, key } => {
                check_options(&mut errors, "items", &payload.items, 2);
                if !crate::services::editors::ranking::is_permutation(&key.order, payload.items.len()) {
                    errors.push(MissingFieldError::new(
                        "answer_key.order",
                        "correct order must be a full permutation of the items",
                    ));
                }
            }
            ItemBody::TrendItem { payload, key } => {
                if !payload.panels.iter().any(|p| !p.content.trim().is_empty()) {
                    errors.push(MissingFieldError::new(
                        "panels",
                        "at least 1 panel with content required",
                    ));
                }
                check_options(&mut errors, "options", &payload.options, 2);
                check_single_index(&mut errors, "answer_key.correct", key.correct, payload.options.len());
            }
            ItemBody::DosageCalculation { payload, key } => {
                if payload.unit.trim().is_empty() {
                    errors.push(MissingFieldError::new("unit", "unit label must not be empty"));
                }
                if key.correct_value.is_none() {
                    errors.push(MissingFieldError::new(
                        "answer_key.correct_value",
                        "correct value must be set",
                    ));
                }
                // The editor refuses negative tolerances, but a stored record
                // can arrive with one; it would make every response incorrect.
                if key.tolerance < Decimal::ZERO {
                    errors.push(MissingFieldError::new(
                        "answer_key.tolerance",
                        "tolerance must not be negative",
                    ));
                }
            }
            ItemBody::CaseStudy { payload, key } => {
                for (i, step) in payload.steps.iter().enumerate() {
                    let label = CASE_STUDY_STEP_LABELS[i];
                    let prefix = format!("steps[{}]", i + 1);
                    if step.question.trim().is_empty() {
                        errors.push(MissingFieldError::new(
                            format!("{prefix}.question"),
                            format!("step {} ({label}) has no question text", i + 1),
                        ));
                    }
                    if step.options.len() < 2 {
                        errors.push(MissingFieldError::new(
                            format!("{prefix}.options"),
                            "at least 2 options required",
                        ));
                    }
                    match key.correct[i] {
                        Some(idx) if idx < step.options.len() => {}
                        Some(_) => errors.push(MissingFieldError::new(
                            format!("answer_key.correct[{}]", i + 1),
                            "correct option out of range",
                        )),
                        None => errors.push(MissingFieldError::new(
                            format!("answer_key.correct[{}]", i + 1),
                            format!("step {} has no correct answer", i + 1),
                        )),
                    }
                }
            }
        }

        errors
    }
}

fn check_options(errors: &mut Vec<MissingFieldError>, field: &str, options: &[String], min: usize) {
    let non_empty = options.iter().filter(|o| !o.trim().is_empty()).count();
    if non_empty < min {
        errors.push(MissingFieldError::new(
            field,
            format!("at least {min} non-empty entries required, found {non_empty}"),
        ));
    }
    for (i, option) in options.iter().enumerate() {
        if option.trim().is_empty() {
            errors.push(MissingFieldError::new(format!("{field}[{i}]"), "entry is empty"));
        }
    }
}

fn check_single_index(errors: &mut Vec<MissingFieldError>, field: &str, correct: Option<usize>, len: usize) {
    match correct {
        None => errors.push(MissingFieldError::new(field, "no correct answer selected")),
        Some(idx) if idx >= len => {
            errors.push(MissingFieldError::new(field, format!("correct index {idx} out of range")))
        }
        Some(_) => {}
    }
}

fn check_index_set(
    errors: &mut Vec<MissingFieldError>,
    field: &str,
    correct: &std::collections::BTreeSet<usize>,
    len: usize,
    min: usize,
) {
    if correct.len() < min {
        errors.push(MissingFieldError::new(
            field,
            format!("at least {min} selection(s) required, found {}", correct.len()),
        ));
    }
    for &idx in correct {
        if idx >= len {
            errors.push(MissingFieldError::new(field, format!("selection {idx} out of range")));
        }
    }
}
