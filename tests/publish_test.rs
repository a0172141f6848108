use assessment_core::models::body::*;
use assessment_core::services::case_study::CaseStudyOrchestrator;
use assessment_core::services::editors::choice::ChoiceEditor;
use assessment_core::services::editors::dosage::DosageEditor;
use assessment_core::services::editors::highlight::HighlightEditor;
use assessment_core::{
    AssessmentItem, Classification, Error, FormatTag, ItemEnvelope, PublishValidator,
};
use rust_decimal::Decimal;
use serde_json::json;

fn draft(tag: FormatTag) -> AssessmentItem {
    AssessmentItem::new(Classification::Ngn, tag)
}

fn fields(item: &AssessmentItem) -> Vec<String> {
    PublishValidator::validate(item)
        .into_iter()
        .map(|e| e.field)
        .collect()
}

#[test]
fn empty_multiple_choice_draft_reports_every_gap() {
    let item = draft(FormatTag::MultipleChoice);
    let reported = fields(&item);
    assert!(reported.contains(&"stem".to_string()));
    assert!(reported.contains(&"options".to_string()));
    assert!(reported.contains(&"answer_key.correct".to_string()));
}

#[test]
fn completing_a_multiple_choice_draft_clears_the_errors() {
    let mut item = draft(FormatTag::MultipleChoice).set_stem("Pick one").unwrap();
    for text in ["a", "b", "c"] {
        item = ChoiceEditor::add_option(item, text).unwrap();
    }
    let item = ChoiceEditor::select_answer(item, 1).unwrap();
    assert!(PublishValidator::validate(&item).is_empty());

    // Validation is idempotent: running it twice reports the same thing.
    assert_eq!(PublishValidator::validate(&item), PublishValidator::validate(&item));
}

#[test]
fn blank_options_are_flagged_individually() {
    let mut item = draft(FormatTag::MultipleChoice).set_stem("Pick one").unwrap();
    for text in ["a", "", "c"] {
        item = ChoiceEditor::add_option(item, text).unwrap();
    }
    let item = ChoiceEditor::select_answer(item, 0).unwrap();
    let reported = fields(&item);
    assert!(reported.contains(&"options[1]".to_string()));
}

#[test]
fn select_n_quota_must_be_met_exactly() {
    let mut item = draft(FormatTag::SelectN).set_stem("Select three").unwrap();
    for text in ["a", "b", "c", "d"] {
        item = ChoiceEditor::add_option(item, text).unwrap();
    }
    let item = ChoiceEditor::toggle_selection(item, 0).unwrap();
    let item = ChoiceEditor::toggle_selection(item, 1).unwrap();
    // Two of three required selections made.
    assert!(fields(&item).contains(&"answer_key.correct".to_string()));

    let item = ChoiceEditor::toggle_selection(item, 3).unwrap();
    assert!(PublishValidator::validate(&item).is_empty());
}

#[test]
fn dosage_requires_a_correct_value_and_unit() {
    let item = draft(FormatTag::DosageCalculation).set_stem("Calculate the rate").unwrap();
    let reported = fields(&item);
    assert!(reported.contains(&"unit".to_string()));
    assert!(reported.contains(&"answer_key.correct_value".to_string()));

    let item = DosageEditor::set_unit(item, "mL/hr").unwrap();
    let item = DosageEditor::set_correct_value(item, Decimal::new(55, 1)).unwrap();
    assert!(PublishValidator::validate(&item).is_empty());
}

#[test]
fn dosage_tolerance_must_not_be_negative() {
    // The editor refuses a negative tolerance, but a stored record can still
    // carry one; left unchecked it would mark ready and then fail every
    // response, the exact correct value included.
    let envelope: ItemEnvelope = serde_json::from_value(json!({
        "id": null,
        "classification": "ngn",
        "format_tag": "dosage_calculation",
        "stem": "Calculate the rate",
        "payload": {"unit": "mL/hr", "precision": 1},
        "answer_key": {"correct_value": "5.5", "tolerance": "-0.2"},
        "rationale": null
    }))
    .unwrap();
    let item = envelope.into_item().unwrap();

    assert!(fields(&item).contains(&"answer_key.tolerance".to_string()));
    assert!(item.mark_ready().is_err());
}

#[test]
fn highlight_needs_at_least_one_correct_token() {
    let item = draft(FormatTag::HighlightText).set_stem("Highlight the findings").unwrap();
    let item = HighlightEditor::set_source(item, "all {distractor} no correct").unwrap();
    assert!(fields(&item).contains(&"answer_key.correct".to_string()));

    let item = HighlightEditor::set_source(item, "one [correct] and {distractor}").unwrap();
    assert!(PublishValidator::validate(&item).is_empty());
}

#[test]
fn case_study_validator_names_the_missing_step() {
    let mut orchestrator = CaseStudyOrchestrator::new();
    let mut item = draft(FormatTag::CaseStudy).set_stem("A 62-year-old presents with...").unwrap();

    // Author steps 1-5 and leave step 6 untouched.
    for step in 1..=5 {
        orchestrator.go_to_step(step).unwrap();
        item = orchestrator.set_question(item, format!("Step {step} question")).unwrap();
        item = orchestrator.add_option(item, "a").unwrap();
        item = orchestrator.add_option(item, "b").unwrap();
        item = orchestrator.select_answer(item, 0).unwrap();
    }
    assert_eq!(CaseStudyOrchestrator::steps_completed(&item).unwrap(), 5);

    let reported = fields(&item);
    assert!(reported.contains(&"steps[6].question".to_string()));
    assert!(!reported.contains(&"steps[5].question".to_string()));

    // Completing step 6 makes the item publishable.
    orchestrator.go_to_step(6).unwrap();
    item = orchestrator.set_question(item, "Step 6 question").unwrap();
    item = orchestrator.add_option(item, "a").unwrap();
    item = orchestrator.add_option(item, "b").unwrap();
    item = orchestrator.select_answer(item, 1).unwrap();
    assert!(PublishValidator::validate(&item).is_empty());
    assert!(item.mark_ready().is_ok());
}

#[test]
fn mark_ready_carries_the_full_error_list() {
    let item = draft(FormatTag::Bowtie);
    match item.mark_ready() {
        Err(Error::NotReady(errors)) => assert!(!errors.is_empty()),
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[test]
fn matrix_requires_an_answer_for_every_row() {
    use assessment_core::services::editors::matrix::MatrixEditor;

    let item = draft(FormatTag::MatrixMultipleResponse).set_stem("Mark each row").unwrap();
    let item = MatrixEditor::set_columns(item, vec!["Yes".into(), "No".into()]).unwrap();
    let item = MatrixEditor::add_row(item, "row one").unwrap();
    let item = MatrixEditor::add_row(item, "row two").unwrap();
    let item = MatrixEditor::set_row_answer(item, 0, 1).unwrap();

    let reported = fields(&item);
    assert!(reported.contains(&"answer_key.by_row[1]".to_string()));

    let item = MatrixEditor::set_row_answer(item, 1, 0).unwrap();
    assert!(PublishValidator::validate(&item).is_empty());
}

#[test]
fn ranking_key_must_be_a_full_permutation() {
    use assessment_core::services::editors::ranking::RankingEditor;

    let mut item = draft(FormatTag::Ranking).set_stem("Order the steps").unwrap();
    for text in ["first", "second", "third"] {
        item = RankingEditor::add_item(item, text).unwrap();
    }
    assert!(fields(&item).contains(&"answer_key.order".to_string()));

    let item = RankingEditor::set_correct_order(item, vec![1, 2, 0]).unwrap();
    assert!(PublishValidator::validate(&item).is_empty());
}
