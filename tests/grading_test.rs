use assessment_core::models::body::*;
use assessment_core::GradingService;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::BTreeSet;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("assessment_core=debug").try_init();
}

fn assert_fraction(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "credit fraction {actual} != {expected}"
    );
}

fn mcq(options: &[&str], correct: usize) -> ItemBody {
    ItemBody::MultipleChoice {
        payload: ChoicePayload { options: options.iter().map(|s| s.to_string()).collect() },
        key: SingleIndexKey { correct: Some(correct) },
    }
}

#[test]
fn multiple_choice_exact_index_match() {
    let body = mcq(&["a", "b", "c", "d"], 2);

    let result = GradingService::score(&body, &json!(2));
    assert!(result.is_correct);
    assert_fraction(result.credit_fraction, 1.0);

    let result = GradingService::score(&body, &json!(0));
    assert!(!result.is_correct);
    assert!(!result.ungradable);

    // The delivery layer may wrap the index.
    let result = GradingService::score(&body, &json!({ "selected": 2 }));
    assert!(result.is_correct);
}

#[test]
fn malformed_responses_are_ungradable_not_panics() {
    init_tracing();
    let body = mcq(&["a", "b"], 0);
    for response in [json!("first"), json!(null), json!(9), json!([0]), json!(-1)] {
        let result = GradingService::score(&body, &response);
        assert!(result.ungradable, "expected ungradable for {response}");
        assert_fraction(result.credit_fraction, 0.0);
        assert!(result.reason.is_some());
    }
}

#[test]
fn unkeyed_draft_never_scores() {
    let body = ItemBody::MultipleChoice {
        payload: ChoicePayload { options: vec!["a".into(), "b".into()] },
        key: SingleIndexKey { correct: None },
    };
    assert!(GradingService::score(&body, &json!(0)).ungradable);
}

#[test]
fn sata_requires_the_exact_selection_set() {
    let body = ItemBody::Sata {
        payload: ChoicePayload {
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        },
        key: IndexSetKey { correct: BTreeSet::from([1, 3]) },
    };
    assert!(GradingService::score(&body, &json!([1, 3])).is_correct);
    assert!(GradingService::score(&body, &json!([3, 1])).is_correct);
    assert!(!GradingService::score(&body, &json!([1])).is_correct);
    assert!(!GradingService::score(&body, &json!([1, 2, 3])).is_correct);
    assert!(GradingService::score(&body, &json!([1, 9])).ungradable);
}

#[test]
fn select_n_response_cardinality_is_part_of_the_shape() {
    let body = ItemBody::SelectN {
        payload: SelectNPayload {
            options: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            required: 3,
        },
        key: IndexSetKey { correct: BTreeSet::from([0, 2, 4]) },
    };

    assert!(GradingService::score(&body, &json!([0, 2, 4])).is_correct);

    // Three selections of the wrong indices are a wrong answer.
    let result = GradingService::score(&body, &json!([0, 1, 2]));
    assert!(!result.is_correct);
    assert!(!result.ungradable);

    // Any other cardinality breaks the fixed-size answer shape and cannot
    // be graded at all.
    for response in [json!([0, 2]), json!([0, 1, 2, 3]), json!([])] {
        let result = GradingService::score(&body, &response);
        assert!(result.ungradable, "expected ungradable for {response}");
        assert_fraction(result.credit_fraction, 0.0);
    }

    assert!(GradingService::score(&body, &json!([0, 2, 9])).ungradable);
}

#[test]
fn dosage_tolerance_band_is_inclusive() {
    let body = ItemBody::DosageCalculation {
        payload: DosagePayload { unit: "mL/hr".into(), precision: 1 },
        key: DosageKey {
            correct_value: Some(Decimal::new(55, 1)), // 5.5
            tolerance: Decimal::new(2, 1),            // 0.2
        },
    };

    assert!(GradingService::score(&body, &json!(5.6)).is_correct);
    // Boundary value: |5.7 - 5.5| == 0.2 and the band is inclusive.
    assert!(GradingService::score(&body, &json!(5.7)).is_correct);
    assert!(!GradingService::score(&body, &json!(5.8)).is_correct);
    assert!(GradingService::score(&body, &json!(5.3)).is_correct);

    // Numeric strings are accepted; anything else is ungradable.
    assert!(GradingService::score(&body, &json!("5.7")).is_correct);
    assert!(GradingService::score(&body, &json!("5,7")).ungradable);
    assert!(GradingService::score(&body, &json!(true)).ungradable);
}

#[test]
fn highlight_text_scores_the_exact_set_only() {
    let tokens = assessment_core::utils::markup::parse_markup(
        "The patient has [hypertension] and {hypotension}.",
    );
    let correct = assessment_core::utils::markup::derive_answer_key(&tokens);
    assert_eq!(correct, BTreeSet::from([0]));
    let body = ItemBody::HighlightText {
        payload: HighlightPayload {
            source: "The patient has [hypertension] and {hypotension}.".into(),
            tokens,
        },
        key: IndexSetKey { correct },
    };

    let result = GradingService::score(&body, &json!([0]));
    assert!(result.is_correct);
    assert_fraction(result.credit_fraction, 1.0);

    // Selecting the distractor alongside the correct token is incorrect
    // under the exact-set policy, not partial credit.
    let result = GradingService::score(&body, &json!([0, 1]));
    assert!(!result.is_correct);
    assert!(!result.ungradable);
    assert_fraction(result.credit_fraction, 0.0);

    // Index 2 does not exist in the clickable token space.
    assert!(GradingService::score(&body, &json!([2])).ungradable);
}

fn matrix_4x3() -> ItemBody {
    ItemBody::MatrixMultipleResponse {
        payload: MatrixPayload {
            columns: vec!["Indicated".into(), "Contraindicated".into(), "Unrelated".into()],
            rows: vec!["r1".into(), "r2".into(), "r3".into(), "r4".into()],
        },
        key: MatrixKey { by_row: vec![Some(0), Some(1), Some(2), Some(0)] },
    }
}

#[test]
fn matrix_scores_the_fraction_of_matching_rows() {
    let body = matrix_4x3();

    let result = GradingService::score(&body, &json!([0, 1, 2, 0]));
    assert!(result.is_correct);
    assert_fraction(result.credit_fraction, 1.0);
    assert_eq!(result.parts.len(), 4);

    let result = GradingService::score(&body, &json!([0, 1, 0, 1]));
    assert!(!result.is_correct);
    assert_fraction(result.credit_fraction, 0.5);
    assert_eq!(result.parts.iter().filter(|p| p.matched).count(), 2);
}

#[test]
fn matrix_with_a_missing_row_is_ungradable() {
    let body = matrix_4x3();
    // Only 3 of 4 rows answered: the whole response is ungradable, the
    // missing row is neither a silent zero nor dropped from the denominator.
    let result = GradingService::score(&body, &json!([0, 1, 2]));
    assert!(result.ungradable);
    assert_fraction(result.credit_fraction, 0.0);
    assert!(result.parts.is_empty());

    assert!(GradingService::score(&body, &json!([0, 1, 2, null])).ungradable);
    assert!(GradingService::score(&body, &json!([0, 1, 2, 7])).ungradable);
}

fn bowtie_body() -> ItemBody {
    ItemBody::Bowtie {
        payload: BowtiePayload {
            findings: vec!["f0".into(), "f1".into(), "f2".into(), "f3".into()],
            conditions: vec!["c0".into(), "c1".into(), "c2".into()],
            actions: vec!["a0".into(), "a1".into(), "a2".into(), "a3".into()],
            limits: PoolLimits::default(),
        },
        key: BowtieKey {
            findings: BTreeSet::from([0, 2]),
            condition: BTreeSet::from([1]),
            actions: BTreeSet::from([1, 3]),
        },
    }
}

#[test]
fn bowtie_credit_spans_all_three_pools() {
    let body = bowtie_body();

    let full = json!({ "findings": [0, 2], "condition": [1], "actions": [1, 3] });
    let result = GradingService::score(&body, &full);
    assert!(result.is_correct);
    assert_eq!(result.parts.len(), 5);

    // 3 of the 5 key slots matched: both findings and one action.
    let partial = json!({ "findings": [0, 2], "condition": [0], "actions": [0, 3] });
    let result = GradingService::score(&body, &partial);
    assert!(!result.is_correct);
    assert_fraction(result.credit_fraction, 3.0 / 5.0);
}

#[test]
fn bowtie_malformed_pools_are_ungradable() {
    let body = bowtie_body();
    let over_limit = json!({ "findings": [0, 1, 2], "condition": [1], "actions": [1, 3] });
    assert!(GradingService::score(&body, &over_limit).ungradable);

    let missing_pool = json!({ "findings": [0, 2], "actions": [1, 3] });
    assert!(GradingService::score(&body, &missing_pool).ungradable);

    let out_of_range = json!({ "findings": [0, 9], "condition": [1], "actions": [1, 3] });
    assert!(GradingService::score(&body, &out_of_range).ungradable);

    assert!(GradingService::score(&body, &json!([0, 2])).ungradable);
}

#[test]
fn slot_formats_score_per_slot() {
    let body = ItemBody::ClozeDropdown {
        payload: SlotPayload {
            slots: vec![
                Slot { label: "blank 1".into(), options: vec!["x".into(), "y".into()] },
                Slot { label: "blank 2".into(), options: vec!["p".into(), "q".into(), "r".into()] },
            ],
        },
        key: SlotKey { by_slot: vec![Some(1), Some(0)] },
    };

    assert!(GradingService::score(&body, &json!([1, 0])).is_correct);

    let result = GradingService::score(&body, &json!([1, 2]));
    assert_fraction(result.credit_fraction, 0.5);
    assert_eq!(result.parts[0].matched, true);
    assert_eq!(result.parts[1].matched, false);

    assert!(GradingService::score(&body, &json!([1])).ungradable);
    assert!(GradingService::score(&body, &json!([1, 9])).ungradable);
}

#[test]
fn ranking_demands_a_full_permutation() {
    let body = ItemBody::Ranking {
        payload: RankingPayload {
            items: vec!["first".into(), "second".into(), "third".into(), "fourth".into()],
        },
        key: RankingKey { order: vec![2, 0, 3, 1] },
    };

    assert!(GradingService::score(&body, &json!([2, 0, 3, 1])).is_correct);

    let result = GradingService::score(&body, &json!([0, 2, 3, 1]));
    assert!(!result.is_correct);
    assert!(!result.ungradable);
    assert_fraction(result.credit_fraction, 0.0);

    // Duplicates and short lists are shape errors, not wrong answers.
    assert!(GradingService::score(&body, &json!([2, 2, 3, 1])).ungradable);
    assert!(GradingService::score(&body, &json!([2, 0, 3])).ungradable);
}

#[test]
fn trend_item_grades_like_single_best_answer() {
    let body = ItemBody::TrendItem {
        payload: TrendPayload {
            panels: vec![TrendPanel { label: "vitals".into(), content: "HR trending up".into() }],
            options: vec!["stable".into(), "deteriorating".into()],
        },
        key: SingleIndexKey { correct: Some(1) },
    };
    assert!(GradingService::score(&body, &json!(1)).is_correct);
    assert!(!GradingService::score(&body, &json!(0)).is_correct);
}

fn case_study_body() -> ItemBody {
    let steps = std::array::from_fn(|i| CaseStepPayload {
        question: format!("Step {} question", i + 1),
        options: vec!["a".into(), "b".into(), "c".into()],
    });
    ItemBody::CaseStudy {
        payload: CaseStudyPayload { steps },
        key: CaseStudyKey { correct: [Some(0), Some(1), Some(2), Some(0), Some(1), Some(2)] },
    }
}

#[test]
fn case_study_aggregates_six_single_best_answer_steps() {
    let body = case_study_body();

    let result = GradingService::score(&body, &json!([0, 1, 2, 0, 1, 2]));
    assert!(result.is_correct);
    assert_fraction(result.credit_fraction, 1.0);
    assert_eq!(result.parts.len(), 6);
    assert_eq!(result.parts[0].label, "recognize_cues");

    let result = GradingService::score(&body, &json!([0, 1, 0, 0, 0, 2]));
    assert!(!result.is_correct);
    assert_fraction(result.credit_fraction, 4.0 / 6.0);
}

#[test]
fn case_study_requires_all_six_steps_answered() {
    let body = case_study_body();
    assert!(GradingService::score(&body, &json!([0, 1, 2, 0, 1])).ungradable);
    assert!(GradingService::score(&body, &json!([0, 1, 2, 0, 1, 9])).ungradable);
}

#[test]
fn grading_is_deterministic_across_repeat_invocations() {
    let body = bowtie_body();
    let response = json!({ "findings": [0, 2], "condition": [0], "actions": [0, 3] });
    let first = GradingService::score(&body, &response);
    for _ in 0..10 {
        assert_eq!(GradingService::score(&body, &response), first);
    }
}
