use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::format::FormatTag;

// ---------------------------------------------------------------------------
// Per-format payload and answer-key shapes.
// An answer key always lives next to the payload it indexes into; the
// ItemBody union below pairs them per tag so a payload can never carry a
// foreign key shape.
// ---------------------------------------------------------------------------

/// Flat option list shared by multiple_choice and sata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoicePayload {
    pub options: Vec<String>,
}

/// select_n: option list plus the exact number of selections the key must
/// contain once published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectNPayload {
    pub options: Vec<String>,
    pub required: usize,
}

impl Default for SelectNPayload {
    fn default() -> Self {
        // Platform default quota; authors can change it per item.
        Self { options: Vec::new(), required: 3 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleIndexKey {
    pub correct: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSetKey {
    pub correct: BTreeSet<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixPayload {
    pub columns: Vec<String>,
    pub rows: Vec<String>,
}

/// One column choice per row, same order as `MatrixPayload::rows`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixKey {
    pub by_row: Vec<Option<usize>>,
}

/// How many selections each bow-tie pool admits. The platform default is
/// 2 findings / 1 condition / 2 actions but the limit is item data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolLimits {
    pub findings: usize,
    pub condition: usize,
    pub actions: usize,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self { findings: 2, condition: 1, actions: 2 }
    }
}

impl PoolLimits {
    pub fn total(&self) -> usize {
        self.findings + self.condition + self.actions
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BowtiePayload {
    pub findings: Vec<String>,
    pub conditions: Vec<String>,
    pub actions: Vec<String>,
    pub limits: PoolLimits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BowtieKey {
    pub findings: BTreeSet<usize>,
    pub condition: BTreeSet<usize>,
    pub actions: BTreeSet<usize>,
}

/// One blank/drop-zone with its own option set. Shared by cloze_dropdown,
/// extended_drag_drop and extended_multiple_response, which differ only in
/// presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub label: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotPayload {
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotKey {
    pub by_slot: Vec<Option<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Plain,
    Correct,
    Distractor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn is_clickable(&self) -> bool {
        !matches!(self.kind, TokenKind::Plain)
    }
}

/// `tokens` and the highlight answer key are both derived from `source` by
/// the markup parser; editors never set them independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightPayload {
    pub source: String,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingPayload {
    pub items: Vec<String>,
}

/// The correct order, as a permutation of item indices. Kept empty until
/// the author has fixed an order, never partially filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingKey {
    pub order: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendPanel {
    pub label: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendPayload {
    pub panels: Vec<TrendPanel>,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosagePayload {
    pub unit: String,
    /// Decimal places shown to the learner while they type.
    pub precision: u32,
}

impl Default for DosagePayload {
    fn default() -> Self {
        Self { unit: String::new(), precision: 1 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DosageKey {
    pub correct_value: Option<Decimal>,
    /// Inclusive band: |response - correct_value| <= tolerance is correct.
    pub tolerance: Decimal,
}

pub const CASE_STUDY_STEPS: usize = 6;

/// Labels of the six clinical-judgment steps, in delivery order.
pub const CASE_STUDY_STEP_LABELS: [&str; CASE_STUDY_STEPS] = [
    "recognize_cues",
    "analyze_cues",
    "prioritize_hypotheses",
    "generate_solutions",
    "take_action",
    "evaluate_outcomes",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseStepPayload {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseStudyPayload {
    pub steps: [CaseStepPayload; CASE_STUDY_STEPS],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseStudyKey {
    pub correct: [Option<usize>; CASE_STUDY_STEPS],
}

// ---------------------------------------------------------------------------
// The tagged union itself.
// ---------------------------------------------------------------------------

/// Payload + answer key for one format, as a single discriminated value.
/// Every consumer (editors, validator, grading engine, envelope codec)
/// matches exhaustively on this type, so a new format fails to compile
/// until every consumer handles it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum ItemBody {
    MultipleChoice { payload: ChoicePayload, key: SingleIndexKey },
    Sata { payload: ChoicePayload, key: IndexSetKey },
    SelectN { payload: SelectNPayload, key: IndexSetKey },
    MatrixMultipleResponse { payload: MatrixPayload, key: MatrixKey },
    Bowtie { payload: BowtiePayload, key: BowtieKey },
    ClozeDropdown { payload: SlotPayload, key: SlotKey },
    ExtendedDragDrop { payload: SlotPayload, key: SlotKey },
    ExtendedMultipleResponse { payload: SlotPayload, key: SlotKey },
    HighlightText { payload: HighlightPayload, key: IndexSetKey },
    Ranking { payload: RankingPayload, key: RankingKey },
    TrendItem { payload: TrendPayload, key: SingleIndexKey },
    DosageCalculation { payload: DosagePayload, key: DosageKey },
    CaseStudy { payload: CaseStudyPayload, key: CaseStudyKey },
}

impl ItemBody {
    /// The format's structurally complete empty default, ready for editing.
    pub fn empty(tag: FormatTag) -> ItemBody {
        match tag {
            FormatTag::MultipleChoice => ItemBody::MultipleChoice {
                payload: ChoicePayload::default(),
                key: SingleIndexKey::default(),
            },
            FormatTag::Sata => ItemBody::Sata {
                payload: ChoicePayload::default(),
                key: IndexSetKey::default(),
            },
            FormatTag::SelectN => ItemBody::SelectN {
                payload: SelectNPayload::default(),
                key: IndexSetKey::default(),
            },
            FormatTag::MatrixMultipleResponse => ItemBody::MatrixMultipleResponse {
                payload: MatrixPayload::default(),
                key: MatrixKey::default(),
            },
            FormatTag::Bowtie => ItemBody::Bowtie {
                payload: BowtiePayload::default(),
                key: BowtieKey::default(),
            },
            FormatTag::ClozeDropdown => ItemBody::ClozeDropdown {
                payload: SlotPayload::default(),
                key: SlotKey::default(),
            },
            FormatTag::ExtendedDragDrop => ItemBody::ExtendedDragDrop {
                payload: SlotPayload::default(),
                key: SlotKey::default(),
            },
            FormatTag::ExtendedMultipleResponse => ItemBody::ExtendedMultipleResponse {
                payload: SlotPayload::default(),
                key: SlotKey::default(),
            },
            FormatTag::HighlightText => ItemBody::HighlightText {
                payload: HighlightPayload::default(),
                key: IndexSetKey::default(),
            },
            FormatTag::Ranking => ItemBody::Ranking {
                payload: RankingPayload::default(),
                key: RankingKey::default(),
            },
            FormatTag::TrendItem => ItemBody::TrendItem {
                payload: TrendPayload::default(),
                key: SingleIndexKey::default(),
            },
            FormatTag::DosageCalculation => ItemBody::DosageCalculation {
                payload: DosagePayload::default(),
                key: DosageKey::default(),
            },
            FormatTag::CaseStudy => ItemBody::CaseStudy {
                payload: CaseStudyPayload::default(),
                key: CaseStudyKey::default(),
            },
        }
    }

    pub fn tag(&self) -> FormatTag {
        match self {
            ItemBody::MultipleChoice { .. } => FormatTag::MultipleChoice,
            ItemBody::Sata { .. } => FormatTag::Sata,
            ItemBody::SelectN { .. } => FormatTag::SelectN,
            ItemBody::MatrixMultipleResponse { .. } => FormatTag::MatrixMultipleResponse,
            ItemBody::Bowtie { .. } => FormatTag::Bowtie,
            ItemBody::ClozeDropdown { .. } => FormatTag::ClozeDropdown,
            ItemBody::ExtendedDragDrop { .. } => FormatTag::ExtendedDragDrop,
            ItemBody::ExtendedMultipleResponse { .. } => FormatTag::ExtendedMultipleResponse,
            ItemBody::HighlightText { .. } => FormatTag::HighlightText,
            ItemBody::Ranking { .. } => FormatTag::Ranking,
            ItemBody::TrendItem { .. } => FormatTag::TrendItem,
            ItemBody::DosageCalculation { .. } => FormatTag::DosageCalculation,
            ItemBody::CaseStudy { .. } => FormatTag::CaseStudy,
        }
    }
}
