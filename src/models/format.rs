use serde::{Deserialize, Serialize};

/// Item classification: classic single-best-answer style vs. the
/// Next-Generation (NGN) interactive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Classic,
    Ngn,
}

/// The closed set of item format tags. Anything outside this set is a hard
/// decode error at the envelope boundary, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    MultipleChoice,
    Sata,
    SelectN,
    MatrixMultipleResponse,
    Bowtie,
    ClozeDropdown,
    ExtendedDragDrop,
    ExtendedMultipleResponse,
    HighlightText,
    Ranking,
    TrendItem,
    DosageCalculation,
    CaseStudy,
}

impl FormatTag {
    pub const ALL: [FormatTag; 13] = [
        FormatTag::MultipleChoice,
        FormatTag::Sata,
        FormatTag::SelectN,
        FormatTag::MatrixMultipleResponse,
        FormatTag::Bowtie,
        FormatTag::ClozeDropdown,
        FormatTag::ExtendedDragDrop,
        FormatTag::ExtendedMultipleResponse,
        FormatTag::HighlightText,
        FormatTag::Ranking,
        FormatTag::TrendItem,
        FormatTag::DosageCalculation,
        FormatTag::CaseStudy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::MultipleChoice => "multiple_choice",
            FormatTag::Sata => "sata",
            FormatTag::SelectN => "select_n",
            FormatTag::MatrixMultipleResponse => "matrix_multiple_response",
            FormatTag::Bowtie => "bowtie",
            FormatTag::ClozeDropdown => "cloze_dropdown",
            FormatTag::ExtendedDragDrop => "extended_drag_drop",
            FormatTag::ExtendedMultipleResponse => "extended_multiple_response",
            FormatTag::HighlightText => "highlight_text",
            FormatTag::Ranking => "ranking",
            FormatTag::TrendItem => "trend_item",
            FormatTag::DosageCalculation => "dosage_calculation",
            FormatTag::CaseStudy => "case_study",
        }
    }

    /// Total and pure: every tag resolves to exactly one descriptor.
    /// Adding a format means adding one arm here plus its editor and
    /// scoring arm; nothing else changes.
    pub fn descriptor(&self) -> FormatDescriptor {
        match self {
            FormatTag::MultipleChoice => FormatDescriptor {
                tag: *self,
                payload_shape: PayloadShape::OptionList,
                answer_shape: AnswerShape::SingleIndex,
                scoring_policy: ScoringPolicy::ExactMatch,
            },
            FormatTag::Sata => FormatDescriptor {
                tag: *self,
                payload_shape: PayloadShape::OptionList,
                answer_shape: AnswerShape::IndexSet,
                scoring_policy: ScoringPolicy::ExactMatch,
            },
            FormatTag::SelectN => FormatDescriptor {
                tag: *self,
                payload_shape: PayloadShape::OptionListWithQuota,
                answer_shape: AnswerShape::FixedSizeIndexSet,
                scoring_policy: ScoringPolicy::ExactMatch,
            },
            FormatTag::MatrixMultipleResponse => FormatDescriptor {
                tag: *self,
                payload_shape: PayloadShape::RowsByColumns,
                answer_shape: AnswerShape::IndexPerRow,
                scoring_policy: ScoringPolicy::SubsetMatch,
            },
            FormatTag::Bowtie => FormatDescriptor {
                tag: *self,
                payload_shape: PayloadShape::ThreePools,
                answer_shape: AnswerShape::IndexSetPerPool,
                scoring_policy: ScoringPolicy::SubsetMatch,
            },
            FormatTag::ClozeDropdown | FormatTag::ExtendedDragDrop | FormatTag::ExtendedMultipleResponse => {
                FormatDescriptor {
                    tag: *self,
                    payload_shape: PayloadShape::SlotList,
                    answer_shape: AnswerShape::IndexPerSlot,
                    scoring_policy: ScoringPolicy::SubsetMatch,
                }
            }
            FormatTag::HighlightText => FormatDescriptor {
                tag: *self,
                payload_shape: PayloadShape::TokenSequence,
                answer_shape: AnswerShape::IndexSet,
                scoring_policy: ScoringPolicy::ExactMatch,
            },
            FormatTag::Ranking => FormatDescriptor {
                tag: *self,
                payload_shape: PayloadShape::OrderedItemList,
                answer_shape: AnswerShape::Permutation,
                scoring_policy: ScoringPolicy::OrderedMatch,
            },
            FormatTag::TrendItem => FormatDescriptor {
                tag: *self,
                payload_shape: PayloadShape::PanelsPlusOptions,
                answer_shape: AnswerShape::SingleIndex,
                scoring_policy: ScoringPolicy::ExactMatch,
            },
            FormatTag::DosageCalculation => FormatDescriptor {
                tag: *self,
                payload_shape: PayloadShape::UnitAndPrecision,
                answer_shape: AnswerShape::NumericWithTolerance,
                scoring_policy: ScoringPolicy::ToleranceMatch,
            },
            FormatTag::CaseStudy => FormatDescriptor {
                tag: *self,
                payload_shape: PayloadShape::SixStepPanel,
                answer_shape: AnswerShape::IndexPerStep,
                scoring_policy: ScoringPolicy::PerStepAggregate,
            },
        }
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    OptionList,
    OptionListWithQuota,
    RowsByColumns,
    ThreePools,
    SlotList,
    TokenSequence,
    OrderedItemList,
    PanelsPlusOptions,
    UnitAndPrecision,
    SixStepPanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerShape {
    SingleIndex,
    IndexSet,
    FixedSizeIndexSet,
    IndexPerRow,
    IndexSetPerPool,
    IndexPerSlot,
    Permutation,
    NumericWithTolerance,
    IndexPerStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    ExactMatch,
    SubsetMatch,
    OrderedMatch,
    ToleranceMatch,
    PerStepAggregate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub tag: FormatTag,
    pub payload_shape: PayloadShape,
    pub answer_shape: AnswerShape,
    pub scoring_policy: ScoringPolicy,
}
