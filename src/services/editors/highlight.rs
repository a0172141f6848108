use crate::error::{Error, Result};
use crate::models::body::{HighlightPayload, IndexSetKey, ItemBody};
use crate::models::format::FormatTag;
use crate::models::item::AssessmentItem;
use crate::utils::markup;

/// Editor for highlight-text items. The marked-up source is the single
/// source of truth: tokens and the answer key are both derived from it in
/// one step, so they can never disagree.
pub struct HighlightEditor;

impl HighlightEditor {
    pub fn set_source(item: AssessmentItem, source: impl Into<String>) -> Result<AssessmentItem> {
        match &item.body {
            ItemBody::HighlightText { .. } => {}
            other => {
                return Err(Error::FormatMismatch {
                    expected: FormatTag::HighlightText,
                    actual: other.tag(),
                })
            }
        }
        let source = source.into();
        let tokens = markup::parse_markup(&source);
        let correct = markup::derive_answer_key(&tokens);
        tracing::debug!(
            clickable = markup::clickable_count(&tokens),
            correct = correct.len(),
            "highlight source reparsed"
        );
        item.apply(ItemBody::HighlightText {
            payload: HighlightPayload { source, tokens },
            key: IndexSetKey { correct },
        })
    }
}
