use crate::error::{Error, Result};
use crate::models::body::ItemBody;
use crate::models::format::FormatTag;
use crate::models::item::AssessmentItem;

/// Editor for the flat option-list formats: multiple_choice, sata and
/// select_n. Every method rebuilds a structurally complete body and hands it
/// to `AssessmentItem::apply`; removing an option reindexes the answer key so
/// a key index never dangles.
pub struct ChoiceEditor;

impl ChoiceEditor {
    pub fn add_option(item: AssessmentItem, text: impl Into<String>) -> Result<AssessmentItem> {
        let text = text.into();
        let body = match item.body.clone() {
            ItemBody::MultipleChoice { mut payload, key } => {
                payload.options.push(text);
                ItemBody::MultipleChoice { payload, key }
            }
            ItemBody::Sata { mut payload, key } => {
                payload.options.push(text);
                ItemBody::Sata { payload, key }
            }
            ItemBody::SelectN { mut payload, key } => {
                payload.options.push(text);
                ItemBody::SelectN { payload, key }
            }
            other => {
                return Err(Error::FormatMismatch {
                    expected: FormatTag::MultipleChoice,
                    actual: other.tag(),
                })
            }
        };
        item.apply(body)
    }

    pub fn set_option(item: AssessmentItem, index: usize, text: impl Into<String>) -> Result<AssessmentItem> {
        let text = text.into();
        let body = match item.body.clone() {
            ItemBody::MultipleChoice { mut payload, key } => {
                set_at(&mut payload.options, index, text)?;
                ItemBody::MultipleChoice { payload, key }
            }
            ItemBody::Sata { mut payload, key } => {
                set_at(&mut payload.options, index, text)?;
                ItemBody::Sata { payload, key }
            }
            ItemBody::SelectN { mut payload, key } => {
                set_at(&mut payload.options, index, text)?;
                ItemBody::SelectN { payload, key }
            }
            other => {
                return Err(Error::FormatMismatch {
                    expected: FormatTag::MultipleChoice,
                    actual: other.tag(),
                })
            }
        };
        item.apply(body)
    }

    pub fn remove_option(item: AssessmentItem, index: usize) -> Result<AssessmentItem> {
        let body = match item.body.clone() {
            ItemBody::MultipleChoice { mut payload, mut key } => {
                remove_at(&mut payload.options, index)?;
                key.correct = shift_single(key.correct, index);
                ItemBody::MultipleChoice { payload, key }
            }
            ItemBody::Sata { mut payload, mut key } => {
                remove_at(&mut payload.options, index)?;
                key.correct = shift_set(&key.correct, index);
                ItemBody::Sata { payload, key }
            }
            ItemBody::SelectN { mut payload, mut key } => {
                remove_at(&mut payload.options, index)?;
                key.correct = shift_set(&key.correct, index);
                ItemBody::SelectN { payload, key }
            }
            other => {
                return Err(Error::FormatMismatch {
                    expected: FormatTag::MultipleChoice,
                    actual: other.tag(),
                })
            }
        };
        item.apply(body)
    }

    /// Pick the single best answer (multiple_choice only).
    pub fn select_answer(item: AssessmentItem, index: usize) -> Result<AssessmentItem> {
        let body = match item.body.clone() {
            ItemBody::MultipleChoice { payload, mut key } => {
                if index >= payload.options.len() {
                    return Err(Error::IndexOutOfRange { index, len: payload.options.len() });
                }
                key.correct = Some(index);
                ItemBody::MultipleChoice { payload, key }
            }
            other => {
                return Err(Error::FormatMismatch {
                    expected: FormatTag::MultipleChoice,
                    actual: other.tag(),
                })
            }
        };
        item.apply(body)
    }

    /// Toggle membership in the answer set (sata and select_n). select_n
    /// refuses to grow past its quota instead of silently dropping an
    /// earlier selection.
    pub fn toggle_selection(item: AssessmentItem, index: usize) -> Result<AssessmentItem> {
        let body = match item.body.clone() {
            ItemBody::Sata { payload, mut key } => {
                if index >= payload.options.len() {
                    return Err(Error::IndexOutOfRange { index, len: payload.options.len() });
                }
                if !key.correct.remove(&index) {
                    key.correct.insert(index);
                }
                ItemBody::Sata { payload, key }
            }
            ItemBody::SelectN { payload, mut key } => {
                if index >= payload.options.len() {
                    return Err(Error::IndexOutOfRange { index, len: payload.options.len() });
                }
                if !key.correct.remove(&index) {
                    if key.correct.len() >= payload.required {
                        return Err(Error::SelectionLimit { limit: payload.required });
                    }
                    key.correct.insert(index);
                }
                ItemBody::SelectN { payload, key }
            }
            other => {
                return Err(Error::FormatMismatch {
                    expected: FormatTag::Sata,
                    actual: other.tag(),
                })
            }
        };
        item.apply(body)
    }

    /// Change select_n's quota. Refused while more selections exist than the
    /// new quota allows; the author deselects first, nothing is dropped
    /// silently.
    pub fn set_required(item: AssessmentItem, required: usize) -> Result<AssessmentItem> {
        let body = match item.body.clone() {
            ItemBody::SelectN { mut payload, key } => {
                if key.correct.len() > required {
                    return Err(Error::SelectionLimit { limit: required });
                }
                payload.required = required;
                ItemBody::SelectN { payload, key }
            }
            other => {
                return Err(Error::FormatMismatch {
                    expected: FormatTag::SelectN,
                    actual: other.tag(),
                })
            }
        };
        item.apply(body)
    }
}

pub(crate) fn set_at(options: &mut [String], index: usize, text: String) -> Result<()> {
    let len = options.len();
    let slot = options
        .get_mut(index)
        .ok_or(Error::IndexOutOfRange { index, len })?;
    *slot = text;
    Ok(())
}

pub(crate) fn remove_at(options: &mut Vec<String>, index: usize) -> Result<()> {
    if index >= options.len() {
        return Err(Error::IndexOutOfRange { index, len: options.len() });
    }
    options.remove(index);
    Ok(())
}

/// Reindex a single-index key after removing `removed`: the removed option's
/// selection is cleared, later indices slide down by one.
pub(crate) fn shift_single(correct: Option<usize>, removed: usize) -> Option<usize> {
    match correct {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    }
}

/// Reindex an index-set key after removing `removed`.
pub(crate) fn shift_set(correct: &std::collections::BTreeSet<usize>, removed: usize) -> std::collections::BTreeSet<usize> {
    correct
        .iter()
        .filter(|&&i| i != removed)
        .map(|&i| if i > removed { i - 1 } else { i })
        .collect()
}
