use crate::error::{Error, Result};
use crate::models::body::{ItemBody, TrendPanel, TrendPayload};
use crate::models::format::FormatTag;
use crate::models::item::AssessmentItem;

use super::choice::{remove_at, set_at, shift_single};

/// Editor for trend items: multi-panel clinical data (vitals, labs, nurses'
/// notes, imaging, ...) plus a single-best-answer option list.
pub struct TrendEditor;

impl TrendEditor {
    fn parts(item: &AssessmentItem) -> Result<(TrendPayload, crate::models::body::SingleIndexKey)> {
        match &item.body {
            ItemBody::TrendItem { payload, key } => Ok((payload.clone(), key.clone())),
            other => Err(Error::FormatMismatch {
                expected: FormatTag::TrendItem,
                actual: other.tag(),
            }),
        }
    }

    pub fn add_panel(item: AssessmentItem, label: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        payload.panels.push(TrendPanel { label: label.into(), content: String::new() });
        item.apply(ItemBody::TrendItem { payload, key })
    }

    pub fn set_panel_content(item: AssessmentItem, index: usize, content: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        let len = payload.panels.len();
        let panel = payload
            .panels
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        panel.content = content.into();
        item.apply(ItemBody::TrendItem { payload, key })
    }

    pub fn remove_panel(item: AssessmentItem, index: usize) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        if index >= payload.panels.len() {
            return Err(Error::IndexOutOfRange { index, len: payload.panels.len() });
        }
        payload.panels.remove(index);
        item.apply(ItemBody::TrendItem { payload, key })
    }

    pub fn add_option(item: AssessmentItem, text: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        payload.options.push(text.into());
        item.apply(ItemBody::TrendItem { payload, key })
    }

    pub fn set_option(item: AssessmentItem, index: usize, text: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        set_at(&mut payload.options, index, text.into())?;
        item.apply(ItemBody::TrendItem { payload, key })
    }

    pub fn remove_option(item: AssessmentItem, index: usize) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        remove_at(&mut payload.options, index)?;
        key.correct = shift_single(key.correct, index);
        item.apply(ItemBody::TrendItem { payload, key })
    }

    pub fn select_answer(item: AssessmentItem, index: usize) -> Result<AssessmentItem> {
        let (payload, mut key) = Self::parts(&item)?;
        if index >= payload.options.len() {
            return Err(Error::IndexOutOfRange { index, len: payload.options.len() });
        }
        key.correct = Some(index);
        item.apply(ItemBody::TrendItem { payload, key })
    }
}
