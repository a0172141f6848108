use crate::error::{Error, Result};
use crate::models::body::{ItemBody, RankingKey, RankingPayload};
use crate::models::format::FormatTag;
use crate::models::item::AssessmentItem;

/// Editor for ranking items: an item list plus a full permutation giving the
/// correct order. Changing the item list clears the order rather than
/// leaving a stale permutation behind.
pub struct RankingEditor;

impl RankingEditor {
    fn parts(item: &AssessmentItem) -> Result<(RankingPayload, RankingKey)> {
        match &item.body {
            ItemBody::Ranking { payload, key } => Ok((payload.clone(), key.clone())),
            other => Err(Error::FormatMismatch {
                expected: FormatTag::Ranking,
                actual: other.tag(),
            }),
        }
    }

    pub fn add_item(item: AssessmentItem, text: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        payload.items.push(text.into());
        key.order.clear();
        item.apply(ItemBody::Ranking { payload, key })
    }

    pub fn set_item(item: AssessmentItem, index: usize, text: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        let len = payload.items.len();
        let slot = payload
            .items
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = text.into();
        item.apply(ItemBody::Ranking { payload, key })
    }

    pub fn remove_item(item: AssessmentItem, index: usize) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        if index >= payload.items.len() {
            return Err(Error::IndexOutOfRange { index, len: payload.items.len() });
        }
        payload.items.remove(index);
        key.order.clear();
        item.apply(ItemBody::Ranking { payload, key })
    }

    /// Fix the correct order. Must be a permutation of 0..items.len().
    pub fn set_correct_order(item: AssessmentItem, order: Vec<usize>) -> Result<AssessmentItem> {
        let (payload, mut key) = Self::parts(&item)?;
        let len = payload.items.len();
        if !is_permutation(&order, len) {
            let bad = order.iter().copied().find(|&i| i >= len).unwrap_or(order.len());
            return Err(Error::IndexOutOfRange { index: bad, len });
        }
        key.order = order;
        item.apply(ItemBody::Ranking { payload, key })
    }

    /// Move one entry of the correct order, authoring-UI drag style.
    pub fn move_item(item: AssessmentItem, from: usize, to: usize) -> Result<AssessmentItem> {
        let (payload, mut key) = Self::parts(&item)?;
        let len = key.order.len();
        if from >= len {
            return Err(Error::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(Error::IndexOutOfRange { index: to, len });
        }
        let moved = key.order.remove(from);
        key.order.insert(to, moved);
        item.apply(ItemBody::Ranking { payload, key })
    }
}

pub(crate) fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}
