use crate::error::{Error, Result};
use crate::models::body::{ItemBody, Slot, SlotKey, SlotPayload};
use crate::models::item::AssessmentItem;

use super::choice::shift_single;

/// Editor for the slot-based formats: cloze_dropdown, extended_drag_drop and
/// extended_multiple_response share one shape (an ordered list of blanks,
/// each with its own option set and exactly one correct choice) and differ
/// only in how the delivery layer renders them. `key.by_slot` always has one
/// entry per slot.
pub struct SlotEditor;

impl SlotEditor {
    fn parts(item: &AssessmentItem) -> Result<(SlotPayload, SlotKey)> {
        match &item.body {
            ItemBody::ClozeDropdown { payload, key }
            | ItemBody::ExtendedDragDrop { payload, key }
            | ItemBody::ExtendedMultipleResponse { payload, key } => {
                let mut key = key.clone();
                // Re-establish one key entry per slot in case the stored
                // record drifted; editors keep this invariant from then on.
                key.by_slot.resize(payload.slots.len(), None);
                Ok((payload.clone(), key))
            }
            other => Err(Error::FormatMismatch {
                expected: crate::models::format::FormatTag::ClozeDropdown,
                actual: other.tag(),
            }),
        }
    }

    /// Rebuild the same variant the item already carries.
    fn rebuild(item: AssessmentItem, payload: SlotPayload, key: SlotKey) -> Result<AssessmentItem> {
        let body = match &item.body {
            ItemBody::ClozeDropdown { .. } => ItemBody::ClozeDropdown { payload, key },
            ItemBody::ExtendedDragDrop { .. } => ItemBody::ExtendedDragDrop { payload, key },
            ItemBody::ExtendedMultipleResponse { .. } => {
                ItemBody::ExtendedMultipleResponse { payload, key }
            }
            other => {
                return Err(Error::FormatMismatch {
                    expected: crate::models::format::FormatTag::ClozeDropdown,
                    actual: other.tag(),
                })
            }
        };
        item.apply(body)
    }

    pub fn add_slot(item: AssessmentItem, label: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        payload.slots.push(Slot { label: label.into(), options: Vec::new() });
        key.by_slot.push(None);
        Self::rebuild(item, payload, key)
    }

    pub fn set_slot_label(item: AssessmentItem, slot: usize, label: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        let len = payload.slots.len();
        let entry = payload
            .slots
            .get_mut(slot)
            .ok_or(Error::IndexOutOfRange { index: slot, len })?;
        entry.label = label.into();
        Self::rebuild(item, payload, key)
    }

    pub fn remove_slot(item: AssessmentItem, slot: usize) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        if slot >= payload.slots.len() {
            return Err(Error::IndexOutOfRange { index: slot, len: payload.slots.len() });
        }
        payload.slots.remove(slot);
        key.by_slot.remove(slot);
        Self::rebuild(item, payload, key)
    }

    pub fn add_slot_option(item: AssessmentItem, slot: usize, text: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        let len = payload.slots.len();
        let entry = payload
            .slots
            .get_mut(slot)
            .ok_or(Error::IndexOutOfRange { index: slot, len })?;
        entry.options.push(text.into());
        Self::rebuild(item, payload, key)
    }

    pub fn remove_slot_option(item: AssessmentItem, slot: usize, option: usize) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        let len = payload.slots.len();
        let entry = payload
            .slots
            .get_mut(slot)
            .ok_or(Error::IndexOutOfRange { index: slot, len })?;
        if option >= entry.options.len() {
            return Err(Error::IndexOutOfRange { index: option, len: entry.options.len() });
        }
        entry.options.remove(option);
        key.by_slot[slot] = shift_single(key.by_slot[slot], option);
        Self::rebuild(item, payload, key)
    }

    /// Set a slot's correct choice.
    pub fn choose(item: AssessmentItem, slot: usize, option: usize) -> Result<AssessmentItem> {
        let (payload, mut key) = Self::parts(&item)?;
        let entry = payload
            .slots
            .get(slot)
            .ok_or(Error::IndexOutOfRange { index: slot, len: payload.slots.len() })?;
        if option >= entry.options.len() {
            return Err(Error::IndexOutOfRange { index: option, len: entry.options.len() });
        }
        key.by_slot[slot] = Some(option);
        Self::rebuild(item, payload, key)
    }
}
