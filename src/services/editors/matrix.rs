use crate::error::{Error, Result};
use crate::models::body::{ItemBody, MatrixKey, MatrixPayload};
use crate::models::format::FormatTag;
use crate::models::item::AssessmentItem;

/// Editor for matrix/grid items: rows crossed with fixed column labels and
/// one correct column per row. `key.by_row` is kept the same length as
/// `payload.rows` at all times.
pub struct MatrixEditor;

impl MatrixEditor {
    fn parts(item: &AssessmentItem) -> Result<(MatrixPayload, MatrixKey)> {
        match &item.body {
            ItemBody::MatrixMultipleResponse { payload, key } => {
                let mut key = key.clone();
                // Re-establish one key entry per row in case the stored
                // record drifted; editors keep this invariant from then on.
                key.by_row.resize(payload.rows.len(), None);
                Ok((payload.clone(), key))
            }
            other => Err(Error::FormatMismatch {
                expected: FormatTag::MatrixMultipleResponse,
                actual: other.tag(),
            }),
        }
    }

    /// Replace the column labels wholesale. Row answers pointing past the
    /// new column count are cleared, not clamped.
    pub fn set_columns(item: AssessmentItem, columns: Vec<String>) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        let cols = columns.len();
        payload.columns = columns;
        for answer in key.by_row.iter_mut() {
            if matches!(answer, Some(i) if *i >= cols) {
                *answer = None;
            }
        }
        item.apply(ItemBody::MatrixMultipleResponse { payload, key })
    }

    pub fn add_row(item: AssessmentItem, label: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        payload.rows.push(label.into());
        key.by_row.push(None);
        item.apply(ItemBody::MatrixMultipleResponse { payload, key })
    }

    pub fn set_row_label(item: AssessmentItem, row: usize, label: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        let len = payload.rows.len();
        let slot = payload
            .rows
            .get_mut(row)
            .ok_or(Error::IndexOutOfRange { index: row, len })?;
        *slot = label.into();
        item.apply(ItemBody::MatrixMultipleResponse { payload, key })
    }

    pub fn remove_row(item: AssessmentItem, row: usize) -> Result<AssessmentItem> {
        let (mut payload, mut key) = Self::parts(&item)?;
        if row >= payload.rows.len() {
            return Err(Error::IndexOutOfRange { index: row, len: payload.rows.len() });
        }
        payload.rows.remove(row);
        key.by_row.remove(row);
        item.apply(ItemBody::MatrixMultipleResponse { payload, key })
    }

    pub fn set_row_answer(item: AssessmentItem, row: usize, column: usize) -> Result<AssessmentItem> {
        let (payload, mut key) = Self::parts(&item)?;
        if row >= payload.rows.len() {
            return Err(Error::IndexOutOfRange { index: row, len: payload.rows.len() });
        }
        if column >= payload.columns.len() {
            return Err(Error::IndexOutOfRange { index: column, len: payload.columns.len() });
        }
        key.by_row[row] = Some(column);
        item.apply(ItemBody::MatrixMultipleResponse { payload, key })
    }
}
