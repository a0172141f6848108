use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::body::{DosageKey, DosagePayload, ItemBody};
use crate::models::format::FormatTag;
use crate::models::item::AssessmentItem;

/// Editor for dosage-calculation items: a unit label, a display precision,
/// and a numeric correct value with an inclusive tolerance band.
pub struct DosageEditor;

impl DosageEditor {
    fn parts(item: &AssessmentItem) -> Result<(DosagePayload, DosageKey)> {
        match &item.body {
            ItemBody::DosageCalculation { payload, key } => Ok((payload.clone(), key.clone())),
            other => Err(Error::FormatMismatch {
                expected: FormatTag::DosageCalculation,
                actual: other.tag(),
            }),
        }
    }

    pub fn set_unit(item: AssessmentItem, unit: impl Into<String>) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        payload.unit = unit.into();
        item.apply(ItemBody::DosageCalculation { payload, key })
    }

    pub fn set_precision(item: AssessmentItem, precision: u32) -> Result<AssessmentItem> {
        let (mut payload, key) = Self::parts(&item)?;
        payload.precision = precision;
        item.apply(ItemBody::DosageCalculation { payload, key })
    }

    pub fn set_correct_value(item: AssessmentItem, value: Decimal) -> Result<AssessmentItem> {
        let (payload, mut key) = Self::parts(&item)?;
        key.correct_value = Some(value);
        item.apply(ItemBody::DosageCalculation { payload, key })
    }

    /// Tolerance is a half-width, so it must be non-negative. Zero means the
    /// response has to hit the value exactly.
    pub fn set_tolerance(item: AssessmentItem, tolerance: Decimal) -> Result<AssessmentItem> {
        if tolerance < Decimal::ZERO {
            return Err(Error::InvalidValue(format!("negative tolerance {tolerance}")));
        }
        let (payload, mut key) = Self::parts(&item)?;
        key.tolerance = tolerance;
        item.apply(ItemBody::DosageCalculation { payload, key })
    }
}
