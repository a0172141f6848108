use crate::models::format::FormatTag;
use crate::services::publish_validator::MissingFieldError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Format mismatch: item is {actual}, operation targets {expected}")]
    FormatMismatch { expected: FormatTag, actual: FormatTag },

    #[error("Item is marked ready and cannot be edited; reopen it first")]
    ItemFrozen,

    #[error("Index {index} is out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Selection limit reached: at most {limit} selections allowed")]
    SelectionLimit { limit: usize },

    #[error("Item is not ready for delivery ({} field(s) missing or invalid)", .0.len())]
    NotReady(Vec<MissingFieldError>),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Envelope error: {0}")]
    Envelope(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
