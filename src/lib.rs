pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::error::{Error, Result};
pub use crate::models::body::ItemBody;
pub use crate::models::envelope::ItemEnvelope;
pub use crate::models::format::{Classification, FormatDescriptor, FormatTag, ScoringPolicy};
pub use crate::models::item::{AssessmentItem, ItemStatus};
pub use crate::models::score::{PartScore, ScoreResult};
pub use crate::services::grading_service::GradingService;
pub use crate::services::publish_validator::{MissingFieldError, PublishValidator};
