use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::body::*;
use crate::models::format::{Classification, FormatTag};
use crate::models::item::{AssessmentItem, ItemStatus};

/// The generic record exchanged with the persistence collaborator.
/// `payload` and `answer_key` are raw JSON whose shape is mandated by
/// `format_tag`; decoding re-establishes the typed pairing and fails hard on
/// any mismatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEnvelope {
    pub id: Option<Uuid>,
    pub classification: Classification,
    pub format_tag: FormatTag,
    pub stem: String,
    pub payload: JsonValue,
    pub answer_key: JsonValue,
    pub rationale: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ItemEnvelope {
    pub fn from_item(item: &AssessmentItem) -> Result<ItemEnvelope> {
        let (payload, answer_key) = body_to_parts(&item.body)?;
        Ok(ItemEnvelope {
            id: item.id,
            classification: item.classification,
            format_tag: item.format_tag(),
            stem: item.stem.clone(),
            payload,
            answer_key,
            rationale: item.rationale.clone(),
            category_id: item.category_id,
            tags: item.tags.clone(),
        })
    }

    /// Rehydrate a draft from its stored record. The item comes back in
    /// Draft state; readiness is re-earned through the validator, not
    /// trusted from storage.
    pub fn into_item(self) -> Result<AssessmentItem> {
        let body = body_from_parts(self.format_tag, self.payload, self.answer_key)?;
        let now = chrono::Utc::now();
        Ok(AssessmentItem {
            id: self.id,
            classification: self.classification,
            stem: self.stem,
            body,
            rationale: self.rationale,
            category_id: self.category_id,
            tags: self.tags,
            status: ItemStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }
}

fn body_to_parts(body: &ItemBody) -> Result<(JsonValue, JsonValue)> {
    let pair = match body {
        ItemBody::MultipleChoice { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::Sata { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::SelectN { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::MatrixMultipleResponse { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::Bowtie { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::ClozeDropdown { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::ExtendedDragDrop { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::ExtendedMultipleResponse { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::HighlightText { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::Ranking { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::TrendItem { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::DosageCalculation { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
        ItemBody::CaseStudy { payload, key } => {
            (serde_json::to_value(payload)?, serde_json::to_value(key)?)
        }
    };
    Ok(pair)
}

fn body_from_parts(tag: FormatTag, payload: JsonValue, key: JsonValue) -> Result<ItemBody> {
    fn decode<T: serde::de::DeserializeOwned>(tag: FormatTag, half: &str, value: JsonValue) -> Result<T> {
        serde_json::from_value(value)
            .map_err(|e| Error::Envelope(format!("{tag}: malformed {half}: {e}")))
    }

    let body = match tag {
        FormatTag::MultipleChoice => ItemBody::MultipleChoice {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::Sata => ItemBody::Sata {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::SelectN => ItemBody::SelectN {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::MatrixMultipleResponse => ItemBody::MatrixMultipleResponse {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::Bowtie => ItemBody::Bowtie {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::ClozeDropdown => ItemBody::ClozeDropdown {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::ExtendedDragDrop => ItemBody::ExtendedDragDrop {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::ExtendedMultipleResponse => ItemBody::ExtendedMultipleResponse {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::HighlightText => ItemBody::HighlightText {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::Ranking => ItemBody::Ranking {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::TrendItem => ItemBody::TrendItem {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::DosageCalculation => ItemBody::DosageCalculation {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
        FormatTag::CaseStudy => ItemBody::CaseStudy {
            payload: decode(tag, "payload", payload)?,
            key: decode(tag, "answer_key", key)?,
        },
    };
    Ok(body)
}
