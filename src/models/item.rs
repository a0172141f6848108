use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::body::ItemBody;
use crate::models::format::{Classification, FormatTag};
use crate::services::publish_validator::PublishValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Draft,
    Ready,
}

/// The single-owner draft an authoring session edits. All mutation goes
/// through `apply`, which returns a new value; editors never reach into the
/// body directly, so one format's edits cannot bleed into another's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentItem {
    /// Set by the persistence collaborator once stored; never minted here.
    pub id: Option<Uuid>,
    pub classification: Classification,
    pub stem: String,
    #[serde(flatten)]
    pub body: ItemBody,
    pub rationale: Option<String>,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssessmentItem {
    /// An empty draft in the format's default shape.
    pub fn new(classification: Classification, tag: FormatTag) -> AssessmentItem {
        let now = Utc::now();
        AssessmentItem {
            id: None,
            classification,
            stem: String::new(),
            body: ItemBody::empty(tag),
            rationale: None,
            category_id: None,
            tags: Vec::new(),
            status: ItemStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn format_tag(&self) -> FormatTag {
        self.body.tag()
    }

    /// Discards the current payload/answer and
    /// reinitializes to the new format's empty default. Irreversible within
    /// the session; the warn line is the mandatory visibility point for the
    /// data loss. Switching to the current format is a no-op.
    pub fn change_format(self, new_tag: FormatTag) -> Result<AssessmentItem> {
        if self.status == ItemStatus::Ready {
            return Err(Error::ItemFrozen);
        }
        let old_tag = self.format_tag();
        if old_tag == new_tag {
            return Ok(self);
        }
        tracing::warn!(
            from = %old_tag,
            to = %new_tag,
            "format switch discards the existing payload and answer key"
        );
        Ok(AssessmentItem {
            body: ItemBody::empty(new_tag),
            updated_at: Utc::now(),
            ..self
        })
    }

    /// The single mutation entry point every editor uses. The
    /// replacement body must carry the item's current tag; a mismatch is an
    /// editor bug surfaced as a hard error, not a silent re-tag.
    pub fn apply(self, body: ItemBody) -> Result<AssessmentItem> {
        if self.status == ItemStatus::Ready {
            return Err(Error::ItemFrozen);
        }
        let expected = self.format_tag();
        if body.tag() != expected {
            return Err(Error::FormatMismatch { expected, actual: body.tag() });
        }
        Ok(AssessmentItem { body, updated_at: Utc::now(), ..self })
    }

    pub fn set_stem(self, stem: impl Into<String>) -> Result<AssessmentItem> {
        if self.status == ItemStatus::Ready {
            return Err(Error::ItemFrozen);
        }
        Ok(AssessmentItem { stem: stem.into(), updated_at: Utc::now(), ..self })
    }

    pub fn set_rationale(self, rationale: Option<String>) -> Result<AssessmentItem> {
        if self.status == ItemStatus::Ready {
            return Err(Error::ItemFrozen);
        }
        Ok(AssessmentItem { rationale, updated_at: Utc::now(), ..self })
    }

    /// Freeze for delivery. Fails with the full missing-field list while the
    /// draft is incomplete; completeness is re-checked here, not cached.
    pub fn mark_ready(self) -> Result<AssessmentItem> {
        let missing = PublishValidator::validate(&self);
        if !missing.is_empty() {
            return Err(Error::NotReady(missing));
        }
        Ok(AssessmentItem { status: ItemStatus::Ready, updated_at: Utc::now(), ..self })
    }

    /// Explicit new edit session on a frozen item.
    pub fn reopen(self) -> AssessmentItem {
        AssessmentItem { status: ItemStatus::Draft, updated_at: Utc::now(), ..self }
    }
}
