//! Knowledge record and submission payload.
//!
//! # Responsibility
//! - Define `KnowledgeRecord` exactly as the remote collection serializes it.
//! - Build `KnowledgePayload` bodies for create/update requests.
//!
//! # Invariants
//! - `date` is `YYYY/MM/DD` and never rewritten after creation.
//! - Tag sequences are set-like: toggling never introduces duplicates.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Server-assigned record identifier.
pub type KnowledgeId = i64;

/// Fixed tag vocabulary offered by the create/edit forms and the list filter.
pub const TAG_OPTIONS: [&str; 6] = ["業務", "システム", "トラブル", "FAQ", "用語", "教育"];

/// Placeholder author stamped on newly created records.
pub const DEFAULT_AUTHOR: &str = "テストユーザー";

const DATE_FORMAT: &str = "%Y/%m/%d";

/// One knowledge article as returned by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub id: KnowledgeId,
    pub title: String,
    /// Markdown source.
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation date, `YYYY/MM/DD`.
    pub date: String,
    pub author: String,
}

impl KnowledgeRecord {
    /// Returns whether this record carries `tag` exactly.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|value| value == tag)
    }
}

/// Request body for `POST /knowledges` and `PUT /knowledges/{id}`.
///
/// Carries no `id`; identity travels in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgePayload {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub date: String,
    pub author: String,
}

impl KnowledgePayload {
    /// Builds a create payload stamped with `date` and the placeholder author.
    ///
    /// # Errors
    /// - Returns `DraftValidationError::EmptyTitle` for blank titles.
    pub fn for_create(
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        date: NaiveDate,
    ) -> Result<Self, DraftValidationError> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self {
            title,
            content: content.into(),
            tags,
            date: format_record_date(date),
            author: DEFAULT_AUTHOR.to_string(),
        })
    }

    /// Builds an update payload; `date` and `author` are carried over from
    /// `target` unchanged.
    ///
    /// # Errors
    /// - Returns `DraftValidationError::EmptyTitle` for blank titles.
    pub fn for_update(
        target: &KnowledgeRecord,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self, DraftValidationError> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self {
            title,
            content: content.into(),
            tags,
            date: target.date.clone(),
            author: target.author.clone(),
        })
    }
}

/// Local validation failure raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftValidationError {
    EmptyTitle,
}

impl Display for DraftValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
        }
    }
}

impl Error for DraftValidationError {}

/// Rejects empty and whitespace-only titles. The title itself is sent
/// untrimmed.
pub fn validate_title(title: &str) -> Result<(), DraftValidationError> {
    if title.trim().is_empty() {
        return Err(DraftValidationError::EmptyTitle);
    }
    Ok(())
}

/// Formats a calendar date the way records store it (`YYYY/MM/DD`).
pub fn format_record_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's local date, used to stamp new records.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Toggles `tag` in an ordered, set-like tag sequence.
///
/// Present tags are removed; absent tags are appended.
pub fn toggle_tag(tags: &mut Vec<String>, tag: &str) {
    if let Some(index) = tags.iter().position(|value| value == tag) {
        tags.remove(index);
    } else {
        tags.push(tag.to_string());
    }
}
