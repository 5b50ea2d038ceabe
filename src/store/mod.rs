//! Notebook persistence backend
//!
//! The session hands the store full-record snapshots; the store creates a
//! notebook when `note_id` is absent and updates it otherwise, returning the
//! durable identifier either way.

mod http;

pub use http::HttpNotebookStore;

use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current shape of [`NotebookRecord`]
pub const SCHEMA_VERSION: u32 = 2;

/// Canonical save payload built by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookRecord {
    pub schema_version: u32,
    pub user_id: String,
    pub note_id: Option<String>,
    pub title: String,
    pub note_text: String,
    pub cur_transcript: String,
    /// Serialized `{summary, keywords}` or empty
    pub cur_summary: String,
    pub date: DateTime<Utc>,
    /// Recording length in whole seconds
    pub duration: u64,
}

/// A notebook as previously stored by the backend, used to hydrate a session.
///
/// Older records carry the note body under `originalText` or `text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedNotebook {
    #[serde(rename = "_id", alias = "noteId", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub note_text: Option<String>,
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub cur_transcript: Option<String>,
    #[serde(default)]
    pub cur_summary: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Option<u64>,
}

impl PersistedNotebook {
    /// Note body, preferring the current field over legacy aliases
    pub fn note_body(&self) -> String {
        [&self.note_text, &self.original_text, &self.text]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_default()
    }
}

/// Create-or-update persistence for notebook records
#[async_trait::async_trait]
pub trait NotebookStore: Send + Sync {
    /// Save the record and return its durable identifier
    async fn save(&self, record: NotebookRecord) -> Result<String, ServiceError>;
}
