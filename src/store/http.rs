use super::{NotebookRecord, NotebookStore};
use crate::config::StoreConfig;
use crate::error::ServiceError;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

/// REST notebook store (`POST {base}/userdata`)
pub struct HttpNotebookStore {
    base_url: String,
    client: reqwest::Client,
}

/// Wire body expected by the backend.
///
/// The backend still reads the note body from `originalText`/`text` for old
/// clients, so the aliases are filled here and nowhere else.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserDataBody<'a> {
    schema_version: u32,
    user_id: &'a str,
    note_id: Option<&'a str>,
    title: &'a str,
    note_text: &'a str,
    original_text: &'a str,
    text: &'a str,
    cur_transcript: &'a str,
    cur_summary: &'a str,
    date: DateTime<Utc>,
    duration: u64,
}

impl<'a> From<&'a NotebookRecord> for UserDataBody<'a> {
    fn from(record: &'a NotebookRecord) -> Self {
        Self {
            schema_version: record.schema_version,
            user_id: &record.user_id,
            note_id: record.note_id.as_deref(),
            title: &record.title,
            note_text: &record.note_text,
            original_text: &record.note_text,
            text: &record.note_text,
            cur_transcript: &record.cur_transcript,
            cur_summary: &record.cur_summary,
            date: record.date,
            duration: record.duration,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDataResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "_id", alias = "id")]
    note_id: Option<String>,
}

impl HttpNotebookStore {
    pub fn new(config: &StoreConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client for HttpNotebookStore")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl NotebookStore for HttpNotebookStore {
    #[instrument(skip(self, record), fields(note_id = ?record.note_id))]
    async fn save(&self, record: NotebookRecord) -> Result<String, ServiceError> {
        let url = format!("{}/userdata", self.base_url);
        let body = UserDataBody::from(&record);

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: UserDataResponse = response.json().await.map_err(|e| {
            ServiceError::InvalidResponse(format!("Failed to parse save response: {}", e))
        })?;

        if !parsed.success {
            return Err(ServiceError::InvalidResponse(
                parsed.message.unwrap_or_else(|| "Save rejected".to_string()),
            ));
        }

        // Updates may not echo the id back
        let id = parsed
            .note_id
            .or(record.note_id)
            .ok_or_else(|| ServiceError::InvalidResponse("No notebook id in response".into()))?;

        info!("Notebook saved: {}", id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_body_carries_legacy_aliases() {
        let record = NotebookRecord {
            schema_version: super::super::SCHEMA_VERSION,
            user_id: "u1".to_string(),
            note_id: None,
            title: "Standup".to_string(),
            note_text: "my notes".to_string(),
            cur_transcript: "words".to_string(),
            cur_summary: String::new(),
            date: Utc::now(),
            duration: 42,
        };

        let json = serde_json::to_value(UserDataBody::from(&record)).unwrap();
        assert_eq!(json["noteText"], "my notes");
        assert_eq!(json["originalText"], "my notes");
        assert_eq!(json["text"], "my notes");
        assert_eq!(json["noteId"], serde_json::Value::Null);
        assert_eq!(json["curSummary"], "");
        assert_eq!(json["duration"], 42);
    }

    #[test]
    fn test_response_id_aliases() {
        let parsed: UserDataResponse =
            serde_json::from_str(r#"{"success":true,"_id":"abc"}"#).unwrap();
        assert_eq!(parsed.note_id.as_deref(), Some("abc"));
    }
}
