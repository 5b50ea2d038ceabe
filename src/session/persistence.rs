use super::record::SessionRecord;
use super::summary::{summary_field, Summary};
use crate::store::{NotebookRecord, SCHEMA_VERSION};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Field values that replace the session's current ones for a single save
#[derive(Debug, Clone, Default)]
pub struct RecordOverrides {
    /// `Some(None)` saves with no summary
    pub summary: Option<Option<Summary>>,
    pub duration: Option<u64>,
    pub date: Option<DateTime<Utc>>,
}

impl RecordOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_summary(mut self) -> Self {
        self.summary = Some(None);
        self
    }

    pub fn summary(mut self, summary: Summary) -> Self {
        self.summary = Some(Some(summary));
        self
    }

    pub fn duration(mut self, secs: u64) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// What the caller wants once the save has gone through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterSave {
    Stay,
    NavigateBack,
}

/// Who asked for a save. Only user actions raise the missing-user alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOrigin {
    User,
    /// Summary saves and the summary reset on recording start
    Background,
}

/// Result of a save request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// Backend accepted the record under this identifier
    Saved(String),
    /// Nothing changed since the last save; no backend call was made
    Unchanged,
    /// Transcript and note are both blank
    NothingToSave,
    /// Precondition not met (blank transcript, title not changed, ...)
    Skipped,
    /// No user identity; the host was alerted
    MissingUser,
    Failed(String),
}

/// Payload captured before the save is awaited
#[derive(Debug, Clone)]
pub struct SaveSnapshot {
    pub record: NotebookRecord,
    /// Session revision the payload reflects
    pub revision: u64,
}

/// Build the canonical record from the session plus overrides.
///
/// Returns `None` when there is no user to save for.
pub fn snapshot(
    session: &SessionRecord,
    overrides: &RecordOverrides,
    now: tokio::time::Instant,
) -> Option<SaveSnapshot> {
    let user_id = session.user_id.clone().filter(|u| !u.trim().is_empty())?;

    let summary = match &overrides.summary {
        Some(replacement) => summary_field(replacement.as_ref()),
        None => summary_field(session.summary.as_ref()),
    };

    // A recording in progress reports its live length
    let duration = overrides.duration.unwrap_or_else(|| {
        if session.is_recording {
            session.current_duration(now)
        } else {
            session.duration
        }
    });

    let record = NotebookRecord {
        schema_version: SCHEMA_VERSION,
        user_id,
        note_id: session.identifier.clone(),
        title: session.title_for_save(),
        note_text: session.note_text.clone(),
        cur_transcript: session.transcript_text.clone(),
        cur_summary: summary,
        date: overrides.date.or(session.date).unwrap_or_else(Utc::now),
        duration,
    };

    Some(SaveSnapshot {
        record,
        revision: session.revision(),
    })
}
