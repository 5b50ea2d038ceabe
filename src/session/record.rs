use super::summary::{transcript_len, Summary, SummaryState, MIN_SUMMARY_CHARS};
use crate::store::PersistedNotebook;
use crate::transcription::{CompletedTranscript, RecordingSignal};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const NEW_NOTE_TITLE: &str = "New Note";

/// Which pane of the transcription column is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    Transcript,
    Summary,
}

/// How the summary tab should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryTab {
    /// Recording, or nothing has been transcribed yet
    Hidden,
    /// Transcribed before, but the current text is blank
    Waiting,
    Available,
}

/// Whether the session has ever received transcript content.
///
/// Only two transitions exist: content arriving marks it present, and a
/// recording start clears it. Blank text never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Empty,
    Present,
}

#[derive(Debug, Clone, Copy)]
pub enum PresenceEvent {
    Text { blank: bool },
    RecordingStarted,
}

impl Presence {
    pub fn next(self, event: PresenceEvent) -> Presence {
        match (self, event) {
            (_, PresenceEvent::RecordingStarted) => Presence::Empty,
            (_, PresenceEvent::Text { blank: false }) => Presence::Present,
            (state, PresenceEvent::Text { blank: true }) => state,
        }
    }
}

/// Result of feeding a recording signal to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    Started,
    /// Start signal while a recording is already running
    AlreadyRecording,
    /// Recording ended; carries the measured duration if a start was known
    Stopped(Option<u64>),
    Info(String),
}

/// What a title commit (blur / Enter) should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleCommit {
    /// Blank title was replaced with the fallback
    Reverted,
    /// Nothing to persist
    Unchanged,
    Save,
}

/// In-memory state of one notebook view
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub user_id: Option<String>,
    pub identifier: Option<String>,
    pub title: String,
    /// Title as last loaded or saved; blank edits revert to it
    pub persisted_title: Option<String>,
    pub editing_title: bool,
    pub note_text: String,
    pub transcript_text: String,
    presence: Presence,
    pub is_recording: bool,
    pub recording_started_at: Option<Instant>,
    pub duration: u64,
    /// Date of the persisted notebook, if hydrated
    pub date: Option<DateTime<Utc>>,
    pub summary: Option<Summary>,
    pub summary_state: SummaryState,
    /// Bumped whenever the summary is reset so stale results can be dropped
    pub summary_epoch: u64,
    pub active_view: ActiveView,
    /// Bumped on every change to a persisted field
    revision: u64,
    saved_revision: Option<u64>,
}

impl SessionRecord {
    /// Fresh session for a new notebook
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id,
            identifier: None,
            title: NEW_NOTE_TITLE.to_string(),
            persisted_title: None,
            editing_title: false,
            note_text: String::new(),
            transcript_text: String::new(),
            presence: Presence::Empty,
            is_recording: false,
            recording_started_at: None,
            duration: 0,
            date: None,
            summary: None,
            summary_state: SummaryState::Idle,
            summary_epoch: 0,
            active_view: ActiveView::Transcript,
            revision: 0,
            saved_revision: None,
        }
    }

    /// Session opened on a previously saved notebook
    pub fn hydrate(user_id: Option<String>, persisted: &PersistedNotebook) -> Self {
        let title = persisted
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let transcript = persisted.cur_transcript.clone().unwrap_or_default();
        let summary = persisted
            .cur_summary
            .as_deref()
            .and_then(Summary::from_payload);

        let mut record = Self::new(user_id);
        record.identifier = persisted.id.clone();
        record.persisted_title = Some(title.clone());
        record.title = title;
        record.note_text = persisted.note_body();
        record.presence = record.presence.next(PresenceEvent::Text {
            blank: transcript.trim().is_empty(),
        });
        record.transcript_text = transcript;
        record.duration = persisted.duration.unwrap_or(0);
        record.date = persisted.date;
        if summary.is_some() {
            record.summary_state = SummaryState::Ready;
        }
        record.summary = summary;
        record
    }

    pub fn has_transcript(&self) -> bool {
        self.presence == Presence::Present
    }

    /// True when nothing changed since the last successful save
    pub fn recently_saved(&self) -> bool {
        self.saved_revision == Some(self.revision)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record that a snapshot taken at `revision` was persisted
    pub fn mark_saved(&mut self, revision: u64) {
        if revision == self.revision {
            self.saved_revision = Some(revision);
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn summary_tab(&self) -> SummaryTab {
        if self.is_recording || !self.has_transcript() {
            SummaryTab::Hidden
        } else if self.transcript_text.trim().is_empty() {
            SummaryTab::Waiting
        } else {
            SummaryTab::Available
        }
    }

    /// Seconds since the recording started, rounded to the nearest second
    pub fn elapsed_secs(&self, now: Instant) -> Option<u64> {
        self.recording_started_at.map(|started| {
            let millis = now.saturating_duration_since(started).as_millis() as u64;
            (millis + 500) / 1000
        })
    }

    /// Live elapsed time while a start is known, otherwise the stored duration
    pub fn current_duration(&self, now: Instant) -> u64 {
        self.elapsed_secs(now).unwrap_or(self.duration)
    }

    pub fn apply_signal(&mut self, signal: &RecordingSignal, now: Instant) -> SignalOutcome {
        match signal {
            RecordingSignal::Started if self.is_recording => SignalOutcome::AlreadyRecording,
            RecordingSignal::Started => {
                self.recording_started_at = Some(now);
                self.is_recording = true;
                self.active_view = ActiveView::Transcript;
                self.presence = self.presence.next(PresenceEvent::RecordingStarted);
                self.reset_summary();
                self.touch();
                SignalOutcome::Started
            }
            RecordingSignal::Stopped
            | RecordingSignal::IdlePrompt
            | RecordingSignal::Disconnected => SignalOutcome::Stopped(self.stop_recording(now)),
            RecordingSignal::Info(text) => SignalOutcome::Info(text.clone()),
        }
    }

    /// Turn recording off, folding elapsed time into `duration`
    pub fn stop_recording(&mut self, now: Instant) -> Option<u64> {
        self.is_recording = false;
        let elapsed = self.elapsed_secs(now);
        if let Some(secs) = elapsed {
            self.duration = secs;
            self.recording_started_at = None;
        }
        elapsed
    }

    /// Overwrite the transcript. Returns true if the update ended a recording.
    pub fn apply_transcript_update(
        &mut self,
        text: &str,
        recording_hint: Option<bool>,
        now: Instant,
    ) -> bool {
        if text != self.transcript_text {
            self.transcript_text = text.to_string();
            self.touch();
        }
        self.presence = self.presence.next(PresenceEvent::Text {
            blank: text.trim().is_empty(),
        });

        if recording_hint == Some(false) && self.is_recording {
            self.stop_recording(now);
            return true;
        }
        false
    }

    /// Commit the subsystem's final transcript and return the duration to persist
    pub fn commit_transcript(&mut self, done: &CompletedTranscript, now: Instant) -> u64 {
        let duration = done
            .duration
            .or_else(|| self.elapsed_secs(now))
            .unwrap_or(self.duration);

        self.recording_started_at = None;
        self.duration = duration;
        self.apply_transcript_update(&done.text, None, now);
        self.reset_summary();
        duration
    }

    /// Switch panes; the summary pane is only reachable when it is available
    pub fn select_view(&mut self, view: ActiveView) -> bool {
        if view == ActiveView::Summary && self.summary_tab() != SummaryTab::Available {
            return false;
        }
        self.active_view = view;
        true
    }

    /// Clear the summary and return to `Idle`
    pub fn reset_summary(&mut self) {
        if self.summary.take().is_some() {
            self.touch();
        }
        self.summary_state = SummaryState::Idle;
        self.summary_epoch += 1;
    }

    pub fn should_auto_summarize(&self) -> bool {
        self.active_view == ActiveView::Summary
            && transcript_len(&self.transcript_text) > MIN_SUMMARY_CHARS
            && self.summary.is_none()
            && self.summary_state == SummaryState::Idle
    }

    /// Move to `Loading` if nothing is in flight. Returns the epoch and the
    /// transcript to summarize, or `None` if a cycle is already running.
    pub fn begin_summary(&mut self) -> Option<(u64, String)> {
        if self.summary_state.is_loading() {
            return None;
        }
        self.summary_state = SummaryState::Loading;
        Some((self.summary_epoch, self.transcript_text.clone()))
    }

    /// Store a finished summary unless it was made stale by a reset
    pub fn finish_summary(&mut self, epoch: u64, summary: Summary) -> bool {
        if epoch != self.summary_epoch || !self.summary_state.is_loading() {
            return false;
        }
        self.summary = Some(summary);
        self.summary_state = SummaryState::Ready;
        self.touch();
        true
    }

    pub fn fail_summary(&mut self, epoch: u64, message: String) -> bool {
        if epoch != self.summary_epoch {
            return false;
        }
        self.summary_state = SummaryState::Failed(message);
        true
    }

    pub fn set_note_text(&mut self, text: &str) {
        if text != self.note_text {
            self.note_text = text.to_string();
            self.touch();
        }
    }

    pub fn set_title(&mut self, title: &str) {
        if title != self.title {
            self.title = title.to_string();
            self.touch();
        }
    }

    fn fallback_title(&self) -> String {
        self.persisted_title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    /// Finish title editing
    pub fn commit_title(&mut self) -> TitleCommit {
        self.editing_title = false;

        if self.title.trim().is_empty() {
            let fallback = self.fallback_title();
            self.set_title(&fallback);
            return TitleCommit::Reverted;
        }

        if self.identifier.is_none() || self.persisted_title.as_deref() == Some(self.title.as_str()) {
            return TitleCommit::Unchanged;
        }

        TitleCommit::Save
    }

    /// Abandon title editing
    pub fn cancel_title_edit(&mut self) {
        self.editing_title = false;
        let fallback = self.fallback_title();
        self.set_title(&fallback);
    }

    /// Title to persist; never blank
    pub fn title_for_save(&self) -> String {
        if self.title.trim().is_empty() {
            self.fallback_title()
        } else {
            self.title.clone()
        }
    }

    /// Adopt the identifier from a successful save (create once, update after)
    pub fn adopt_identifier(&mut self, id: &str) -> bool {
        if self.identifier.is_none() {
            self.identifier = Some(id.to_string());
            return true;
        }
        false
    }
}
