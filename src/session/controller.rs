use super::config::SessionConfig;
use super::host::ViewHost;
use super::link::keyword_search_url;
use super::notice::StatusNotice;
use super::persistence::{snapshot, AfterSave, RecordOverrides, SaveOrigin, SaveOutcome};
use super::record::{ActiveView, SessionRecord, SignalOutcome, SummaryTab, TitleCommit};
use super::summary::{
    keywords_prompt, parse_keywords, summary_prompt, transcript_len, Summary, SummaryState,
    MIN_SUMMARY_CHARS, TOO_SHORT_ERROR,
};
use crate::store::NotebookStore;
use crate::summarizer::Summarizer;
use crate::transcription::{CompletedTranscript, RecordingSignal, Transcriber, TranscriptionEvent};
use chrono::Utc;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// External collaborators a session talks to
#[derive(Clone)]
pub struct SessionServices {
    pub transcriber: Arc<dyn Transcriber>,
    pub summarizer: Arc<dyn Summarizer>,
    pub store: Arc<dyn NotebookStore>,
    pub host: Arc<dyn ViewHost>,
}

/// Read-only view of the session for the control surface
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub identifier: Option<String>,
    pub title: String,
    pub editing_title: bool,
    pub note_text: String,
    pub transcript_text: String,
    pub has_transcript: bool,
    pub is_recording: bool,
    pub duration_secs: u64,
    pub summary: Option<Summary>,
    pub summary_state: SummaryState,
    pub active_view: ActiveView,
    pub summary_tab: SummaryTab,
    pub recently_saved: bool,
    pub status: Option<String>,
}

struct Shared {
    config: SessionConfig,
    record: Mutex<SessionRecord>,
    services: SessionServices,
    notice: StatusNotice,
    /// Background summary cycles and saves
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// Coordinates recording, transcript, summary and persistence for one notebook view.
///
/// Every handler takes the record lock, mutates, and releases it before any
/// external call is awaited.
#[derive(Clone)]
pub struct SessionController {
    shared: Arc<Shared>,
}

impl SessionController {
    pub fn new(config: SessionConfig, record: SessionRecord, services: SessionServices) -> Self {
        info!(
            "Creating notebook session: {} (notebook: {:?})",
            config.session_id, record.identifier
        );

        Self {
            shared: Arc::new(Shared {
                config,
                record: Mutex::new(record),
                services,
                notice: StatusNotice::new(),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.shared.config.session_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let status = self.shared.notice.current().await;
        let record = self.shared.record.lock().await;

        SessionSnapshot {
            session_id: self.shared.config.session_id.clone(),
            identifier: record.identifier.clone(),
            title: record.title.clone(),
            editing_title: record.editing_title,
            note_text: record.note_text.clone(),
            transcript_text: record.transcript_text.clone(),
            has_transcript: record.has_transcript(),
            is_recording: record.is_recording,
            duration_secs: record.current_duration(Instant::now()),
            summary: record.summary.clone(),
            summary_state: record.summary_state.clone(),
            active_view: record.active_view,
            summary_tab: record.summary_tab(),
            recently_saved: record.recently_saved(),
            status,
        }
    }

    pub async fn status(&self) -> Option<String> {
        self.shared.notice.current().await
    }

    /// Dispatch one event from the transcription subsystem
    pub async fn handle_event(&self, event: TranscriptionEvent) {
        match event {
            TranscriptionEvent::Status { text } => self.on_status_signal(&text).await,
            TranscriptionEvent::Signal { signal } => self.on_recording_signal(signal).await,
            TranscriptionEvent::Transcript { text, recording } => {
                self.on_transcript_update(&text, recording).await
            }
            TranscriptionEvent::Complete(done) => {
                self.on_transcript_complete(done).await;
            }
        }
    }

    // ------------------------------------------------------------------
    // Recording
    // ------------------------------------------------------------------

    /// Free-text status from the microphone component
    pub async fn on_status_signal(&self, text: &str) {
        self.shared.notice.show(text).await;
        self.on_recording_signal(RecordingSignal::classify(text)).await;
    }

    pub async fn on_recording_signal(&self, signal: RecordingSignal) {
        let mut record = self.shared.record.lock().await;
        let outcome = record.apply_signal(&signal, Instant::now());

        match outcome {
            SignalOutcome::Started => {
                info!("Recording started - switching to transcript view");

                // The stored summary belongs to the previous recording
                if record.identifier.is_some() {
                    let overrides = RecordOverrides::new()
                        .clear_summary()
                        .duration(record.duration);
                    drop(record);
                    let this = self.clone();
                    self.spawn_tracked(async move {
                        let outcome = this
                            .persist(overrides, AfterSave::Stay, SaveOrigin::Background)
                            .await;
                        debug!("Cleared stored summary: {:?}", outcome);
                    })
                    .await;
                }
            }
            SignalOutcome::AlreadyRecording => {
                debug!("Start signal while already recording");
            }
            SignalOutcome::Stopped(duration) => {
                info!("Recording stopped (duration: {:?}s)", duration);
            }
            SignalOutcome::Info(text) => {
                debug!("Status: {}", text);
            }
        }
    }

    /// Turn recording off and give the subsystem `grace` to release its
    /// connection. Returns false if nothing was recording.
    pub async fn force_stop(&self, grace: Duration) -> bool {
        {
            let mut record = self.shared.record.lock().await;
            if !record.is_recording {
                return false;
            }
            let duration = record.stop_recording(Instant::now());
            info!("Force-stopping recording (duration: {:?}s)", duration);
        }

        if let Err(e) = self.shared.services.transcriber.stop().await {
            error!(
                "Failed to stop {}: {:#}",
                self.shared.services.transcriber.name(),
                e
            );
        }

        tokio::time::sleep(grace).await;
        true
    }

    /// Ask the subsystem to start; recording begins when it signals back
    pub async fn request_start(&self) {
        if let Err(e) = self.shared.services.transcriber.start().await {
            error!("Failed to start transcription: {:#}", e);
            self.flash(format!("Could not start recording: {}", e)).await;
        }
    }

    pub async fn request_stop(&self) {
        if let Err(e) = self.shared.services.transcriber.stop().await {
            error!("Failed to stop transcription: {:#}", e);
            self.flash(format!("Could not stop recording: {}", e)).await;
        }
    }

    // ------------------------------------------------------------------
    // Transcript
    // ------------------------------------------------------------------

    /// Streaming transcript text. A `Some(false)` hint can end a recording
    /// but nothing here can start one.
    pub async fn on_transcript_update(&self, text: &str, recording_hint: Option<bool>) {
        {
            let mut record = self.shared.record.lock().await;
            if record.apply_transcript_update(text, recording_hint, Instant::now()) {
                info!("Recording stopped by transcript update");
            }
        }
        self.maybe_trigger_summary().await;
    }

    /// Final transcript for a recording; saved straight away
    pub async fn on_transcript_complete(&self, done: CompletedTranscript) -> SaveOutcome {
        if done.text.trim().is_empty() {
            info!("Nothing to save - transcript is empty");
            return SaveOutcome::Skipped;
        }

        let duration = {
            let mut record = self.shared.record.lock().await;
            record.commit_transcript(&done, Instant::now())
        };
        info!(
            "Complete transcript received ({} chars, {}s)",
            done.text.len(),
            duration
        );

        self.shared.notice.show("Saving transcript...").await;
        let overrides = RecordOverrides::new()
            .clear_summary()
            .duration(duration)
            .date(done.date.unwrap_or_else(Utc::now));
        let outcome = self.persist(overrides, AfterSave::Stay, SaveOrigin::User).await;

        match &outcome {
            SaveOutcome::Saved(_) => self.flash("Transcript saved").await,
            SaveOutcome::Failed(_) => self.flash("Error saving transcript").await,
            _ => {}
        }

        self.maybe_trigger_summary().await;
        outcome
    }

    // ------------------------------------------------------------------
    // Note and title
    // ------------------------------------------------------------------

    pub async fn set_note_text(&self, text: &str) {
        self.shared.record.lock().await.set_note_text(text);
    }

    pub async fn begin_title_edit(&self) {
        self.shared.record.lock().await.editing_title = true;
    }

    pub async fn set_title(&self, title: &str) {
        self.shared.record.lock().await.set_title(title);
    }

    /// Title input lost focus (or Enter)
    pub async fn commit_title(&self) -> SaveOutcome {
        let commit = self.shared.record.lock().await.commit_title();
        if commit != TitleCommit::Save {
            return SaveOutcome::Skipped;
        }

        self.shared.notice.show("Saving title...").await;
        let outcome = self
            .persist(RecordOverrides::new(), AfterSave::Stay, SaveOrigin::User)
            .await;
        match &outcome {
            SaveOutcome::Saved(_) => self.flash("Title saved").await,
            SaveOutcome::Failed(_) => self.flash("Error saving title").await,
            _ => {}
        }
        outcome
    }

    /// Escape while editing the title
    pub async fn cancel_title_edit(&self) {
        self.shared.record.lock().await.cancel_title_edit();
    }

    // ------------------------------------------------------------------
    // Views and summary
    // ------------------------------------------------------------------

    /// Switch panes. Returns false if the summary pane is not reachable.
    pub async fn select_view(&self, view: ActiveView) -> bool {
        let switched = self.shared.record.lock().await.select_view(view);
        if !switched {
            debug!("Summary view not available");
            return false;
        }
        self.maybe_trigger_summary().await;
        true
    }

    /// Drop the current summary so the next visit to the summary pane
    /// generates a fresh one
    pub async fn regenerate_summary(&self) {
        self.shared.record.lock().await.reset_summary();
        info!("Summary reset for regeneration");
        self.maybe_trigger_summary().await;
    }

    /// Run one summary cycle now, regardless of the active pane
    pub async fn generate_summary(&self) {
        let started = {
            let mut record = self.shared.record.lock().await;
            if transcript_len(&record.transcript_text) <= MIN_SUMMARY_CHARS {
                record.summary_state = SummaryState::Failed(TOO_SHORT_ERROR.to_string());
                return;
            }
            record.begin_summary()
        };

        if let Some((epoch, transcript)) = started {
            self.run_summary_cycle(epoch, transcript).await;
        }
    }

    async fn maybe_trigger_summary(&self) {
        let started = {
            let mut record = self.shared.record.lock().await;
            if !record.should_auto_summarize() {
                return;
            }
            record.begin_summary()
        };

        if let Some((epoch, transcript)) = started {
            let this = self.clone();
            self.spawn_tracked(async move { this.run_summary_cycle(epoch, transcript).await })
                .await;
        }
    }

    async fn run_summary_cycle(&self, epoch: u64, transcript: String) {
        info!("Generating summary ({} chars)", transcript.len());
        let summarizer = &self.shared.services.summarizer;

        let summary_prompt = summary_prompt(&transcript);
        let keywords_prompt = keywords_prompt(&transcript);
        let result = tokio::try_join!(
            summarizer.summarize(&summary_prompt),
            summarizer.summarize(&keywords_prompt)
        );

        let summary = match result {
            Ok((summary, keywords)) => Summary {
                text: summary.trim().to_string(),
                keywords: parse_keywords(keywords.trim()),
            },
            Err(e) => {
                error!("Error generating summary: {}", e);
                let mut record = self.shared.record.lock().await;
                record.fail_summary(epoch, format!("Failed to generate summary: {}", e));
                return;
            }
        };

        let applied = self
            .shared
            .record
            .lock()
            .await
            .finish_summary(epoch, summary.clone());
        if !applied {
            info!("Discarding stale summary");
            return;
        }

        info!("Summary ready ({} keywords), saving", summary.keywords.len());
        self.shared.notice.show("Saving summary...").await;
        let outcome = self
            .persist(
                RecordOverrides::new().summary(summary),
                AfterSave::Stay,
                SaveOrigin::Background,
            )
            .await;
        match outcome {
            SaveOutcome::Saved(_) => self.flash("Summary saved").await,
            SaveOutcome::Failed(_) => self.flash("Error saving summary").await,
            _ => {}
        }
    }

    /// Search link for a keyword, handed to the host
    pub async fn open_keyword(&self, keyword: &str) -> Option<String> {
        let summary_text = {
            let record = self.shared.record.lock().await;
            record.summary.as_ref().map(|s| s.text.clone())
        };

        let url = keyword_search_url(
            &self.shared.config.search_url,
            keyword,
            summary_text.as_deref(),
        )?;
        self.shared.services.host.open_link(&url);
        Some(url)
    }

    // ------------------------------------------------------------------
    // Saving and leaving
    // ------------------------------------------------------------------

    /// The primary Save action: persist and return to the list
    pub async fn save(&self) -> SaveOutcome {
        let (recording, captured_duration) = {
            let record = self.shared.record.lock().await;
            (record.is_recording, record.current_duration(Instant::now()))
        };

        let outcome = if recording {
            self.shared
                .notice
                .show("Stopping recording and saving notebook...")
                .await;
            self.force_stop(self.shared.config.save_grace_delay).await;

            {
                let mut record = self.shared.record.lock().await;
                if record.transcript_text.trim().is_empty() && record.note_text.trim().is_empty() {
                    drop(record);
                    self.flash("Nothing to save yet").await;
                    return SaveOutcome::NothingToSave;
                }
                // Stopped mid-recording; any summary is stale
                record.reset_summary();
            }

            self.shared.notice.show("Saving notebook...").await;
            let overrides = RecordOverrides::new()
                .clear_summary()
                .duration(captured_duration)
                .date(Utc::now());
            self.persist(overrides, AfterSave::NavigateBack, SaveOrigin::User)
                .await
        } else {
            if self.shared.record.lock().await.recently_saved() {
                info!("Nothing changed since last save - navigating back");
                self.shared.services.host.navigate_back();
                return SaveOutcome::Unchanged;
            }

            self.shared.notice.show("Saving notebook...").await;
            self.persist(
                RecordOverrides::new().date(Utc::now()),
                AfterSave::NavigateBack,
                SaveOrigin::User,
            )
            .await
        };

        if let SaveOutcome::Failed(message) = &outcome {
            self.shared
                .notice
                .flash(
                    format!("Error saving notebook: {}", message),
                    self.shared.config.error_notice_ttl,
                )
                .await;
        }
        outcome
    }

    /// Leave the view without saving
    pub async fn leave(&self) {
        let recording = self.shared.record.lock().await.is_recording;
        if recording {
            self.shared.notice.show("Stopping recording...").await;
            self.force_stop(self.shared.config.leave_grace_delay).await;
        }
        self.shared.services.host.navigate_back();
    }

    /// Build the payload from current state, save it, and reconcile the
    /// returned identifier. The session is only touched on success.
    pub async fn persist(
        &self,
        overrides: RecordOverrides,
        after: AfterSave,
        origin: SaveOrigin,
    ) -> SaveOutcome {
        let snapshot = {
            let record = self.shared.record.lock().await;
            snapshot(&record, &overrides, Instant::now())
        };

        let Some(snapshot) = snapshot else {
            if origin == SaveOrigin::Background {
                warn!("Skipping background save: No userId provided");
                self.shared.notice.clear().await;
                return SaveOutcome::MissingUser;
            }
            error!("Cannot save note: No userId provided");
            self.shared.notice.clear().await;
            self.shared
                .services
                .host
                .alert("Cannot save note: No user ID provided");
            return SaveOutcome::MissingUser;
        };

        let title = snapshot.record.title.clone();
        match self.shared.services.store.save(snapshot.record).await {
            Ok(id) => {
                {
                    let mut record = self.shared.record.lock().await;
                    if record.adopt_identifier(&id) {
                        info!("Adopted notebook id {}", id);
                    } else if record.identifier.as_deref() != Some(id.as_str()) {
                        warn!(
                            "Store returned id {} but session already uses {:?}",
                            id, record.identifier
                        );
                    }
                    record.persisted_title = Some(title);
                    record.mark_saved(snapshot.revision);
                }

                if after == AfterSave::NavigateBack {
                    self.shared.services.host.navigate_back();
                }
                SaveOutcome::Saved(id)
            }
            Err(e) => {
                error!("Error saving notebook: {}", e);
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    /// Wait for background summary cycles and saves to finish
    pub async fn settle(&self) {
        loop {
            let pending = std::mem::take(&mut *self.shared.tasks.lock().await);
            if pending.is_empty() {
                break;
            }
            for task in pending {
                if let Err(e) = task.await {
                    error!("Background session task panicked: {}", e);
                }
            }
        }
    }

    async fn spawn_tracked<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.shared.tasks.lock().await;
        tasks.retain(|t| !t.is_finished());
        tasks.push(tokio::spawn(future));
    }

    async fn flash(&self, message: impl Into<String>) {
        self.shared
            .notice
            .flash(message, self.shared.config.notice_ttl)
            .await;
    }
}
