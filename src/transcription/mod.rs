//! Transcription subsystem interface
//!
//! The microphone and speech-to-text pipeline live outside this crate. The
//! session only needs to:
//! - Command it to start and stop
//! - Consume its status, transcript and completion events

mod events;

pub use events::{CompletedTranscript, RecordingSignal, TranscriptionEvent};

use anyhow::Result;

/// Control handle for the transcription subsystem
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Ask the subsystem to begin capturing
    async fn start(&self) -> Result<()>;

    /// Ask the subsystem to stop capturing and release its connection
    async fn stop(&self) -> Result<()>;

    /// Get transcriber name for logging
    fn name(&self) -> &str;
}
