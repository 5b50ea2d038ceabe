use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recording lifecycle signal reported by the transcription subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum RecordingSignal {
    /// Microphone is live and audio is being streamed
    Started,
    /// Recording was stopped on request
    Stopped,
    /// Subsystem is idle and prompting the user to start
    IdlePrompt,
    /// Connection to the speech service was lost
    Disconnected,
    /// Anything else; shown to the user verbatim
    Info(String),
}

impl RecordingSignal {
    /// Classify a free-text status line.
    ///
    /// Checks run in a fixed order so overlapping wording resolves the same
    /// way every time: idle prompt, disconnect, stop, then start. A line that
    /// matches none of them is informational.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();

        if lower.contains("click the microphone to start") {
            RecordingSignal::IdlePrompt
        } else if lower.contains("disconnected") {
            RecordingSignal::Disconnected
        } else if lower.contains("stop") {
            RecordingSignal::Stopped
        } else if lower.contains("start recording") || lower.contains("recording started") {
            RecordingSignal::Started
        } else {
            RecordingSignal::Info(text.to_string())
        }
    }
}

/// Final transcript delivered when the subsystem finishes a recording
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletedTranscript {
    pub text: String,

    /// When the recording happened, if the subsystem knows
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Recording length in seconds, if the subsystem measured it
    #[serde(default)]
    pub duration: Option<u64>,
}

/// Events emitted by the transcription subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptionEvent {
    /// Status line from the microphone component
    Status { text: String },

    /// Typed recording signal
    Signal { signal: RecordingSignal },

    /// Streaming transcript text (full text so far, not a delta)
    Transcript {
        text: String,
        #[serde(default)]
        recording: Option<bool>,
    },

    /// Terminal transcript for the recording
    Complete(CompletedTranscript),
}
