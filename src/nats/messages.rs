use crate::transcription::TranscriptionEvent;
use serde::{Deserialize, Serialize};

/// Microphone command published to the transcription subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Start,
    Stop,
}

/// Control message published to `mic.control.<session>`
#[derive(Debug, Serialize, Deserialize)]
pub struct ControlMessage {
    pub session_id: String,
    pub action: ControlAction,
    pub timestamp: String, // RFC3339 timestamp
}

/// Event message received on `stt.events.<session>`
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionEventMessage {
    pub session_id: String,
    #[serde(flatten)]
    pub event: TranscriptionEvent,
}
