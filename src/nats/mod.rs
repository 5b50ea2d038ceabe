pub mod client;
pub mod messages;

pub use client::NatsTranscriber;
pub use messages::{ControlAction, ControlMessage, TranscriptionEventMessage};
