pub mod config;
pub mod error;
pub mod http;
pub mod nats;
pub mod session;
pub mod store;
pub mod summarizer;
pub mod transcription;

pub use config::Config;
pub use error::ServiceError;
pub use http::{create_router, AppState};
pub use nats::NatsTranscriber;
pub use session::{
    ActiveView, SaveOutcome, SessionConfig, SessionController, SessionRecord, SessionServices,
    SessionSnapshot, Summary, SummaryState, ViewHost,
};
pub use store::{HttpNotebookStore, NotebookRecord, NotebookStore, PersistedNotebook};
pub use summarizer::{GeminiSummarizer, Summarizer};
pub use transcription::{CompletedTranscript, RecordingSignal, Transcriber, TranscriptionEvent};
