//! Notebook session management
//!
//! This module provides the `SessionController` that keeps one notebook
//! view consistent while these happen concurrently:
//! - Recording start/stop signals and duration tracking
//! - Streaming and final transcript text
//! - Summary and keyword generation (deduplicated, stale results dropped)
//! - Saving to the notebook store and adopting the returned identifier

mod config;
mod controller;
mod host;
mod link;
mod notice;
mod persistence;
mod record;
mod summary;

pub use config::SessionConfig;
pub use controller::{SessionController, SessionServices, SessionSnapshot};
pub use host::{LoggingHost, ViewHost};
pub use link::keyword_search_url;
pub use notice::StatusNotice;
pub use persistence::{AfterSave, RecordOverrides, SaveOrigin, SaveOutcome};
pub use record::{ActiveView, SessionRecord, SummaryTab, DEFAULT_TITLE, NEW_NOTE_TITLE};
pub use summary::{parse_keywords, Summary, SummaryState, MIN_SUMMARY_CHARS};
