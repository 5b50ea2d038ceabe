use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a notebook session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "notebook-6f1c...")
    pub session_id: String,

    /// Wait after force-stopping a recording before saving
    /// Default: 800ms
    pub save_grace_delay: Duration,

    /// Wait after force-stopping a recording before leaving the view
    /// Default: 500ms
    pub leave_grace_delay: Duration,

    /// How long flash status messages stay visible
    pub notice_ttl: Duration,

    /// How long save error messages stay visible
    pub error_notice_ttl: Duration,

    /// Search page that keyword links point at
    pub search_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("notebook-{}", uuid::Uuid::new_v4()),
            save_grace_delay: Duration::from_millis(800),
            leave_grace_delay: Duration::from_millis(500),
            notice_ttl: Duration::from_secs(2),
            error_notice_ttl: Duration::from_secs(3),
            search_url: "https://www.perplexity.ai/search".to_string(),
        }
    }
}
