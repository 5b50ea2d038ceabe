/// The view hosting a session: navigation, blocking alerts and links
pub trait ViewHost: Send + Sync {
    /// Return to the notebook list
    fn navigate_back(&self);

    /// Blocking, user-facing alert
    fn alert(&self, message: &str);

    /// Open a link in a new browsing context
    fn open_link(&self, url: &str);
}

/// Host that only logs; used when no view is attached
pub struct LoggingHost;

impl ViewHost for LoggingHost {
    fn navigate_back(&self) {
        tracing::info!("Navigating back to notebook list");
    }

    fn alert(&self, message: &str) {
        tracing::error!("ALERT: {}", message);
    }

    fn open_link(&self, url: &str) {
        tracing::info!("Opening link: {}", url);
    }
}
