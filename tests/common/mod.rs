// Shared mocks for session integration tests
#![allow(dead_code)]

use loqa_notebook::session::{SessionConfig, SessionController, SessionRecord, SessionServices, ViewHost};
use loqa_notebook::{NotebookRecord, NotebookStore, ServiceError, Summarizer, Transcriber};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FOX: &str = "The quick brown fox jumps over the lazy dog and this sentence exceeds one hundred characters for testing purposes.";

#[derive(Default)]
pub struct MockTranscriber {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
}

#[async_trait::async_trait]
impl Transcriber for MockTranscriber {
    async fn start(&self) -> anyhow::Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "mock-transcriber"
    }
}

pub struct MockSummarizer {
    pub summary: String,
    pub keywords: String,
    pub fail: AtomicBool,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl MockSummarizer {
    pub fn new(summary: &str, keywords: &str) -> Self {
        Self {
            summary: summary.to_string(),
            keywords: keywords.to_string(),
            fail: AtomicBool::new(false),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::ServerError {
                status: 503,
                message: "model overloaded".to_string(),
            });
        }
        if prompt.starts_with("Extract") {
            Ok(self.keywords.clone())
        } else {
            Ok(self.summary.clone())
        }
    }
}

pub struct MockStore {
    pub saves: Mutex<Vec<NotebookRecord>>,
    pub fail: AtomicBool,
    pub next_id: String,
    /// Time each save takes, in milliseconds
    pub delay_ms: AtomicU64,
}

impl MockStore {
    pub fn new(next_id: &str) -> Self {
        Self {
            saves: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            next_id: next_id.to_string(),
            delay_ms: AtomicU64::new(0),
        }
    }

    pub fn slow(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn saves(&self) -> Vec<NotebookRecord> {
        self.saves.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl NotebookStore for MockStore {
    async fn save(&self, record: NotebookRecord) -> Result<String, ServiceError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::ServerError {
                status: 500,
                message: "Database error".to_string(),
            });
        }
        let id = record.note_id.clone().unwrap_or_else(|| self.next_id.clone());
        self.saves.lock().unwrap().push(record);
        Ok(id)
    }
}

#[derive(Default)]
pub struct MockHost {
    pub navigations: AtomicUsize,
    pub alerts: Mutex<Vec<String>>,
    pub links: Mutex<Vec<String>>,
}

impl MockHost {
    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }
}

impl ViewHost for MockHost {
    fn navigate_back(&self) {
        self.navigations.fetch_add(1, Ordering::SeqCst);
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn open_link(&self, url: &str) {
        self.links.lock().unwrap().push(url.to_string());
    }
}

pub struct Harness {
    pub controller: SessionController,
    pub transcriber: Arc<MockTranscriber>,
    pub summarizer: Arc<MockSummarizer>,
    pub store: Arc<MockStore>,
    pub host: Arc<MockHost>,
}

pub fn harness_with(record: SessionRecord, summarizer: MockSummarizer) -> Harness {
    let transcriber = Arc::new(MockTranscriber::default());
    let summarizer = Arc::new(summarizer);
    let store = Arc::new(MockStore::new("note-1"));
    let host = Arc::new(MockHost::default());

    let services = SessionServices {
        transcriber: transcriber.clone(),
        summarizer: summarizer.clone(),
        store: store.clone(),
        host: host.clone(),
    };
    let config = SessionConfig {
        session_id: "test-session".to_string(),
        ..SessionConfig::default()
    };

    Harness {
        controller: SessionController::new(config, record, services),
        transcriber,
        summarizer,
        store,
        host,
    }
}

pub fn harness() -> Harness {
    harness_with(
        SessionRecord::new(Some("user-1".to_string())),
        MockSummarizer::new("A fox jumps over a dog.", "fox, dog, quick, lazy"),
    )
}
