//! Generative-text service used for summaries and keywords

mod gemini;

pub use gemini::GeminiSummarizer;

use crate::error::ServiceError;

/// Single-shot prompt → text completion
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, ServiceError>;
}
