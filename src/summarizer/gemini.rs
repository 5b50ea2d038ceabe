//! Google Gemini `generateContent` client.

use super::Summarizer;
use crate::config::SummarizerConfig;
use crate::error::ServiceError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Maximum number of retry attempts for transient failures.
const MAX_RETRIES: u32 = 2;

/// Initial delay between retries (doubles with each attempt).
const INITIAL_RETRY_DELAY_MS: u64 = 500;

pub struct GeminiSummarizer {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiSummarizer {
    pub fn new(config: &SummarizerConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client for GeminiSummarizer")?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout,
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn extract_text(response: &GenerateResponse) -> Result<String, ServiceError> {
        let text: String = response
            .candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ServiceError::InvalidResponse(
                "No text content in Gemini response".into(),
            ));
        }
        Ok(text)
    }

    fn is_retryable_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }
}

#[async_trait::async_trait]
impl Summarizer for GeminiSummarizer {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn summarize(&self, prompt: &str) -> Result<String, ServiceError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let mut retry_delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS);
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                warn!(attempt, delay_ms = retry_delay.as_millis() as u64, "Retrying Gemini request");
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let result = self
                .client
                .post(self.url())
                .query(&[("key", self.api_key.as_str())])
                .json(&body)
                .send()
                .await;

            let response = match result {
                Ok(response) => response,
                Err(e) if e.is_timeout() && attempt >= MAX_RETRIES => {
                    return Err(ServiceError::Timeout(self.timeout));
                }
                Err(e) if Self::is_retryable_error(&e) && attempt < MAX_RETRIES => {
                    warn!(error = %e, "Network error, will retry");
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(ServiceError::Network(e)),
            };

            let status = response.status();
            if status.is_success() {
                let parsed: GenerateResponse = response.json().await.map_err(|e| {
                    ServiceError::InvalidResponse(format!("Failed to parse Gemini response: {}", e))
                })?;
                let text = Self::extract_text(&parsed)?;
                info!(chars = text.len(), "Gemini completion received");
                return Ok(text);
            }

            let status = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            if (500..600).contains(&status) && attempt < MAX_RETRIES {
                warn!(status, "Server error, will retry");
                attempt += 1;
                continue;
            }

            return Err(ServiceError::ServerError { status, message });
        }
    }
}
