use crate::session::SessionConfig;
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub transcription: TranscriptionConfig,
    pub summarizer: SummarizerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionConfig {
    pub nats_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default = "default_summarizer_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_summarizer_model")]
    pub model: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Session timing knobs; all optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSettings {
    pub save_grace_delay_ms: Option<u64>,
    pub leave_grace_delay_ms: Option<u64>,
    pub notice_ttl_ms: Option<u64>,
    pub error_notice_ttl_ms: Option<u64>,
    pub search_url: Option<String>,
}

fn default_summarizer_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_summarizer_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl SessionSettings {
    /// Session config with these settings applied over the defaults
    pub fn to_session_config(&self) -> SessionConfig {
        let defaults = SessionConfig::default();
        let ms = |value: Option<u64>, fallback: Duration| {
            value.map(Duration::from_millis).unwrap_or(fallback)
        };

        SessionConfig {
            save_grace_delay: ms(self.save_grace_delay_ms, defaults.save_grace_delay),
            leave_grace_delay: ms(self.leave_grace_delay_ms, defaults.leave_grace_delay),
            notice_ttl: ms(self.notice_ttl_ms, defaults.notice_ttl),
            error_notice_ttl: ms(self.error_notice_ttl_ms, defaults.error_notice_ttl),
            search_url: self.search_url.clone().unwrap_or(defaults.search_url),
            session_id: defaults.session_id,
        }
    }
}

impl Config {
    /// Load from `path` (any format the `config` crate knows, extension
    /// optional), then apply `LOQA_NOTEBOOK__SECTION__KEY` overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("LOQA_NOTEBOOK").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
