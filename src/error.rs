use thiserror::Error;

/// Failures from the external services the session talks to
/// (summarizer, notebook store, transcription control).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::Other(format!("{:#}", err))
    }
}
