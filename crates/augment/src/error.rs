use thiserror::Error;

#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Completion service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Completion service timed out")]
    Timeout,
    #[error("Completion service returned no text")]
    EmptyResponse,
    #[error("No JSON object in completion | Raw: {0}")]
    NoJson(String),
    #[error("Invalid JSON from completion service: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AugmentError>;

/// Shorten service output for logs and error messages.
pub(crate) fn truncate(raw: &str) -> String {
    const LIMIT: usize = 200;
    match raw.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &raw[..idx]),
        None => raw.to_string(),
    }
}
