use thiserror::Error;

/// Failure of a single catalogue request. Never fatal to a check run:
/// the engine logs it and skips the affected book.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP {status} - {reason}")]
    Http { status: u16, reason: String },

    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Transport(String),

    #[error("invalid catalogue response: {0}")]
    Decode(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout
        } else {
            SourceError::Transport(e.to_string())
        }
    }
}
