use thiserror::Error;
use uuid::Uuid;

/// Failure of a single cover request. Absorbed by the strategies, never
/// returned to the caller of the facade.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Upstream request was cancelled")]
    UpstreamCancelled,

    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl From<FetchError> for CoverError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Transport(e) => CoverError::HttpClientError(e),
            FetchError::Decode(e) => CoverError::SerializationError(e),
        }
    }
}

impl CoverError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CoverError::UpstreamCancelled)
    }
}

pub type Result<T> = std::result::Result<T, CoverError>;
