//! Common error types.

use thiserror::Error;

/// Main error type for the showcase.
#[derive(Error, Debug)]
pub enum ShowcaseError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Unknown scene: {0}")]
    UnknownScene(String),
}

pub type ShowcaseResult<T> = Result<T, ShowcaseError>;

impl ShowcaseError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }
}
