//! Error types for insta-client

use thiserror::Error;

/// insta-client error type
#[derive(Error, Debug)]
pub enum InstagramError {
    #[error("Login failed: {0}")]
    Authentication(String),

    /// The session probe was rejected; consumed by the manager's fallback
    /// to a fresh credential login.
    #[error("Login required")]
    LoginRequired,

    #[error("Bridge API error: {0}")]
    Api(String),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, InstagramError>;
