//! Error types for insta-core

use thiserror::Error;

/// Main error type for insta-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for insta-core
pub type Result<T> = std::result::Result<T, Error>;
