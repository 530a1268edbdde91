//! insta-core: shared configuration and error types for insta-gateway

pub mod config;
pub mod error;

pub use config::{ApiConfig, AppConfig, Config, InstagramConfig};
pub use error::{Error, Result};
