//! Configuration management
//!
//! Settings are resolved in the following order:
//! 1. Environment variables
//! 2. insta-gateway.toml configuration file
//! 3. Default values
//!
//! Inside the configuration file, `${VAR_NAME}` expands to the value of the
//! corresponding environment variable.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Service name reported by the root endpoint
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Enable debug behavior
    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            debug: false,
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Port for the HTTP API server
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

/// Instagram client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramConfig {
    /// Base URL of the instagrapi-compatible REST bridge
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// Directory holding per-account session files
    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: String,

    /// Request timeout for bridge calls, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            sessions_dir: default_sessions_dir(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Main configuration for insta-gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    #[serde(default)]
    pub app: AppConfig,

    /// HTTP API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Instagram client settings
    #[serde(default)]
    pub instagram: InstagramConfig,
}

fn default_app_name() -> String {
    "insta-gateway".to_string()
}

fn default_api_port() -> u16 {
    8001
}

fn default_bridge_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_sessions_dir() -> String {
    "sessions".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Expand `${VAR_NAME}` references to environment variable values.
    ///
    /// Unset variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::Error::Config(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let expanded = Self::expand_env_vars(&content);

        let mut config: Config = toml::from_str(&expanded)?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from environment variables over defaults
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Tries `./insta-gateway.toml` first, then falls back to environment
    /// variables only.
    pub fn load() -> crate::Result<Self> {
        if Path::new("insta-gateway.toml").exists() {
            return Self::from_toml_file("insta-gateway.toml");
        }

        Self::from_env()
    }

    /// Overlay environment variables on top of the current values
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("APP_NAME") {
            if !name.is_empty() {
                self.app.name = name;
            }
        }
        if let Ok(debug) = std::env::var("APP_DEBUG") {
            self.app.debug = matches!(debug.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Ok(port) = std::env::var("API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(url) = std::env::var("INSTAGRAM_BRIDGE_URL") {
            if !url.is_empty() {
                self.instagram.bridge_url = url;
            }
        }
        if let Ok(dir) = std::env::var("INSTAGRAM_SESSIONS_DIR") {
            if !dir.is_empty() {
                self.instagram.sessions_dir = dir;
            }
        }
        if let Ok(timeout) = std::env::var("INSTAGRAM_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.instagram.timeout_secs = t;
            }
        }
    }
}
