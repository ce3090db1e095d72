use serde::{Deserialize, Serialize};

use crate::utils::constants::DEFAULT_API_BASE_URL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub environment: String,
    pub enable_logging: bool,
    /// Explicit level name; unset means the environment default
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from compile-time environment variables
    pub fn from_env() -> Self {
        Self {
            api_base_url: option_env!("API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development")
                .to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true")
                .parse()
                .unwrap_or(true),
            log_level: option_env!("LOG_LEVEL").map(str::to_string),
        }
    }

    /// Base URL without a trailing slash, ready for path concatenation
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    /// Level for the console logger. Unset or unknown names fall back to
    /// `Warn` in production and `Info` elsewhere.
    pub fn log_level(&self) -> log::Level {
        let fallback = if self.is_production() {
            log::Level::Warn
        } else {
            log::Level::Info
        };
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(fallback)
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
