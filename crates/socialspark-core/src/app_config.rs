use std::path::PathBuf;

use crate::content::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub poll_interval_ms: u64,
    pub poll_max_interval_ms: u64,
    /// `None` means the poller waits until the task is terminal or cancelled.
    pub poll_deadline_secs: Option<u64>,
    pub store_path: PathBuf,
    pub database_url: Option<String>,
    pub brands_path: PathBuf,
    pub default_language: Language,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.api_url)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("poll_max_interval_ms", &self.poll_max_interval_ms)
            .field("poll_deadline_secs", &self.poll_deadline_secs)
            .field("store_path", &self.store_path)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("brands_path", &self.brands_path)
            .field("default_language", &self.default_language)
            .finish()
    }
}
