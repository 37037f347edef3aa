pub mod app_config;
pub mod brands;
pub mod config;
pub mod content;
pub mod hashtags;

pub use app_config::{AppConfig, Environment};
pub use brands::{load_brand_presets, BrandPresets, BrandPresetsFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{
    BusinessType, ContentDraft, ContentType, DraftStatus, Engagement, Language, LibraryItem,
    LibraryPatch, NewDraft, Overlay, Platform, StoryboardShot, Tone,
};
pub use hashtags::{format_hashtags, strip_hash_marks};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read brand presets file {path}: {source}")]
    BrandPresetsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brand presets file: {0}")]
    BrandPresetsParse(#[from] serde_yaml::Error),

    #[error("brand presets validation failed: {0}")]
    Validation(String),
}

/// Errors raised when parsing user-supplied domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown platform '{0}' (expected instagram, tiktok, facebook or twitter)")]
    InvalidPlatform(String),

    #[error("unknown content type '{0}' (expected image or video)")]
    InvalidContentType(String),

    #[error("unknown language '{0}' (expected en or am)")]
    InvalidLanguage(String),

    #[error("unknown tone '{0}'")]
    InvalidTone(String),

    #[error("unknown business type '{0}'")]
    InvalidBusinessType(String),

    #[error("unknown draft status '{0}' (expected draft, scheduled or published)")]
    InvalidStatus(String),
}
