//! Error types for corsprobe

use thiserror::Error;

/// Main error type for corsprobe operations
#[derive(Debug, Error)]
pub enum CorsProbeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Target unreachable: {0}")]
    TargetUnreachable(String),

    #[error("Endpoint list '{0}' not found")]
    EndpointFile(String),

    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),
}

/// Result type alias for corsprobe operations
pub type Result<T> = std::result::Result<T, CorsProbeError>;
