//! Common error types for iris

use thiserror::Error;

/// Common result type for iris operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration and startup assets
///
/// Request-time failures use the dedicated `ValidationError` and
/// `PredictionError` types instead; nothing here is produced per request.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON asset could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML file could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Feature schema asset is unusable
    #[error("Feature schema error: {0}")]
    Schema(String),

    /// Species catalog is unusable
    #[error("Species catalog error: {0}")]
    Catalog(String),

    /// Model artifact is unusable
    #[error("Model error: {0}")]
    Model(String),
}
