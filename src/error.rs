// src/error.rs
//! Error types for client construction and configuration.
//!
//! The credential operations themselves never return these errors; they render
//! them into the `Failure` variant of their outcome. `ClientError` is what the
//! setup path (loading settings, building the HTTP client, resolving the
//! server URL) reports.

use thiserror::Error;

/// Result type for client setup operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while configuring or assembling the credential client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Layered configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A required setting is absent
    #[error("Missing configuration setting: {0}")]
    MissingSetting(String),

    /// A setting is present but unusable
    #[error("Invalid configuration setting {setting}: {issue}")]
    InvalidSetting { setting: String, issue: String },

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The credential record could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The credential endpoint could not be derived from the base URL
    #[error("Invalid credential endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}
