// src/settings.rs
//! Layered configuration for the credential client.
//!
//! Settings are read, in increasing precedence, from:
//! 1. an optional `credential-client.{toml,json,yaml}` file in the working directory
//! 2. environment variables prefixed `CREDENTIAL_CLIENT_`, nested keys split by `__`
//!
//! ## Environment Variables
//! - `CREDENTIAL_CLIENT_SERVER_URL`: Authorization server base URL
//! - `CREDENTIAL_CLIENT_REQUEST_TIMEOUT_SECS`: (Optional) per-request timeout, default 30
//! - `CREDENTIAL_CLIENT_USER_AGENT`: (Optional) user agent sent with requests
//! - `CREDENTIAL_CLIENT_VOUCHER__SIGNING_KEY`: HMAC secret for voucher tokens
//! - `CREDENTIAL_CLIENT_VOUCHER__ISSUER`: (Optional) `iss` claim for voucher tokens

use crate::error::{ClientError, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Base name of the optional settings file.
pub const SETTINGS_FILE: &str = "credential-client";

/// Prefix of environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "CREDENTIAL_CLIENT";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolves the authorization server's base URL.
///
/// Injected into the client so that tests and embedders can point it anywhere
/// without touching process-wide configuration.
pub trait ServerUrlResolver: Send + Sync {
    fn base_server_url(&self) -> Result<Url>;
}

/// A fixed base URL.
impl ServerUrlResolver for Url {
    fn base_server_url(&self) -> Result<Url> {
        Ok(self.clone())
    }
}

/// Client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Authorization server base URL, e.g. `https://auth.example.com`
    pub server_url: Option<String>,

    /// Per-request timeout applied by the HTTP transport
    pub request_timeout_secs: u64,

    pub user_agent: String,

    /// Voucher signing configuration
    pub voucher: VoucherSettings,
}

/// Settings consumed by the voucher token generator.
///
/// Both fields stay optional here so that problems are reported by the
/// generator at issuance time, naming the offending setting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VoucherSettings {
    pub signing_key: Option<String>,
    pub issuer: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("credential-session-client/", env!("CARGO_PKG_VERSION")).to_string(),
            voucher: VoucherSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from the settings file and the environment.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if a source cannot be read or a value has
    /// the wrong type.
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(SETTINGS_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Self::from_config(config)
    }

    /// Deserializes settings from an already assembled configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let settings: Settings = config.try_deserialize()?;
        log::debug!(
            "Loaded settings: server_url={:?}, timeout={}s, voucher key configured={}",
            settings.server_url,
            settings.request_timeout_secs,
            settings.voucher.signing_key.is_some()
        );
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ServerUrlResolver for Settings {
    fn base_server_url(&self) -> Result<Url> {
        let raw = self
            .server_url
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ClientError::MissingSetting("server_url".to_string()))?;

        Url::parse(raw.trim()).map_err(|e| ClientError::InvalidSetting {
            setting: "server_url".to_string(),
            issue: e.to_string(),
        })
    }
}
