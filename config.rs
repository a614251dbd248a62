/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Client configuration, read from TOML.
//!
//! ```toml
//! rpc_url = "https://api.devnet.solana.com"
//! commitment = "finalized"
//! request_timeout_ms = 5000
//! history_page_limit = 500
//! default_scheme = "solana"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ErrorKind;
use crate::locator::DEFAULT_HISTORY_LIMIT;
use crate::registries::protocol::ProtocolScheme;
use crate::services::ledger::Commitment;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionsConfig {
    /// Checked by [`ActionsConfig::validate`]; read it through
    /// [`ActionsConfig::rpc_url`].
    pub rpc_url: String,
    pub commitment: Commitment,
    pub request_timeout_ms: u64,
    /// Signatures requested per history page, 1..=1000.
    pub history_page_limit: usize,
    /// Scheme used when encoding Action URLs.
    pub default_scheme: ProtocolScheme,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: Commitment::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            history_page_limit: DEFAULT_HISTORY_LIMIT,
            default_scheme: ProtocolScheme::default(),
        }
    }
}

impl ActionsConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|error| ConfigError::Parse(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn rpc_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.rpc_url).map_err(|error| {
            ConfigError::Invalid(format!("rpc_url {:?}: {error}", self.rpc_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "rpc_url must be http(s), got {:?}",
                url.scheme()
            )));
        }
        Ok(url)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rpc_url()?;
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        if !(1..=DEFAULT_HISTORY_LIMIT).contains(&self.history_page_limit) {
            return Err(ConfigError::Invalid(format!(
                "history_page_limit must be within 1..={DEFAULT_HISTORY_LIMIT}, got {}",
                self.history_page_limit
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse(String),
    Invalid(String),
    /// Building the HTTP clients from the config failed.
    Client(String),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Config
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read config {path}: {message}"),
            Self::Parse(reason) => write!(f, "invalid config: {reason}"),
            Self::Invalid(reason) => write!(f, "invalid config value: {reason}"),
            Self::Client(reason) => write!(f, "cannot build client: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
