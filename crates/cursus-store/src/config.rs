//! Pinning-service configuration
//!
//! Loaded from TOML, with the auth token overridable from the environment
//! so it can stay out of checked-in files.

use crate::errors::StoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides the configured auth token
pub const TOKEN_ENV_VAR: &str = "CURSUS_PIN_TOKEN";

/// Configuration for the HTTP pinning service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the pinning API (e.g. `https://api.pinata.cloud`)
    pub api_base: String,
    /// Base URL of the retrieval gateway (e.g. `https://gateway.pinata.cloud/ipfs`)
    pub gateway_base: String,
    /// Bearer token for the pinning API
    #[serde(default)]
    pub token: String,
}

impl StoreConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| StoreError::config(format!("read {}: {err}", path.display())))?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|err| StoreError::config(format!("parse {}: {err}", path.display())))?;
        config.merge_with_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.is_empty() {
                self.token = token;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), StoreError> {
        if url::Url::parse(&self.api_base).is_err() {
            return Err(StoreError::config("api_base is not a valid URL"));
        }
        if url::Url::parse(&self.gateway_base).is_err() {
            return Err(StoreError::config("gateway_base is not a valid URL"));
        }
        if self.token.is_empty() {
            return Err(StoreError::config(format!(
                "no auth token configured (set `token` or {TOKEN_ENV_VAR})"
            )));
        }
        Ok(())
    }
}
