//! Configuration for Estuary provider adapters
//!
//! Providers are declared in a TOML file, keyed by name. Raw config text is
//! run through `{{ env.VAR }}` expansion before deserialization so secrets
//! stay out of the file itself.

#![allow(clippy::must_use_candidate)]

mod env;
pub mod providers;

use std::path::Path;

use serde::Deserialize;

pub use providers::{ModelEntry, ProviderConfig};

/// Top-level Estuary configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider configurations keyed by name
    #[serde(default)]
    pub providers: indexmap::IndexMap<String, ProviderConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a provider declares invalid model metadata
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, provider) in &self.providers {
            provider
                .validate()
                .map_err(|e| anyhow::anyhow!("invalid provider '{name}': {e}"))?;
        }
        Ok(())
    }
}
