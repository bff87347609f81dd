use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Configuration for a single upstream provider
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// API key for bearer authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Per-model metadata, keyed by model id
    #[serde(default)]
    pub models: IndexMap<String, ModelEntry>,
}

/// Declared metadata for a model served by a provider
///
/// Absent fields mean the model makes no declaration either way; the
/// request builder treats "declared" and "undeclared" differently for
/// verbosity and temperature.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelEntry {
    /// Whether the model accepts `text.verbosity`
    #[serde(default)]
    pub supports_verbosity: Option<bool>,
    /// Whether the model accepts `temperature`
    #[serde(default)]
    pub supports_temperature: Option<bool>,
    /// Output token cap forwarded as `max_output_tokens`
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    /// Service tiers the model may be requested under
    #[serde(default)]
    pub service_tiers: Vec<String>,
}

impl ProviderConfig {
    /// Validate provider-level invariants
    ///
    /// # Errors
    ///
    /// Returns an error if a model declares an empty tier name or a zero
    /// output token cap
    pub fn validate(&self) -> anyhow::Result<()> {
        for (id, model) in &self.models {
            if model.service_tiers.iter().any(String::is_empty) {
                anyhow::bail!("model '{id}' declares an empty service tier name");
            }
            if model.max_output_tokens == Some(0) {
                anyhow::bail!("model '{id}' declares max_output_tokens = 0");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_entry_declares_nothing() {
        let entry = ModelEntry::default();
        assert_eq!(entry.supports_verbosity, None);
        assert_eq!(entry.supports_temperature, None);
        assert_eq!(entry.max_output_tokens, None);
        assert!(entry.service_tiers.is_empty());
    }

    #[test]
    fn zero_token_cap_rejected() {
        let mut config = ProviderConfig::default();
        config.models.insert(
            "gpt-5".to_owned(),
            ModelEntry {
                max_output_tokens: Some(0),
                ..ModelEntry::default()
            },
        );
        assert!(config.validate().is_err());
    }
}
