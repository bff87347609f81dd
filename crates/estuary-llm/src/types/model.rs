use estuary_config::ModelEntry;
use serde::{Deserialize, Serialize};

/// Capability metadata for a model, as declared in provider configuration
///
/// `None` means the model makes no declaration either way. The request
/// builder distinguishes "declared true", "declared false", and
/// "undeclared": verbosity requires an explicit `Some(true)`, while
/// temperature is only withheld on an explicit `Some(false)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier sent on the wire
    pub id: String,
    /// Whether the model accepts `text.verbosity`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_verbosity: Option<bool>,
    /// Whether the model accepts `temperature`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_temperature: Option<bool>,
    /// Output token cap forwarded as `max_output_tokens`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Service tiers the model may be requested under
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_tiers: Vec<String>,
}

impl ModelInfo {
    /// Build model info from a configured model entry
    pub fn from_entry(id: impl Into<String>, entry: &ModelEntry) -> Self {
        Self {
            id: id.into(),
            supports_verbosity: entry.supports_verbosity,
            supports_temperature: entry.supports_temperature,
            max_output_tokens: entry.max_output_tokens,
            service_tiers: entry.service_tiers.clone(),
        }
    }

    /// Model info with only an id and no capability declarations
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Whether the requested tier may be sent for this model
    ///
    /// The literal `"default"` tier is always allowed; anything else must
    /// appear in the model's declared tier set.
    pub fn allows_tier(&self, tier: &str) -> bool {
        tier == "default" || self.service_tiers.iter().any(|t| t == tier)
    }
}
