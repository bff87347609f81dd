use serde::{Deserialize, Serialize};

/// Reasoning effort levels accepted by the Responses API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

/// Output verbosity levels accepted by the Responses API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Low,
    #[default]
    Medium,
    High,
}

/// Caller-supplied options for one request
///
/// Every field is optional; the request builder decides which ones actually
/// reach the wire based on the model's declared capabilities.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Reasoning effort; its presence is what opts the request into the
    /// `reasoning` block
    pub effort: Option<ReasoningEffort>,
    /// Ask for auto-generated reasoning summaries
    pub reasoning_summary: bool,
    /// Requested output verbosity
    pub verbosity: Option<Verbosity>,
    /// Sampling temperature
    pub temperature: Option<f64>,
    /// Requested service tier name
    pub service_tier: Option<String>,
    /// Continuation token from a previous response
    pub previous_response_id: Option<String>,
    /// Server-side storage opt-out; defaults to enabled
    pub store: Option<bool>,
    /// System prompt forwarded as `instructions`
    pub instructions: Option<String>,
    /// Opaque request metadata
    pub metadata: Option<serde_json::Value>,
}
