//! `OpenAI` Responses API wire format
//!
//! The outbound request is fully typed. Inbound stream events are kept as
//! untyped `serde_json::Value` records: the event vocabulary is open-ended
//! and the normalizer classifies shapes through ordered predicates rather
//! than a closed deserialization enum.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{ReasoningEffort, Verbosity};

/// Responses API request body
///
/// Every optional field is either fully absent or present with a valid
/// value, never present-but-null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesRequest {
    /// Model identifier
    pub model: String,
    /// Conversation input items, already converted to the service's
    /// content-part vocabulary by the conversation formatter
    pub input: Vec<Value>,
    /// Whether to stream the response; forced true by the HTTP fallback
    pub stream: bool,
    /// Server-side response storage
    pub store: bool,
    /// System prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Reasoning configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningParams>,
    /// Text output configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextParams>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Continuation token from a previous response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
    /// Requested service tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<String>,
    /// Opaque request metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// `reasoning` block of a Responses API request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningParams {
    /// Requested effort level
    pub effort: ReasoningEffort,
    /// Summary mode, only ever `"auto"` here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// `text` block of a Responses API request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextParams {
    /// Output verbosity
    pub verbosity: Verbosity,
}

/// Type tag of an untyped stream event
///
/// Prefers an explicit `type` field, falling back to `event`.
pub fn event_type(event: &Value) -> Option<&str> {
    event
        .get("type")
        .and_then(Value::as_str)
        .or_else(|| event.get("event").and_then(Value::as_str))
}

/// Non-empty string field accessor
pub fn non_empty_str<'a>(event: &'a Value, field: &str) -> Option<&'a str> {
    event.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_fields_absent_not_null() {
        let request = ResponsesRequest {
            model: "gpt-5".to_owned(),
            input: vec![],
            stream: true,
            store: true,
            instructions: None,
            reasoning: None,
            text: None,
            temperature: None,
            max_output_tokens: None,
            previous_response_id: None,
            service_tier: None,
            metadata: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert!(object.contains_key("model"));
        assert!(object.contains_key("input"));
        assert!(object.contains_key("stream"));
        assert!(object.contains_key("store"));
    }

    #[test]
    fn event_type_prefers_type_over_event() {
        let both = json!({"type": "response.output_text.delta", "event": "other"});
        assert_eq!(event_type(&both), Some("response.output_text.delta"));

        let event_only = json!({"event": "response.completed"});
        assert_eq!(event_type(&event_only), Some("response.completed"));

        assert_eq!(event_type(&json!({"delta": "hi"})), None);
    }

    #[test]
    fn non_empty_str_filters_empty() {
        let event = json!({"delta": "", "name": "read_file"});
        assert_eq!(non_empty_str(&event, "delta"), None);
        assert_eq!(non_empty_str(&event, "name"), Some("read_file"));
    }
}
