//! Request building and stream event normalization
//!
//! The normalizer classifies one untyped event record at a time through an
//! ordered set of rules, first match wins. Function-call argument fragments
//! are accumulated per call id and emitted as a single tagged-parameter text
//! block when the call completes.

use std::collections::HashMap;

use serde_json::Value;

use crate::protocol::responses::{ReasoningParams, ResponsesRequest, TextParams, event_type, non_empty_str};
use crate::types::{ModelInfo, RequestOptions, StreamChunk, Usage};

const TEXT_DELTA_TYPES: &[&str] = &["response.output_text.delta"];
const REASONING_DELTA_TYPES: &[&str] = &["response.reasoning_text.delta", "response.reasoning_summary_text.delta"];
const COMPLETION_TYPES: &[&str] = &["response.completed", "response.done"];
const USAGE_TYPE: &str = "response.usage";
const CALL_ARGS_DELTA_TYPE: &str = "response.function_call_arguments.delta";
const CALL_ARGS_DONE_TYPE: &str = "response.function_call_arguments.done";
const OUTPUT_ITEM_ADDED_TYPE: &str = "response.output_item.added";
const OUTPUT_ITEM_DONE_TYPE: &str = "response.output_item.done";

/// Outer tag for a completed call whose name never arrived
const FALLBACK_CALL_TAG: &str = "tool_call";

// -- Request building --

/// Build a Responses API request body from model metadata and options
///
/// Pure and deterministic. Conditional fields follow a strict precedence:
/// optional blocks are either fully absent or present with a valid value.
pub fn build_request(model: &ModelInfo, input: Vec<Value>, options: &RequestOptions) -> ResponsesRequest {
    let reasoning = options.effort.map(|effort| ReasoningParams {
        effort,
        summary: options.reasoning_summary.then(|| "auto".to_owned()),
    });

    // Explicit declaration required, not merely truthy metadata.
    let text = (model.supports_verbosity == Some(true)).then(|| TextParams {
        verbosity: options.verbosity.unwrap_or_default(),
    });

    let temperature = if model.supports_temperature == Some(false) {
        None
    } else {
        options.temperature
    };

    let service_tier = options
        .service_tier
        .as_ref()
        .filter(|tier| model.allows_tier(tier))
        .cloned();

    ResponsesRequest {
        model: model.id.clone(),
        input,
        stream: true,
        store: options.store.unwrap_or(true),
        instructions: options.instructions.clone(),
        reasoning,
        text,
        temperature,
        max_output_tokens: model.max_output_tokens,
        previous_response_id: options.previous_response_id.clone(),
        service_tier,
        metadata: options.metadata.clone(),
    }
}

// -- Event normalization --

/// Accumulator state for one in-flight function call
#[derive(Debug, Default)]
struct PendingToolCall {
    /// Recorded on first sighting, sticky afterwards
    name: Option<String>,
    /// Ordered concatenation of argument fragments
    arguments: String,
}

/// Stateful classifier turning raw events into canonical chunks
///
/// Owns the function-call accumulator map for exactly one stream traversal;
/// create a fresh normalizer per request.
#[derive(Debug, Default)]
pub struct EventNormalizer {
    pending: HashMap<String, PendingToolCall>,
}

impl EventNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one event, emitting zero or more chunks in arrival order
    pub fn normalize(&mut self, event: &Value) -> Vec<StreamChunk> {
        let tag = event_type(event);

        if tag.is_some_and(|t| TEXT_DELTA_TYPES.contains(&t)) {
            return non_empty_str(event, "delta")
                .map(|delta| vec![StreamChunk::Text { text: delta.to_owned() }])
                .unwrap_or_default();
        }

        if tag.is_some_and(|t| REASONING_DELTA_TYPES.contains(&t)) {
            return non_empty_str(event, "delta")
                .map(|delta| vec![StreamChunk::Reasoning { text: delta.to_owned() }])
                .unwrap_or_default();
        }

        if let Some(usage) = extract_usage(event, tag) {
            return vec![StreamChunk::Usage(usage)];
        }

        if tag.is_some_and(|t| COMPLETION_TYPES.contains(&t)) {
            return vec![StreamChunk::Done];
        }

        if let Some(output) = event.pointer("/response/output").and_then(Value::as_array) {
            return expand_full_response(output);
        }

        if let Some(chunks) = self.handle_tool_call(tag, event) {
            return chunks;
        }

        // Unrecognized shape with a bare delta string still counts as text.
        non_empty_str(event, "delta")
            .map(|delta| vec![StreamChunk::Text { text: delta.to_owned() }])
            .unwrap_or_default()
    }

    /// Function-call fragment and completion events
    ///
    /// Returns `None` when the event is not tool-call related so later
    /// rules can run.
    fn handle_tool_call(&mut self, tag: Option<&str>, event: &Value) -> Option<Vec<StreamChunk>> {
        match tag? {
            CALL_ARGS_DELTA_TYPE => {
                // An id-less fragment is swallowed rather than leaked as text.
                if let Some(id) = call_id(event) {
                    let call = self.pending.entry(id.to_owned()).or_default();
                    if call.name.is_none() {
                        call.name = non_empty_str(event, "name").map(str::to_owned);
                    }
                    // Absent delta is a zero-length append, never an error.
                    if let Some(fragment) = event.get("delta").and_then(Value::as_str) {
                        call.arguments.push_str(fragment);
                    }
                }
                Some(Vec::new())
            }
            CALL_ARGS_DONE_TYPE => {
                let chunks = call_id(event)
                    .map(|id| {
                        let final_arguments = event.get("arguments").and_then(Value::as_str);
                        let name = non_empty_str(event, "name");
                        vec![self.complete_call(id, name, final_arguments)]
                    })
                    .unwrap_or_default();
                Some(chunks)
            }
            OUTPUT_ITEM_ADDED_TYPE => {
                let item = function_call_item(event)?;
                if let Some(id) = call_id(item) {
                    let call = self.pending.entry(id.to_owned()).or_default();
                    if call.name.is_none() {
                        call.name = non_empty_str(item, "name").map(str::to_owned);
                    }
                }
                Some(Vec::new())
            }
            OUTPUT_ITEM_DONE_TYPE => {
                let item = function_call_item(event)?;
                let chunks = call_id(item)
                    .map(|id| {
                        let final_arguments = item.get("arguments").and_then(Value::as_str);
                        let name = non_empty_str(item, "name");
                        vec![self.complete_call(id, name, final_arguments)]
                    })
                    .unwrap_or_default();
                Some(chunks)
            }
            _ => None,
        }
    }

    /// Serialize and discard a pending call
    ///
    /// A call that never received a name gets the neutral fallback tag so
    /// opaque call ids stay out of the downstream text protocol.
    fn complete_call(&mut self, id: &str, name_hint: Option<&str>, final_arguments: Option<&str>) -> StreamChunk {
        let call = self.pending.remove(id).unwrap_or_default();
        let name = call
            .name
            .or_else(|| name_hint.map(str::to_owned))
            .unwrap_or_else(|| FALLBACK_CALL_TAG.to_owned());
        let arguments = final_arguments.unwrap_or(&call.arguments);

        StreamChunk::Text {
            text: render_tool_call(&name, arguments),
        }
    }
}

/// Serialize completed call arguments as a tagged-parameter block
///
/// A call named `read_file` with argument `path: "a.ts"` renders as
/// `<read_file>` containing `<path>a.ts</path>`. Unparseable or empty
/// arguments produce an empty-bodied outer tag.
fn render_tool_call(name: &str, arguments: &str) -> String {
    let mut out = format!("<{name}>\n");

    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => {
            for (key, value) in map {
                let rendered = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                out.push_str(&format!("<{key}>{rendered}</{key}>\n"));
            }
        }
        _ => {
            if !arguments.is_empty() {
                tracing::debug!(call = name, "function call arguments failed to parse, emitting empty block");
            }
        }
    }

    out.push_str(&format!("</{name}>"));
    out
}

/// The `item` payload of an output-item event, if it is a function call
fn function_call_item(event: &Value) -> Option<&Value> {
    let item = event.get("item")?;
    (item.get("type").and_then(Value::as_str) == Some("function_call")).then_some(item)
}

/// Correlation id for a function call, from `call_id` or `item_id`
fn call_id(record: &Value) -> Option<&str> {
    non_empty_str(record, "call_id").or_else(|| non_empty_str(record, "item_id"))
}

/// Usage record carried by the event, if any
///
/// Lifecycle snapshots (`response.created`, `response.in_progress`) carry
/// `"usage": null` until counts exist; a null field is absent, not a
/// zero-count record.
fn extract_usage(event: &Value, tag: Option<&str>) -> Option<Usage> {
    let record = event
        .get("usage")
        .filter(|v| !v.is_null())
        .or_else(|| event.pointer("/response/usage").filter(|v| !v.is_null()))
        .or_else(|| (tag == Some(USAGE_TYPE)).then_some(event))?;

    Some(parse_usage(record))
}

/// Token counts with fallback field names, missing counts default to zero
fn parse_usage(record: &Value) -> Usage {
    let count = |field: &str| record.get(field).and_then(Value::as_u64);

    Usage {
        input_tokens: count("input_tokens").or_else(|| count("prompt_tokens")).unwrap_or(0),
        output_tokens: count("output_tokens").or_else(|| count("completion_tokens")).unwrap_or(0),
        cache_read_tokens: count("cache_read_tokens")
            .or_else(|| record.pointer("/input_tokens_details/cached_tokens").and_then(Value::as_u64))
            .or_else(|| record.pointer("/prompt_tokens_details/cached_tokens").and_then(Value::as_u64))
            .unwrap_or(0),
        cache_write_tokens: count("cache_write_tokens")
            .or_else(|| count("cache_creation_input_tokens"))
            .unwrap_or(0),
        total_cost: 0.0,
    }
}

/// Expand a non-streaming full response into per-item chunks
fn expand_full_response(output: &[Value]) -> Vec<StreamChunk> {
    let mut chunks = Vec::new();

    for item in output {
        match item.get("type").and_then(Value::as_str) {
            Some("text" | "message") => {
                if let Some(parts) = item.get("content").and_then(Value::as_array) {
                    for part in parts {
                        if let Some(text) = non_empty_str(part, "text") {
                            chunks.push(StreamChunk::Text { text: text.to_owned() });
                        }
                    }
                }
                if let Some(text) = non_empty_str(item, "text") {
                    chunks.push(StreamChunk::Text { text: text.to_owned() });
                }
            }
            Some("reasoning") => {
                if let Some(summary) = item.get("summary").and_then(Value::as_array) {
                    for entry in summary {
                        if let Some(text) = non_empty_str(entry, "text") {
                            chunks.push(StreamChunk::Reasoning { text: text.to_owned() });
                        }
                    }
                }
            }
            _ => {}
        }
    }

    chunks
}
