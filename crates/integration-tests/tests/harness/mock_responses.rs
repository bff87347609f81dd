//! Mock Responses API server for integration tests
//!
//! Serves `/v1/responses` with a canned SSE body and records the last
//! request payload for assertions against the wire format.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use tokio_util::sync::CancellationToken;

/// Mock Responses API backend that replays a fixed SSE body
pub struct MockResponses {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    request_count: AtomicU32,
    /// Status to fail every request with (None = succeed)
    fail_status: Option<StatusCode>,
    /// Raw SSE body returned on success
    body: String,
    /// Payload of the most recent request
    last_request: std::sync::Mutex<Option<serde_json::Value>>,
}

impl MockResponses {
    /// Start a mock serving a plain text-and-usage stream
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with_body(text_stream_body()).await
    }

    /// Start a mock serving an arbitrary raw SSE body
    pub async fn start_with_body(body: String) -> anyhow::Result<Self> {
        Self::start_inner(None, body).await
    }

    /// Start a mock that fails every request with the given status
    pub async fn start_failing(status: StatusCode) -> anyhow::Result<Self> {
        Self::start_inner(Some(status), String::new()).await
    }

    async fn start_inner(fail_status: Option<StatusCode>, body: String) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            request_count: AtomicU32::new(0),
            fail_status,
            body,
            last_request: std::sync::Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/responses", routing::post(handle_responses))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as a provider
    ///
    /// Ends in `/v1` so endpoint normalization appends `responses`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Payload of the most recent request
    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.state.last_request.lock().unwrap().clone()
    }
}

impl Drop for MockResponses {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_responses(
    State(state): State<Arc<MockState>>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    *state.last_request.lock().unwrap() = Some(payload);

    if let Some(status) = state.fail_status {
        return (
            status,
            Json(serde_json::json!({
                "error": {
                    "message": "mock server intentional failure",
                    "type": "server_error"
                }
            })),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/event-stream")],
        state.body.clone(),
    )
        .into_response()
}

/// SSE body with text deltas, a reasoning delta, and final usage
pub fn text_stream_body() -> String {
    sse_body(&[
        r#"{"type":"response.output_item.added","item":{"type":"message","id":"msg_1"}}"#,
        r#"{"type":"response.reasoning_text.delta","delta":"considering"}"#,
        r#"{"type":"response.output_text.delta","delta":"Hello "}"#,
        r#"{"type":"response.output_text.delta","delta":"world"}"#,
        r#"{"type":"response.completed","response":{"usage":{"input_tokens":12,"output_tokens":4,"input_tokens_details":{"cached_tokens":3}}}}"#,
    ])
}

/// SSE body streaming one fragmented function call
pub fn tool_call_body() -> String {
    sse_body(&[
        r#"{"type":"response.output_item.added","item":{"type":"function_call","call_id":"call_1","name":"get_weather","arguments":""}}"#,
        r#"{"type":"response.function_call_arguments.delta","item_id":"call_1","delta":"{\"location\":"}"#,
        r#"{"type":"response.function_call_arguments.delta","item_id":"call_1","delta":"\"San Francisco\"}"}"#,
        r#"{"type":"response.function_call_arguments.done","item_id":"call_1","arguments":"{\"location\":\"San Francisco\"}"}"#,
        r#"{"type":"response.completed"}"#,
    ])
}

/// Frame the given payloads as `data:` lines and terminate with `[DONE]`
pub fn sse_body(payloads: &[&str]) -> String {
    let mut body = String::new();
    for payload in payloads {
        body.push_str(&format!("data: {payload}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}
