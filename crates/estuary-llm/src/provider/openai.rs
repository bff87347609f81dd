//! `OpenAI` Responses API provider
//!
//! Tries a configured native client first; any native failure, including a
//! missing client, falls back to exactly one raw HTTP SSE request against
//! the normalized `/v1/responses` endpoint.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use reqwest::header;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use estuary_config::ProviderConfig;

use crate::convert::{EventNormalizer, build_request};
use crate::error::LlmError;
use crate::protocol::responses::ResponsesRequest;
use crate::provider::{NativeSource, ResponsesClient};
use crate::sse;
use crate::types::{ModelInfo, RequestOptions, StreamChunk};

/// Endpoint used when no base URL is configured
const DEFAULT_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

/// Boxed chunk stream handed to the caller
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, LlmError>> + Send>>;

/// Provider for the `OpenAI` Responses API
pub struct OpenAiResponsesProvider {
    name: String,
    client: reqwest::Client,
    base_url: Option<Url>,
    api_key: Option<SecretString>,
    native: Option<Arc<dyn ResponsesClient>>,
}

impl OpenAiResponsesProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client: reqwest::Client::new(),
            base_url: None,
            api_key: None,
            native: None,
        }
    }

    /// Build a provider from its configuration entry
    pub fn from_config(name: impl Into<String>, config: &ProviderConfig) -> Self {
        let mut provider = Self::new(name);
        provider.base_url = config.base_url.clone();
        provider.api_key = config.api_key.clone();
        provider
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Attach a native client, preferred over the HTTP fallback
    #[must_use]
    pub fn with_native_client(mut self, client: Arc<dyn ResponsesClient>) -> Self {
        self.native = Some(client);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open a normalized chunk stream for one request
    ///
    /// Builds the request payload, resolves a transport, and returns a lazy
    /// stream of canonical chunks. Dropping the stream cancels the request.
    pub async fn stream(
        &self,
        model: &ModelInfo,
        input: Vec<Value>,
        options: &RequestOptions,
    ) -> Result<ChunkStream, LlmError> {
        let request = build_request(model, input, options);

        let source = match self.native_source(&request).await {
            Ok(source) => source,
            Err(e) => {
                tracing::debug!(
                    provider = %self.name,
                    error = %e,
                    "native transport unavailable, falling back to HTTP SSE"
                );
                self.http_source(&request).await?
            }
        };

        Ok(normalize_source(source))
    }

    async fn native_source(&self, request: &ResponsesRequest) -> Result<NativeSource, LlmError> {
        match &self.native {
            Some(client) => client.create_stream(request).await,
            None => Err(LlmError::Capability("no native Responses client configured".to_owned())),
        }
    }

    /// Raw HTTP SSE request against the normalized endpoint
    async fn http_source(&self, request: &ResponsesRequest) -> Result<NativeSource, LlmError> {
        let mut request = request.clone();
        request.stream = true;

        let url = self.responses_url();
        tracing::debug!(provider = %self.name, %url, model = %request.model, "opening SSE stream");

        let mut http = self
            .client
            .post(&url)
            .header(header::ACCEPT, "text/event-stream")
            .json(&request);
        if let Some(api_key) = &self.api_key {
            http = http.bearer_auth(api_key.expose_secret());
        }

        let response = http.send().await.map_err(|e| LlmError::Streaming(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::transport(status, body));
        }

        let bytes = response
            .bytes_stream()
            .map(|read| read.map_err(|e| LlmError::Streaming(e.to_string())));
        Ok(NativeSource::Body(Box::pin(bytes)))
    }

    /// Resolved endpoint URL
    ///
    /// A configured base URL already naming the endpoint is used verbatim;
    /// one ending in a version segment gets `responses` appended; anything
    /// else gets the full `v1/responses` suffix.
    fn responses_url(&self) -> String {
        let Some(base_url) = &self.base_url else {
            return DEFAULT_RESPONSES_URL.to_owned();
        };

        let base = base_url.as_str().trim_end_matches('/');
        if base.ends_with("/v1/responses") {
            base.to_owned()
        } else if base.ends_with("/v1") {
            format!("{base}/responses")
        } else {
            format!("{base}/v1/responses")
        }
    }
}

impl std::fmt::Debug for OpenAiResponsesProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiResponsesProvider")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("has_native_client", &self.native.is_some())
            .finish_non_exhaustive()
    }
}

/// Reduce any transport source to one normalized chunk stream
fn normalize_source(source: NativeSource) -> ChunkStream {
    match source {
        NativeSource::Single(event) => {
            let chunks: Vec<_> = EventNormalizer::new()
                .normalize(&event)
                .into_iter()
                .map(Ok)
                .collect();
            Box::pin(futures_util::stream::iter(chunks))
        }
        NativeSource::Events(mut events) => Box::pin(async_stream::stream! {
            let mut normalizer = EventNormalizer::new();
            while let Some(event) = events.next().await {
                for chunk in normalizer.normalize(&event) {
                    yield Ok(chunk);
                }
            }
        }),
        NativeSource::Body(bytes) => Box::pin(async_stream::stream! {
            let mut normalizer = EventNormalizer::new();
            let events = sse::decode(bytes);
            futures_util::pin_mut!(events);
            while let Some(read) = events.next().await {
                match read {
                    Ok(event) => {
                        for chunk in normalizer.normalize(&event) {
                            yield Ok(chunk);
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        }),
    }
}
