//! Provider transports
//!
//! A provider resolves one of two transports per request: a native client
//! implementing [`ResponsesClient`], or a raw HTTP SSE fallback. Whichever
//! transport wins, its output is reduced to a [`NativeSource`] and fed
//! through the same normalizer, so the choice is invisible downstream.

pub mod openai;

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use serde_json::Value;

use crate::error::LlmError;
use crate::protocol::responses::ResponsesRequest;

pub use openai::OpenAiResponsesProvider;

/// What a transport actually handed back, decided once at the boundary
pub enum NativeSource {
    /// Already-decoded event records
    Events(Pin<Box<dyn Stream<Item = Value> + Send>>),
    /// A single complete response record
    Single(Value),
    /// Raw SSE bytes that still need frame decoding
    Body(Pin<Box<dyn Stream<Item = Result<Bytes, LlmError>> + Send>>),
}

impl std::fmt::Debug for NativeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Events(_) => f.write_str("NativeSource::Events(..)"),
            Self::Single(value) => f.debug_tuple("NativeSource::Single").field(value).finish(),
            Self::Body(_) => f.write_str("NativeSource::Body(..)"),
        }
    }
}

/// Native streaming entry point of an SDK-style client
///
/// Implementations may return any [`NativeSource`] shape; returning
/// [`LlmError::Capability`] signals that the client cannot serve the call
/// and hands the request to the HTTP fallback.
#[async_trait]
pub trait ResponsesClient: Send + Sync {
    async fn create_stream(&self, request: &ResponsesRequest) -> Result<NativeSource, LlmError>;
}
