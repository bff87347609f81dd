//! Streaming adapter for the `OpenAI` Responses API
//!
//! Turns a stateless "build a request, get a stream of events back" API into
//! a uniform, lazy sequence of normalized chunks (text, reasoning, usage,
//! done) for a downstream chat pipeline. Handles transport selection (native
//! client vs raw HTTP SSE), incremental frame decoding across arbitrary
//! chunk boundaries, heterogeneous event dispatch, and reassembly of
//! fragmented function-call arguments.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod sse;
pub mod types;

pub use error::LlmError;
pub use provider::{NativeSource, OpenAiResponsesProvider, ResponsesClient};
pub use types::{ModelInfo, ReasoningEffort, RequestOptions, StreamChunk, Usage, Verbosity};
