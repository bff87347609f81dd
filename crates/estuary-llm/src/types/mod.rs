//! Internal canonical types for the streaming adapter
//!
//! These types are the normalized vocabulary the downstream pipeline
//! consumes, independent of upstream event shape.

pub mod chunk;
pub mod model;
pub mod request;

pub use chunk::{StreamChunk, Usage};
pub use model::ModelInfo;
pub use request::{ReasoningEffort, RequestOptions, Verbosity};
