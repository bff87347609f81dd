//! Conversion between internal types and the Responses API wire format

pub mod responses;

pub use responses::{EventNormalizer, build_request};
