//! Responses API wire format types

pub mod responses;
