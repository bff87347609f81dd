//! Shared test harness

// Each test binary uses its own subset of the harness.
#![allow(dead_code)]

pub mod mock_responses;
