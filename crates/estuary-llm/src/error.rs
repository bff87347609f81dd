use thiserror::Error;

/// Errors that can escape the normalization engine
///
/// Per-line and per-event parsing failures are absorbed where they occur
/// (skipped frames, empty-arguments serialization) and never surface here.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Native transport lacks the required streaming entry point
    #[error("native client capability missing: {0}")]
    Capability(String),

    /// Upstream returned a non-2xx response
    #[error("upstream returned {status} {status_text}: {body}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// Canonical status text, empty if unknown
        status_text: String,
        /// Best-effort response body text
        body: String,
    },

    /// Error while reading the event or byte stream
    #[error("streaming error: {0}")]
    Streaming(String),
}

impl LlmError {
    /// Build a `Transport` error from a response status and body text
    pub fn transport(status: reqwest::StatusCode, body: String) -> Self {
        Self::Transport {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_embeds_status_and_body() {
        let err = LlmError::transport(reqwest::StatusCode::TOO_MANY_REQUESTS, "slow down".to_owned());
        let message = err.to_string();
        assert!(message.contains("429"));
        assert!(message.contains("Too Many Requests"));
        assert!(message.contains("slow down"));
    }
}
