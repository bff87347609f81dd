//! Incremental Server-Sent-Events frame decoder
//!
//! Decodes an untrusted byte stream into discrete JSON event records across
//! arbitrary chunk boundaries. Frames are separated by a blank line; each
//! frame carries zero or more `data:` payload lines. A literal `[DONE]`
//! payload terminates the sequence, and malformed JSON lines are skipped
//! without aborting it.

use futures_util::{Stream, StreamExt};
use serde_json::Value;

use crate::error::LlmError;

/// Sentinel payload marking normal end of stream
const DONE_SENTINEL: &str = "[DONE]";

/// Stateful frame decoder fed by successive reads from a byte source
///
/// Bytes are buffered until a complete frame is available, so a multi-byte
/// UTF-8 sequence split across reads stays in the buffer until its frame
/// completes — frame delimiters are ASCII and can never fall inside one.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    terminated: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` sentinel has been seen
    ///
    /// Once terminated, further input is ignored.
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Consume one read from the byte source, yielding any completed events
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Value> {
        let mut events = Vec::new();
        if self.terminated {
            return events;
        }

        self.buffer.extend_from_slice(bytes);

        while let Some((at, delimiter_len)) = frame_boundary(&self.buffer) {
            let frame: Vec<u8> = self.buffer.drain(..at + delimiter_len).collect();
            let text = String::from_utf8_lossy(&frame[..at]);

            for line in text.lines() {
                let Some(payload) = line.trim().strip_prefix("data:") else {
                    continue;
                };
                let payload = payload.trim_start();

                if payload == DONE_SENTINEL {
                    self.terminated = true;
                    return events;
                }

                match serde_json::from_str(payload) {
                    Ok(value) => events.push(value),
                    Err(e) => {
                        tracing::debug!(error = %e, "skipping unparseable SSE data line");
                    }
                }
            }
        }

        events
    }
}

/// Position and length of the earliest blank-line frame delimiter
///
/// A frame ends at a line break followed by a blank line: `\n\n` or
/// `\n\r\n`. The latter also matches the tail of a `\r\n\r\n` delimiter
/// and covers mixed line endings (an LF-terminated line closed by a CRLF
/// blank line); a `\r` left at the end of the frame text is stripped with
/// the rest of the line whitespace.
fn frame_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|at| (at, 2));
    let crlf = buffer.windows(3).position(|w| w == b"\n\r\n").map(|at| (at, 3));

    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// Decode a byte stream into a lazy, finite sequence of event records
///
/// The source stops being polled as soon as the `[DONE]` sentinel is seen
/// or a read fails; dropping the returned stream releases the source on
/// every exit path. Read errors surface as [`LlmError::Streaming`] and end
/// the sequence.
pub fn decode<S, B, E>(source: S) -> impl Stream<Item = Result<Value, LlmError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    async_stream::stream! {
        let mut decoder = SseDecoder::new();
        futures_util::pin_mut!(source);

        while let Some(read) = source.next().await {
            match read {
                Ok(chunk) => {
                    for event in decoder.feed(chunk.as_ref()) {
                        yield Ok(event);
                    }
                    if decoder.is_terminated() {
                        break;
                    }
                }
                Err(e) => {
                    yield Err(LlmError::Streaming(e.to_string()));
                    break;
                }
            }
        }
    }
}
