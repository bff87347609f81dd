use serde::{Deserialize, Serialize};

/// Normalized output chunk produced by the adapter
///
/// Chunks are emitted in the order their source events arrive; the only
/// buffering is function-call argument accumulation, which emits a single
/// `Text` chunk when the call completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamChunk {
    /// Incremental assistant text
    Text {
        /// The text fragment
        text: String,
    },
    /// Incremental reasoning / reasoning-summary text
    Reasoning {
        /// The reasoning fragment
        text: String,
    },
    /// Token usage statistics
    Usage(Usage),
    /// Explicit terminal marker
    Done,
}

/// Token usage statistics
///
/// Cost stays zero at this layer; pricing is a collaborator's concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the input
    pub input_tokens: u64,
    /// Tokens generated in the output
    pub output_tokens: u64,
    /// Tokens served from prompt cache
    pub cache_read_tokens: u64,
    /// Tokens written to prompt cache
    pub cache_write_tokens: u64,
    /// Computed cost, always zero here
    pub total_cost: f64,
}
