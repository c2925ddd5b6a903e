//! Error types for proof-of-work mining.

use thiserror::Error;

/// Why a mining attempt ended without a proof.
///
/// Cancellation and budget exhaustion are deliberately distinct: a caller
/// retries an exhausted search at a lower tier, but an aborted one was a
/// decision, not a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MineError {
    /// The caller cancelled the search via its [`crate::CancelToken`]
    #[error("mining aborted by caller")]
    Aborted,

    /// The iteration budget ran out before the target difficulty was hit
    #[error("mining exhausted {iterations} iterations without reaching target difficulty")]
    Exhausted {
        /// Iterations spent before giving up
        iterations: u64,
    },

    /// The background mining task failed to run to completion
    #[error("mining worker failed: {0}")]
    Worker(String),
}
