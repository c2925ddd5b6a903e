//! Error types for the clustering pipeline.
//!
//! Data-shape conditions (empty inputs, too few voters) are results, not
//! errors - see `pipeline`. These variants only cover caller mistakes in
//! the analysis options.

use thiserror::Error;

/// Result type for clustering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when configuring an analysis.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Requested cluster count below 1
    #[error("cluster count must be at least 1, got {0}")]
    InvalidClusterCount(usize),

    /// Requested component count below 1
    #[error("component count must be at least 1, got {0}")]
    InvalidComponentCount(usize),

    /// Vote threshold below 1 would admit participants with no votes
    #[error("minimum votes per participant must be at least 1, got {0}")]
    InvalidVoteThreshold(usize),
}
