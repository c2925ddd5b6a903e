//! Vote weighting for Agora.
//!
//! Two independent, optional signals can raise a vote's weight above 1:
//!
//! - **Work**: the voter pre-selects a difficulty tier and mines a nonce
//!   whose blake3 content hash carries that many leading zero bits
//!   ([`pow`]). More work, more votes.
//! - **Trust**: an externally supplied reputation score, bucketed onto a
//!   small ordinal scale ([`trust`]). The engine never computes trust
//!   itself; it reads it through the injected [`TrustSource`].
//!
//! Both default to a weight of 1 when absent. Weights are attached to the
//! opinion at creation time; the clustering pipeline tallies unweighted by
//! default and exposes weighted variants explicitly.

pub mod error;
pub mod pow;
pub mod trust;

pub use error::MineError;
pub use pow::{
    leading_zero_bits, mine, mine_weight, tier_for_difficulty, verify, work_hash, CancelToken,
    MineOptions, ProofOfWork, WorkTier, DEFAULT_MAX_ITERATIONS, PROGRESS_INTERVAL, WORK_TIERS,
};
pub use trust::{TrustLevel, TrustSource};

/// Combine the two weight signals into the final vote weight.
///
/// Policy: multiplicative. Work and trust are independent signals, so a
/// voter who invested in both compounds them: `max(1, pow) * max(1, trust)`,
/// saturating. The floor clamp on each side guarantees the result is never
/// below 1 - absent or malformed signals degrade to "counts once", they
/// can never erase a vote.
pub fn combined_weight(pow_votes: u32, trust_votes: u32) -> u32 {
    pow_votes.max(1).saturating_mul(trust_votes.max(1))
}
