//! Proof-of-work nonce search over blake3 content hashes.
//!
//! The voter pre-selects a tier from [`WORK_TIERS`]; mining searches
//! nonces until `blake3(body || nonce)` has at least the tier's leading
//! zero bits. The search is:
//!
//! - **Cancellable**: a shared [`CancelToken`] is polled at a bounded
//!   interval; cancellation surfaces as [`MineError::Aborted`], distinct
//!   from running out of budget ([`MineError::Exhausted`]).
//! - **Throttled**: the progress callback fires every
//!   `progress_interval` iterations, never per attempt, so a UI thread
//!   can render feedback without being flooded.
//! - **Independent**: concurrent searches for different opinions share
//!   nothing.
//!
//! The synchronous [`mine`] blocks its thread; async callers use
//! [`mine_weight`], which moves the search onto the tokio blocking pool.

use crate::error::MineError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Default nonce budget per mining attempt.
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000_000;

/// Iterations between progress callbacks.
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// Iterations between cancellation checks. Small enough that cancellation
/// lands promptly, large enough to stay off the hot path.
pub const CANCEL_CHECK_INTERVAL: u64 = 1_024;

/// One entry in the difficulty ladder: at least `min_difficulty_bits`
/// leading zero bits grants `votes` votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTier {
    /// Leading zero bits required for this tier
    pub min_difficulty_bits: u32,
    /// Votes granted at this tier
    pub votes: u32,
}

/// The difficulty ladder, ascending. Tier 0 requires no work and grants
/// the baseline single vote.
pub const WORK_TIERS: &[WorkTier] = &[
    WorkTier { min_difficulty_bits: 0, votes: 1 },
    WorkTier { min_difficulty_bits: 8, votes: 2 },
    WorkTier { min_difficulty_bits: 12, votes: 3 },
    WorkTier { min_difficulty_bits: 16, votes: 5 },
    WorkTier { min_difficulty_bits: 20, votes: 8 },
];

/// The highest tier whose requirement the given difficulty meets.
pub fn tier_for_difficulty(bits: u32) -> WorkTier {
    WORK_TIERS
        .iter()
        .rev()
        .find(|tier| bits >= tier.min_difficulty_bits)
        .copied()
        .unwrap_or(WORK_TIERS[0])
}

/// Cooperative cancellation handle, shared between the caller and the
/// mining loop. Cloning is cheap; all clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The search terminates at its next check.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A completed proof: the nonce whose hash met the pre-selected target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOfWork {
    /// The winning nonce
    pub nonce: u64,
    /// `blake3(body || nonce)`
    pub hash: [u8; 32],
    /// The tier the voter pre-selected (leading zero bits)
    pub target_bits: u32,
}

impl ProofOfWork {
    /// Votes granted by the pre-selected tier. The tier is what the voter
    /// committed to, so a luckier-than-required hash grants nothing extra.
    pub fn votes(&self) -> u32 {
        tier_for_difficulty(self.target_bits).votes
    }

    /// Leading zero bits the hash actually achieved.
    pub fn achieved_bits(&self) -> u32 {
        leading_zero_bits(&self.hash)
    }

    /// Hash as lowercase hex, for display.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Throttled progress callback: `(iterations_so_far, hashes_per_second)`.
pub type ProgressFn = dyn FnMut(u64, f64) + Send;

/// Knobs for one mining attempt.
pub struct MineOptions {
    /// Nonce budget before the search gives up
    pub max_iterations: u64,
    /// Iterations between progress callbacks
    pub progress_interval: u64,
    /// Optional progress observer
    pub on_progress: Option<Box<ProgressFn>>,
}

impl Default for MineOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            progress_interval: PROGRESS_INTERVAL,
            on_progress: None,
        }
    }
}

impl std::fmt::Debug for MineOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MineOptions")
            .field("max_iterations", &self.max_iterations)
            .field("progress_interval", &self.progress_interval)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// The content hash the proof commits to: `blake3(body || nonce_le)`.
pub fn work_hash(body: &[u8], nonce: u64) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(body);
    hasher.update(&nonce.to_le_bytes());
    *hasher.finalize().as_bytes()
}

/// Count leading zero bits of a hash.
pub fn leading_zero_bits(hash: &[u8; 32]) -> u32 {
    let mut bits = 0;
    for &byte in hash {
        if byte == 0 {
            bits += 8;
        } else {
            bits += byte.leading_zeros();
            break;
        }
    }
    bits
}

/// Verify a proof against the payload body it claims to cover.
pub fn verify(body: &[u8], proof: &ProofOfWork) -> bool {
    work_hash(body, proof.nonce) == proof.hash && proof.achieved_bits() >= proof.target_bits
}

/// Search nonces until the content hash reaches `target_bits` leading
/// zero bits.
///
/// A target of 0 returns immediately with nonce 0 and no search - the
/// baseline "1 vote" tier requires no work. Blocks the calling thread;
/// see [`mine_weight`] for the async form.
pub fn mine(
    body: &[u8],
    target_bits: u32,
    token: &CancelToken,
    options: &mut MineOptions,
) -> Result<ProofOfWork, MineError> {
    if target_bits == 0 {
        return Ok(ProofOfWork {
            nonce: 0,
            hash: work_hash(body, 0),
            target_bits,
        });
    }

    let progress_interval = options.progress_interval.max(1);
    let started = Instant::now();

    for iteration in 0..options.max_iterations {
        if iteration % CANCEL_CHECK_INTERVAL == 0 && token.is_cancelled() {
            debug!(iteration, target_bits, "mining aborted");
            return Err(MineError::Aborted);
        }

        let nonce = iteration;
        let hash = work_hash(body, nonce);
        if leading_zero_bits(&hash) >= target_bits {
            debug!(nonce, target_bits, "mining succeeded");
            return Ok(ProofOfWork {
                nonce,
                hash,
                target_bits,
            });
        }

        if iteration > 0 && iteration % progress_interval == 0 {
            if let Some(on_progress) = options.on_progress.as_mut() {
                let elapsed = started.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    iteration as f64 / elapsed
                } else {
                    0.0
                };
                on_progress(iteration, rate);
            }
        }
    }

    debug!(
        iterations = options.max_iterations,
        target_bits, "mining exhausted"
    );
    Err(MineError::Exhausted {
        iterations: options.max_iterations,
    })
}

/// Async wrapper: run [`mine`] on the blocking pool so the caller's task
/// stays responsive and can cancel mid-search through the token.
pub async fn mine_weight(
    body: Vec<u8>,
    target_bits: u32,
    token: CancelToken,
    mut options: MineOptions,
) -> Result<ProofOfWork, MineError> {
    tokio::task::spawn_blocking(move || mine(&body, target_bits, &token, &mut options))
        .await
        .map_err(|e| MineError::Worker(e.to_string()))?
}
