//! Consensus scan - statements with broad, cross-bloc agreement.
//!
//! Unlike the cluster profiles, this looks at *all* opinions regardless of
//! cluster membership: a consensus statement is one most voters agree on,
//! wherever they sit in opinion space.

use agora_model::{Opinion, Statement, StatementId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Minimum agree rate for a statement to qualify as consensus.
pub const CONSENSUS_MIN_AGREE_RATE: f64 = 0.7;

/// Minimum number of votes before an agree rate means anything.
pub const CONSENSUS_MIN_VOTES: usize = 3;

/// Maximum consensus entries reported.
pub const CONSENSUS_LIMIT: usize = 5;

/// One qualifying statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusEntry {
    /// The qualifying statement
    pub statement_id: StatementId,
    /// Fraction of votes on this statement that were Agree, in `[0, 1]`
    pub agree_rate: f64,
    /// Number of votes the rate was computed over
    pub sample_size: usize,
}

/// Find consensus statements using unweighted vote counts.
///
/// `opinions` must already be deduplicated (one logical vote per
/// participant and statement - see [`agora_model::dedup_opinions`]).
/// Statements with zero votes are excluded outright, never treated as 0%
/// or 100% agreement. Results are sorted by descending agree rate (ties
/// keep statement order) and capped at [`CONSENSUS_LIMIT`].
pub fn find_consensus(statements: &[Statement], opinions: &[&Opinion]) -> Vec<ConsensusEntry> {
    tally(statements, opinions, false)
}

/// Weighted variant: each vote contributes its `weight` to both the agree
/// count and the total. Sample size stays the raw vote count. This is an
/// explicit opt-in; the default pipeline reports unweighted consensus.
pub fn find_consensus_weighted(
    statements: &[Statement],
    opinions: &[&Opinion],
) -> Vec<ConsensusEntry> {
    tally(statements, opinions, true)
}

fn tally(statements: &[Statement], opinions: &[&Opinion], weighted: bool) -> Vec<ConsensusEntry> {
    let mut entries: Vec<ConsensusEntry> = statements
        .iter()
        .filter_map(|statement| {
            let mut agree = 0.0;
            let mut total = 0.0;
            let mut sample_size = 0usize;
            for opinion in opinions {
                if opinion.statement_id != statement.id {
                    continue;
                }
                let contribution = if weighted { opinion.weight as f64 } else { 1.0 };
                total += contribution;
                sample_size += 1;
                if opinion.value.is_agree() {
                    agree += contribution;
                }
            }
            if sample_size == 0 {
                return None;
            }
            let agree_rate = agree / total;
            (agree_rate >= CONSENSUS_MIN_AGREE_RATE && sample_size >= CONSENSUS_MIN_VOTES).then(
                || ConsensusEntry {
                    statement_id: statement.id.clone(),
                    agree_rate,
                    sample_size,
                },
            )
        })
        .collect();

    // Rates are finite by construction; stable sort keeps statement order
    // for equal rates.
    entries.sort_by(|a, b| {
        b.agree_rate
            .partial_cmp(&a.agree_rate)
            .unwrap_or(Ordering::Equal)
    });
    entries.truncate(CONSENSUS_LIMIT);
    entries
}
