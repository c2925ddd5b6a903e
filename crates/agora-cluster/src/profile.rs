//! Cluster profiles - the statements that characterize each cluster.
//!
//! For every cluster, each statement is scored by the net agreement of the
//! cluster's members (`agrees - disagrees`, from members' votes only).
//! Statements no member voted on are excluded. The strongest positive and
//! negative scores become the cluster's "tends to agree" / "tends to
//! disagree" lists. A cluster whose members voted on nothing yields an
//! empty profile - a valid result, not an error.

use agora_model::{Opinion, ParticipantId, Statement, StatementId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// How many statements to report in each direction per cluster.
pub const PROFILE_TOP_N: usize = 2;

/// One statement's net leaning within a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementLeaning {
    /// The statement being scored
    pub statement_id: StatementId,
    /// `agrees - disagrees` among the cluster's members; positive leans
    /// agree, negative leans disagree
    pub score: f64,
}

/// A cluster's characteristic leanings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    /// Cluster label this profile describes
    pub cluster_id: usize,
    /// Number of participants assigned to the cluster
    pub size: usize,
    /// Statements the cluster most agrees with (strongest first)
    pub top_agree: Vec<StatementLeaning>,
    /// Statements the cluster most disagrees with (strongest first)
    pub top_disagree: Vec<StatementLeaning>,
}

/// Profile every cluster using unweighted vote counts.
///
/// `opinions` must already be deduplicated. `participant_ids` and
/// `assignments` are the index-aligned row ids and labels from the
/// clustering step; `cluster_count` is the number of centroids.
pub fn cluster_profiles(
    statements: &[Statement],
    opinions: &[&Opinion],
    participant_ids: &[ParticipantId],
    assignments: &[usize],
    cluster_count: usize,
) -> Vec<ClusterProfile> {
    profiles(statements, opinions, participant_ids, assignments, cluster_count, false)
}

/// Weighted variant: votes contribute their `weight` to the score. An
/// explicit opt-in, mirroring [`crate::consensus::find_consensus_weighted`].
pub fn cluster_profiles_weighted(
    statements: &[Statement],
    opinions: &[&Opinion],
    participant_ids: &[ParticipantId],
    assignments: &[usize],
    cluster_count: usize,
) -> Vec<ClusterProfile> {
    profiles(statements, opinions, participant_ids, assignments, cluster_count, true)
}

fn profiles(
    statements: &[Statement],
    opinions: &[&Opinion],
    participant_ids: &[ParticipantId],
    assignments: &[usize],
    cluster_count: usize,
    weighted: bool,
) -> Vec<ClusterProfile> {
    debug_assert_eq!(participant_ids.len(), assignments.len());

    let membership: HashMap<&ParticipantId, usize> = participant_ids
        .iter()
        .zip(assignments.iter().copied())
        .collect();

    (0..cluster_count)
        .map(|cluster_id| {
            let size = assignments.iter().filter(|&&c| c == cluster_id).count();

            let mut leanings: Vec<StatementLeaning> = statements
                .iter()
                .filter_map(|statement| {
                    let mut score = 0.0;
                    let mut votes = 0usize;
                    for opinion in opinions {
                        if opinion.statement_id != statement.id {
                            continue;
                        }
                        if membership.get(&opinion.participant_id) != Some(&cluster_id) {
                            continue;
                        }
                        votes += 1;
                        let contribution = if weighted { opinion.weight as f64 } else { 1.0 };
                        if opinion.value.is_agree() {
                            score += contribution;
                        } else if opinion.value.is_disagree() {
                            score -= contribution;
                        }
                    }
                    (votes > 0).then(|| StatementLeaning {
                        statement_id: statement.id.clone(),
                        score,
                    })
                })
                .collect();

            // Strongest leanings first, sign ignored; stable sort keeps
            // statement order for equal magnitudes.
            leanings.sort_by(|a, b| {
                b.score
                    .abs()
                    .partial_cmp(&a.score.abs())
                    .unwrap_or(Ordering::Equal)
            });

            let top_agree = leanings
                .iter()
                .filter(|l| l.score > 0.0)
                .take(PROFILE_TOP_N)
                .cloned()
                .collect();
            let top_disagree = leanings
                .iter()
                .filter(|l| l.score < 0.0)
                .take(PROFILE_TOP_N)
                .cloned()
                .collect();

            ClusterProfile {
                cluster_id,
                size,
                top_agree,
                top_disagree,
            }
        })
        .collect()
}
