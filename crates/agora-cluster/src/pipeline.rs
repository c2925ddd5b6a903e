//! The analysis entry point - one pure pass from votes to clusters.

use crate::consensus::{find_consensus, ConsensusEntry};
use crate::error::{Error, Result};
use crate::kmeans::{self, DEFAULT_CLUSTER_COUNT, MAX_KMEANS_ITERATIONS};
use crate::pca::{self, DEFAULT_COMPONENTS, MAX_PCA_ITERATIONS, PCA_TOLERANCE};
use crate::profile::{cluster_profiles, ClusterProfile};
use agora_model::{
    dedup_opinions, Opinion, ParticipantId, Statement, VoteMatrix, MIN_VOTES_PER_PARTICIPANT,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fewer statements than this and there is no opinion space to speak of.
pub const MIN_STATEMENTS: usize = 2;

/// Fewer qualifying participants than this and clustering would be a
/// misleading single-point partition.
pub const MIN_PARTICIPANTS: usize = 3;

/// Tunables for one analysis pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Principal directions to extract
    pub components: usize,
    /// Requested cluster count (clamped to the participant count)
    pub cluster_count: usize,
    /// Row filter: minimum non-missing votes per participant
    pub min_votes_per_participant: usize,
    /// PCA iteration budget per component
    pub max_pca_iterations: usize,
    /// PCA convergence tolerance
    pub pca_tolerance: f64,
    /// k-means iteration budget
    pub max_kmeans_iterations: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            components: DEFAULT_COMPONENTS,
            cluster_count: DEFAULT_CLUSTER_COUNT,
            min_votes_per_participant: MIN_VOTES_PER_PARTICIPANT,
            max_pca_iterations: MAX_PCA_ITERATIONS,
            pca_tolerance: PCA_TOLERANCE,
            max_kmeans_iterations: MAX_KMEANS_ITERATIONS,
        }
    }
}

impl AnalysisOptions {
    fn validate(&self) -> Result<()> {
        if self.components < 1 {
            return Err(Error::InvalidComponentCount(self.components));
        }
        if self.cluster_count < 1 {
            return Err(Error::InvalidClusterCount(self.cluster_count));
        }
        if self.min_votes_per_participant < 1 {
            return Err(Error::InvalidVoteThreshold(self.min_votes_per_participant));
        }
        Ok(())
    }
}

/// Everything one analysis pass produces.
///
/// The row-aligned fields (`projections`, `participant_ids`, `clusters`)
/// always have equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Principal directions in statement space
    pub components: Vec<Vec<f64>>,
    /// Per-participant coordinates in opinion space
    pub projections: Vec<Vec<f64>>,
    /// Row ids aligned with `projections` and `clusters`
    pub participant_ids: Vec<ParticipantId>,
    /// Cluster label per participant row
    pub clusters: Vec<usize>,
    /// Final cluster centroids
    pub centroids: Vec<Vec<f64>>,
    /// Statements with broad cross-cluster agreement
    pub consensus: Vec<ConsensusEntry>,
    /// Per-cluster leanings
    pub cluster_profiles: Vec<ClusterProfile>,
}

impl Analysis {
    /// Whether there was enough data to cluster. When false, the
    /// clustering fields are empty; `consensus` may still carry entries
    /// since it only needs raw votes.
    pub fn can_cluster(&self) -> bool {
        !self.projections.is_empty()
    }

    fn without_clustering(consensus: Vec<ConsensusEntry>) -> Self {
        Self {
            components: Vec::new(),
            projections: Vec::new(),
            participant_ids: Vec::new(),
            clusters: Vec::new(),
            centroids: Vec::new(),
            consensus,
            cluster_profiles: Vec::new(),
        }
    }
}

/// Run the full pipeline on a snapshot of statements and opinions.
///
/// Pure and synchronous: no I/O, no shared state, recomputed from scratch
/// on every call. Randomness for PCA seeding and k-means initialization is
/// injected via `rng`; pass a seeded RNG for reproducible runs (different
/// seeds may produce label-permuted but equally valid partitions).
///
/// Returns `Err` only for invalid options. Thin data is a valid result:
/// see [`Analysis::can_cluster`].
pub fn analyze_opinions<R: Rng>(
    statements: &[Statement],
    opinions: &[Opinion],
    options: &AnalysisOptions,
    rng: &mut R,
) -> Result<Analysis> {
    options.validate()?;

    let deduped = dedup_opinions(opinions);
    debug!(
        statements = statements.len(),
        opinions = opinions.len(),
        logical_votes = deduped.len(),
        "analysis pass started"
    );

    let consensus = find_consensus(statements, &deduped);

    let matrix = VoteMatrix::build(statements, opinions, options.min_votes_per_participant);
    if statements.len() < MIN_STATEMENTS || matrix.rows() < MIN_PARTICIPANTS {
        info!(
            statements = statements.len(),
            participants = matrix.rows(),
            "insufficient data to cluster"
        );
        return Ok(Analysis::without_clustering(consensus));
    }

    let reduction = pca::reduce(
        &matrix,
        options.components,
        options.max_pca_iterations,
        options.pca_tolerance,
        rng,
    );

    let clustering = kmeans::cluster(
        &reduction.projections,
        options.cluster_count,
        options.max_kmeans_iterations,
        rng,
    );

    let profiles = cluster_profiles(
        statements,
        &deduped,
        matrix.participant_ids(),
        &clustering.assignments,
        clustering.centroids.len(),
    );

    info!(
        participants = matrix.rows(),
        clusters = clustering.centroids.len(),
        consensus = consensus.len(),
        "analysis pass finished"
    );

    Ok(Analysis {
        components: reduction.components,
        projections: reduction.projections,
        participant_ids: matrix.participant_ids().to_vec(),
        clusters: clustering.assignments,
        centroids: clustering.centroids,
        consensus,
        cluster_profiles: profiles,
    })
}
