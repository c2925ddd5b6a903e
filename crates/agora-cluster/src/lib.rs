//! Agora clustering pipeline - from raw votes to opinion clusters.
//!
//! # Pipeline
//!
//! ```text
//! statements + opinions
//!        │
//!        ▼
//!   VoteMatrix        (agora-model: dedup, dense matrix, row filter)
//!        │
//!        ▼
//!   PCA reduce        (power iteration + deflation → K-dim projections)
//!        │
//!        ▼
//!   k-means           (Lloyd's → cluster labels + centroids)
//!        │
//!        ├──► consensus       (cross-cluster agreement scan)
//!        └──► cluster profiles (per-cluster leanings)
//! ```
//!
//! The whole pipeline is synchronous, single-threaded, and side-effect-free:
//! a pure function from a snapshot of statements and opinions to an
//! [`Analysis`] bundle. Randomness (PCA seed vectors, k-means init) is
//! injected by the caller, so tests run on seeded RNGs.
//!
//! # Insufficient data is a result, not an error
//!
//! With fewer than 2 statements or fewer than 3 qualifying participants the
//! pipeline declines to cluster: the bundle comes back with empty
//! projections and [`Analysis::can_cluster`] reports false. Only option
//! preconditions (a zero cluster count, for instance) produce an `Err`.
//!
//! # Example
//!
//! ```
//! use agora_cluster::{analyze_opinions, AnalysisOptions};
//! use agora_model::{Opinion, Statement, VoteValue};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let statements = vec![Statement::new("s1", "a", "Dogs are great", 0)];
//! let opinions = vec![Opinion::new("o1", "s1", "p1", VoteValue::Agree, 1)];
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let analysis =
//!     analyze_opinions(&statements, &opinions, &AnalysisOptions::default(), &mut rng)?;
//! assert!(!analysis.can_cluster()); // one statement, one voter
//! # Ok::<(), agora_cluster::Error>(())
//! ```

pub mod consensus;
pub mod error;
pub mod kmeans;
pub mod pca;
pub mod pipeline;
pub mod profile;

pub use consensus::{
    find_consensus, find_consensus_weighted, ConsensusEntry, CONSENSUS_LIMIT,
    CONSENSUS_MIN_AGREE_RATE, CONSENSUS_MIN_VOTES,
};
pub use error::{Error, Result};
pub use kmeans::{assign, cluster, Clustering, DEFAULT_CLUSTER_COUNT, MAX_KMEANS_ITERATIONS};
pub use pca::{reduce, PcaResult, DEFAULT_COMPONENTS, MAX_PCA_ITERATIONS, PCA_TOLERANCE};
pub use pipeline::{analyze_opinions, Analysis, AnalysisOptions, MIN_PARTICIPANTS, MIN_STATEMENTS};
pub use profile::{cluster_profiles, cluster_profiles_weighted, ClusterProfile, StatementLeaning, PROFILE_TOP_N};
