//! Lloyd's k-means over participant projections.
//!
//! The classic loop: assign every point to its nearest centroid, move each
//! centroid to the mean of its points, repeat until nothing changes.
//!
//! Initialization takes a uniformly random permutation of the point indices
//! and uses the first `k'` points as centroids, so repeated runs on the same
//! input can produce different (equally valid, label-permuted) partitions.
//! That is documented behavior, not a defect; tests pin the RNG seed.
//!
//! Two deliberate policies:
//! - distance ties go to the lowest centroid index, and
//! - a centroid that loses all its points keeps its previous position
//!   rather than being reseeded.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of opinion clusters to request.
pub const DEFAULT_CLUSTER_COUNT: usize = 3;

/// Iteration budget for the assign/update loop.
pub const MAX_KMEANS_ITERATIONS: usize = 50;

/// A finished clustering: one label per point plus the final centroids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    /// Cluster label per point, each in `0..centroids.len()`
    pub assignments: Vec<usize>,
    /// Final centroid positions
    pub centroids: Vec<Vec<f64>>,
}

impl Clustering {
    /// Empty clustering for empty input.
    pub fn empty() -> Self {
        Self {
            assignments: Vec::new(),
            centroids: Vec::new(),
        }
    }

    /// Number of points assigned to the given cluster.
    pub fn cluster_size(&self, cluster: usize) -> usize {
        self.assignments.iter().filter(|&&c| c == cluster).count()
    }
}

/// Partition `points` into at most `k` clusters.
///
/// The effective cluster count is `min(k, points.len())` - there can never
/// be more clusters than points. `k` must be at least 1; the pipeline
/// validates this before calling.
pub fn cluster<R: Rng>(
    points: &[Vec<f64>],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> Clustering {
    debug_assert!(k >= 1, "cluster count must be validated by the caller");
    let n = points.len();
    if n == 0 {
        return Clustering::empty();
    }
    let k = k.min(n);

    // Distinct initial centroids: first k of a random index permutation.
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    let mut centroids: Vec<Vec<f64>> = indices[..k].iter().map(|&i| points[i].clone()).collect();

    let mut assignments = assign(points, &centroids);
    for iteration in 0..max_iterations {
        update_centroids(points, &assignments, &mut centroids);
        let next = assign(points, &centroids);
        if next == assignments {
            debug!(iteration, k, "k-means reached fixed point");
            return Clustering {
                assignments,
                centroids,
            };
        }
        assignments = next;
    }

    debug!(max_iterations, k, "k-means stopped at iteration budget");
    Clustering {
        assignments,
        centroids,
    }
}

/// Assign each point to its nearest centroid by squared Euclidean distance.
/// Ties go to the lowest centroid index.
pub fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|point| {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let distance = squared_distance(point, centroid);
                if distance < best_distance {
                    best = c;
                    best_distance = distance;
                }
            }
            best
        })
        .collect()
}

/// Move each centroid to the mean of its assigned points. A centroid with
/// no points keeps its previous position.
fn update_centroids(points: &[Vec<f64>], assignments: &[usize], centroids: &mut [Vec<f64>]) {
    let dims = points.first().map(|p| p.len()).unwrap_or(0);
    let mut sums = vec![vec![0.0; dims]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (point, &c) in points.iter().zip(assignments.iter()) {
        counts[c] += 1;
        for (sum, &x) in sums[c].iter_mut().zip(point.iter()) {
            *sum += x;
        }
    }

    for (c, centroid) in centroids.iter_mut().enumerate() {
        if counts[c] == 0 {
            continue;
        }
        for (cell, sum) in centroid.iter_mut().zip(sums[c].iter()) {
            *cell = sum / counts[c] as f64;
        }
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
