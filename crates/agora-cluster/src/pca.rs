//! Power-iteration PCA with deflation, tolerant of missing cells.
//!
//! The vote matrix is sparse in the survey sense: most participants have
//! not voted on most statements. A full covariance eigendecomposition is
//! overkill for the handful of directions we need, so components are
//! extracted one at a time:
//!
//! 1. Center each column on the mean of its *non-missing* cells; impute
//!    missing cells to 0 afterwards (the column mean). This biases absent
//!    voters toward neutral - a deliberate policy, not data fabrication.
//! 2. Power-iterate a random unit vector `v` in statement space:
//!    `t = R·v`, `v' = Rᵀ·t`, normalize, until the L1 change in `v` drops
//!    below tolerance or the iteration budget runs out.
//! 3. Deflate: subtract each row's projection onto `v` from the residual,
//!    so the next component comes out orthogonal.
//!
//! When a direction's variance is exhausted the un-normalized iterate
//! collapses toward zero norm. We accept the current iterate and move on;
//! later components extracted from an all-zero residual are meaningless but
//! harmless, and callers on tiny inputs must tolerate them.

use agora_model::VoteMatrix;
use rand::Rng;
use tracing::debug;

/// Default number of principal directions to extract.
pub const DEFAULT_COMPONENTS: usize = 2;

/// Iteration budget per component.
pub const MAX_PCA_ITERATIONS: usize = 100;

/// Convergence tolerance, both for the L1 change in `v` and for the
/// degenerate near-zero-norm check.
pub const PCA_TOLERANCE: f64 = 1e-6;

/// Output of the reduction: `K` component vectors (statement space, length
/// `m`) and one `K`-dimensional projection per participant row.
#[derive(Debug, Clone, PartialEq)]
pub struct PcaResult {
    /// Principal directions, each of length `cols`
    pub components: Vec<Vec<f64>>,
    /// Participant projections, each of length `components.len()`,
    /// index-aligned with the matrix rows
    pub projections: Vec<Vec<f64>>,
}

impl PcaResult {
    /// Empty result - the "insufficient data" signal.
    pub fn empty() -> Self {
        Self {
            components: Vec::new(),
            projections: Vec::new(),
        }
    }
}

/// Reduce a vote matrix to `components` principal directions.
///
/// Returns [`PcaResult::empty`] when the matrix has no rows or columns.
pub fn reduce<R: Rng>(
    matrix: &VoteMatrix,
    components: usize,
    max_iterations: usize,
    tolerance: f64,
    rng: &mut R,
) -> PcaResult {
    let n = matrix.rows();
    let m = matrix.cols();
    if n == 0 || m == 0 || components == 0 {
        return PcaResult::empty();
    }

    let centered = center(matrix);
    let mut residual = centered.clone();
    let mut found: Vec<Vec<f64>> = Vec::with_capacity(components);

    for component in 0..components {
        let mut v = random_unit_vector(m, rng);

        for iteration in 0..max_iterations {
            // t = R·v (row space), then v' = Rᵀ·t (back to statement space)
            let mut next = vec![0.0; m];
            for row in &residual {
                let t = dot(row, &v);
                for (out, &cell) in next.iter_mut().zip(row.iter()) {
                    *out += cell * t;
                }
            }

            let norm = l2_norm(&next);
            if norm < tolerance {
                // Degenerate direction: no variance left. Keep the current
                // iterate rather than invent a stopping heuristic.
                debug!(component, iteration, "pca direction degenerate");
                break;
            }
            for x in &mut next {
                *x /= norm;
            }

            let change: f64 = v
                .iter()
                .zip(next.iter())
                .map(|(a, b)| (a - b).abs())
                .sum();
            v = next;
            if change < tolerance {
                debug!(component, iteration, "pca direction converged");
                break;
            }
        }

        // Deflate so the next component is orthogonal to this one.
        for row in &mut residual {
            let projection = dot(row, &v);
            for (cell, &axis) in row.iter_mut().zip(v.iter()) {
                *cell -= projection * axis;
            }
        }

        found.push(v);
    }

    let projections = centered
        .iter()
        .map(|row| found.iter().map(|axis| dot(row, axis)).collect())
        .collect();

    PcaResult {
        components: found,
        projections,
    }
}

/// Mean-center the matrix, imputing missing cells to the column mean
/// (which is 0 after centering).
fn center(matrix: &VoteMatrix) -> Vec<Vec<f64>> {
    let m = matrix.cols();
    let mut sums = vec![0.0; m];
    let mut counts = vec![0usize; m];
    for row in matrix.iter_rows() {
        for (j, cell) in row.iter().enumerate() {
            if let Some(value) = cell {
                sums[j] += value;
                counts[j] += 1;
            }
        }
    }
    let means: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&sum, &count)| if count == 0 { 0.0 } else { sum / count as f64 })
        .collect();

    matrix
        .iter_rows()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, cell)| match cell {
                    Some(value) => value - means[j],
                    None => 0.0,
                })
                .collect()
        })
        .collect()
}

fn random_unit_vector<R: Rng>(len: usize, rng: &mut R) -> Vec<f64> {
    loop {
        let v: Vec<f64> = (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let norm = l2_norm(&v);
        if norm > PCA_TOLERANCE {
            return v.iter().map(|x| x / norm).collect();
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_model::{Opinion, Statement, VoteMatrix, VoteValue};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TEST_TOLERANCE: f64 = 1e-6;

    fn statement(id: &str) -> Statement {
        Statement::new(id, "author", format!("text {id}"), 0)
    }

    /// Two mirrored voting blocs over 4 statements: p0-p2 agree on the
    /// first half and disagree on the second, p3-p5 the reverse.
    fn polarized_matrix() -> VoteMatrix {
        let statements: Vec<Statement> = (0..4).map(|s| statement(&format!("s{s}"))).collect();
        let mut opinions = Vec::new();
        let mut next_id = 0;
        for p in 0..6 {
            for (s, stmt) in statements.iter().enumerate() {
                let first_bloc = p < 3;
                let first_half = s < 2;
                let value = if first_bloc == first_half {
                    VoteValue::Agree
                } else {
                    VoteValue::Disagree
                };
                opinions.push(Opinion::new(
                    format!("o{next_id}"),
                    stmt.id.clone(),
                    format!("p{p}"),
                    value,
                    next_id as u64,
                ));
                next_id += 1;
            }
        }
        VoteMatrix::build(&statements, &opinions, 2)
    }

    #[test]
    fn empty_matrix_yields_empty_result() {
        let matrix = VoteMatrix::build(&[], &[], 2);
        let mut rng = StdRng::seed_from_u64(1);
        let result = reduce(&matrix, 2, MAX_PCA_ITERATIONS, PCA_TOLERANCE, &mut rng);
        assert!(result.components.is_empty());
        assert!(result.projections.is_empty());
    }

    #[test]
    fn shapes_are_aligned() {
        let matrix = polarized_matrix();
        let mut rng = StdRng::seed_from_u64(2);
        let result = reduce(&matrix, 2, MAX_PCA_ITERATIONS, PCA_TOLERANCE, &mut rng);

        assert_eq!(result.components.len(), 2);
        assert!(result.components.iter().all(|c| c.len() == matrix.cols()));
        assert_eq!(result.projections.len(), matrix.rows());
        assert!(result.projections.iter().all(|p| p.len() == 2));
    }

    #[test]
    fn projections_are_centered() {
        let matrix = polarized_matrix();
        let mut rng = StdRng::seed_from_u64(3);
        let result = reduce(&matrix, 2, MAX_PCA_ITERATIONS, PCA_TOLERANCE, &mut rng);

        for k in 0..2 {
            let mean: f64 = result.projections.iter().map(|p| p[k]).sum::<f64>()
                / result.projections.len() as f64;
            assert!(mean.abs() < 1e-9, "component {k} projections mean {mean}");
        }
    }

    /// Four voters spanning two independent axes of disagreement: bloc
    /// membership on s0/s1 is uncorrelated with bloc membership on s2/s3,
    /// so the centered matrix has rank 2.
    fn rank_two_matrix() -> VoteMatrix {
        let statements: Vec<Statement> = (0..4).map(|s| statement(&format!("s{s}"))).collect();
        let patterns = [
            [VoteValue::Agree, VoteValue::Agree, VoteValue::Agree, VoteValue::Agree],
            [VoteValue::Agree, VoteValue::Agree, VoteValue::Disagree, VoteValue::Disagree],
            [VoteValue::Disagree, VoteValue::Disagree, VoteValue::Agree, VoteValue::Agree],
            [VoteValue::Disagree, VoteValue::Disagree, VoteValue::Disagree, VoteValue::Disagree],
        ];
        let mut opinions = Vec::new();
        for (p, pattern) in patterns.iter().enumerate() {
            for (s, &value) in pattern.iter().enumerate() {
                opinions.push(Opinion::new(
                    format!("o{p}-{s}"),
                    format!("s{s}"),
                    format!("p{p}"),
                    value,
                    (p * 4 + s) as u64,
                ));
            }
        }
        VoteMatrix::build(&statements, &opinions, 2)
    }

    #[test]
    fn components_are_unit_and_orthogonal() {
        let matrix = rank_two_matrix();
        let mut rng = StdRng::seed_from_u64(4);
        let result = reduce(&matrix, 2, MAX_PCA_ITERATIONS, PCA_TOLERANCE, &mut rng);

        let a = &result.components[0];
        let b = &result.components[1];
        assert!((l2_norm(a) - 1.0).abs() < 1e-6);
        assert!((l2_norm(b) - 1.0).abs() < 1e-6);
        assert!(dot(a, b).abs() < 1e-4, "components not orthogonal");
    }

    #[test]
    fn polarized_blocs_separate_on_first_component() {
        let matrix = polarized_matrix();
        let mut rng = StdRng::seed_from_u64(5);
        let result = reduce(&matrix, 2, MAX_PCA_ITERATIONS, PCA_TOLERANCE, &mut rng);

        // Rows are sorted by participant id: p0..p2 then p3..p5. The two
        // blocs must land on opposite sides of the dominant direction.
        let first_bloc_sign = result.projections[0][0].signum();
        for i in 0..3 {
            assert_eq!(result.projections[i][0].signum(), first_bloc_sign);
        }
        for i in 3..6 {
            assert_eq!(result.projections[i][0].signum(), -first_bloc_sign);
        }
        // And the dominant spread must be real, not numerical noise.
        assert!(result.projections[0][0].abs() > 0.5);
    }

    #[test]
    fn missing_cells_do_not_crash_and_impute_neutral() {
        let statements: Vec<Statement> = (0..3).map(|s| statement(&format!("s{s}"))).collect();
        // p1 and p2 disagree across the board; p3 only voted twice.
        let opinions = vec![
            Opinion::new("o1", "s0", "p1", VoteValue::Agree, 1),
            Opinion::new("o2", "s1", "p1", VoteValue::Agree, 2),
            Opinion::new("o3", "s2", "p1", VoteValue::Agree, 3),
            Opinion::new("o4", "s0", "p2", VoteValue::Disagree, 4),
            Opinion::new("o5", "s1", "p2", VoteValue::Disagree, 5),
            Opinion::new("o6", "s2", "p2", VoteValue::Disagree, 6),
            Opinion::new("o7", "s0", "p3", VoteValue::Agree, 7),
            Opinion::new("o8", "s1", "p3", VoteValue::Disagree, 8),
        ];
        let matrix = VoteMatrix::build(&statements, &opinions, 2);
        assert_eq!(matrix.rows(), 3);

        let mut rng = StdRng::seed_from_u64(6);
        let result = reduce(&matrix, 2, MAX_PCA_ITERATIONS, PCA_TOLERANCE, &mut rng);
        assert_eq!(result.projections.len(), 3);
        for p in &result.projections {
            assert!(p.iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn zero_variance_matrix_is_tolerated() {
        // Everyone votes identically: after centering the matrix is all
        // zeros, every direction is degenerate.
        let statements: Vec<Statement> = (0..3).map(|s| statement(&format!("s{s}"))).collect();
        let mut opinions = Vec::new();
        for p in 0..3 {
            for (s, stmt) in statements.iter().enumerate() {
                opinions.push(Opinion::new(
                    format!("o{p}-{s}"),
                    stmt.id.clone(),
                    format!("p{p}"),
                    VoteValue::Agree,
                    (p * 10 + s) as u64,
                ));
            }
        }
        let matrix = VoteMatrix::build(&statements, &opinions, 2);

        let mut rng = StdRng::seed_from_u64(7);
        let result = reduce(&matrix, 2, MAX_PCA_ITERATIONS, PCA_TOLERANCE, &mut rng);
        assert_eq!(result.components.len(), 2);
        for p in &result.projections {
            for x in p {
                assert!(x.abs() < TEST_TOLERANCE);
            }
        }
    }
}
