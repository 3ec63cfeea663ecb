//! Bounded point mutation of weight matrices.
//!
//! A mutated matrix receives a handful of point perturbations: roughly one
//! point per seven cells at most, each adding a uniform value from `[-1, 1]`
//! and clamping the result back into [`WEIGHT_BOUNDS`]. Bias vectors are left
//! untouched.

use std::ops::RangeInclusive;

use genepool_genome::Genome;
use ndarray::Array2;
use rand::Rng;

/// A matrix with `n` cells receives at most `n / MUTATION_POINT_DIVISOR` points.
pub const MUTATION_POINT_DIVISOR: usize = 7;

/// Range of the perturbation added to a mutated cell.
pub const PERTURBATION_RANGE: RangeInclusive<f32> = -1.0..=1.0;

/// Mutated cells are clamped into this range.
pub const WEIGHT_BOUNDS: RangeInclusive<f32> = -1.0..=1.0;

/// Largest number of mutation points for a matrix with `cells` cells.
///
/// Never less than 1, so tiny matrices still get a valid range.
///
/// ```
/// use genepool_training::mutation::max_mutation_points;
///
/// assert_eq!(max_mutation_points(60), 8);
/// assert_eq!(max_mutation_points(6), 1);
/// assert_eq!(max_mutation_points(0), 1);
/// ```
#[must_use]
pub fn max_mutation_points(cells: usize) -> usize {
    (cells / MUTATION_POINT_DIVISOR).max(1)
}

/// Perturbs between 1 and [`max_mutation_points`] random cells of `matrix`.
///
/// The same cell may be picked more than once. Returns the number of points
/// applied.
pub fn mutate_matrix<R>(matrix: &mut Array2<f32>, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let (rows, cols) = matrix.dim();
    if rows == 0 || cols == 0 {
        return 0;
    }

    let points = rng.random_range(1..=max_mutation_points(rows * cols));
    for _ in 0..points {
        let cell = (rng.random_range(0..rows), rng.random_range(0..cols));
        let value = matrix[cell] + rng.random_range(PERTURBATION_RANGE);
        matrix[cell] = value.clamp(*WEIGHT_BOUNDS.start(), *WEIGHT_BOUNDS.end());
    }
    points
}

/// Mutates each weight matrix of each genome with probability `rate`.
///
/// Returns the number of matrices that were mutated.
///
/// # Panics
///
/// Panics if `rate` is outside `[0, 1]`.
pub fn mutate_genomes<R>(genomes: &mut [Genome], rate: f32, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let mut mutated = 0;
    for genome in genomes {
        for matrix in genome.weights_mut() {
            if rng.random_bool(rate.into()) {
                mutate_matrix(matrix, rng);
                mutated += 1;
            }
        }
    }
    log::debug!("mutated {mutated} weight matrices");
    mutated
}

#[cfg(test)]
mod tests {
    use genepool_genome::Topology;
    use proptest::prelude::*;
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    #[test]
    fn test_mutate_matrix_changes_few_cells() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let mut matrix = Array2::<f32>::zeros((10, 7));
            let points = mutate_matrix(&mut matrix, &mut rng);
            assert!((1..=10).contains(&points));
            let changed = matrix.iter().filter(|&&v| v != 0.0).count();
            assert!(changed <= points);
        }
    }

    #[test]
    fn test_mutate_tiny_matrix() {
        let mut rng = StdRng::seed_from_u64(22);
        let mut matrix = Array2::<f32>::from_elem((1, 1), 0.5);
        assert_eq!(mutate_matrix(&mut matrix, &mut rng), 1);
        assert!(WEIGHT_BOUNDS.contains(&matrix[(0, 0)]));
    }

    #[test]
    fn test_rate_zero_and_one() {
        let topology = Topology::new(vec![4, 6, 2]).unwrap();
        let mut rng = StdRng::seed_from_u64(23);
        let original: Vec<Genome> = (0..5).map(|_| Genome::random(&topology, &mut rng)).collect();

        let mut genomes = original.clone();
        assert_eq!(mutate_genomes(&mut genomes, 0.0, &mut rng), 0);
        assert_eq!(genomes, original);

        let mut genomes = original.clone();
        assert_eq!(mutate_genomes(&mut genomes, 1.0, &mut rng), 10);
        for (mutated, original) in genomes.iter().zip(&original) {
            // biases are never mutated
            assert_eq!(mutated.biases(), original.biases());
        }
    }

    proptest! {
        #[test]
        fn test_mutated_cells_stay_in_bounds(
            seed in any::<u64>(),
            rows in 1_usize..12,
            cols in 1_usize..12,
            start in -1.0_f32..=1.0,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut matrix = Array2::from_elem((rows, cols), start);
            for _ in 0..5 {
                mutate_matrix(&mut matrix, &mut rng);
            }
            prop_assert!(matrix.iter().all(|v| WEIGHT_BOUNDS.contains(v)));
        }
    }
}
