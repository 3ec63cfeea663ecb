//! Ranking of a scored population.

use genepool_genome::Genome;

/// Sorts `population` by fitness, best first.
///
/// The sort is stable: genomes with equal fitness keep their previous relative
/// order, so the earlier index wins a tie.
///
/// # Examples
///
/// ```
/// use genepool_genome::{Genome, Topology};
/// use genepool_training::rank;
///
/// let topology: Topology = "2,2".parse().unwrap();
/// let mut population: Vec<Genome> = [0.1, 0.7, 0.4]
///     .into_iter()
///     .map(|fitness| {
///         let mut genome = Genome::zeros(&topology);
///         genome.set_fitness(fitness);
///         genome
///     })
///     .collect();
///
/// rank::sort_descending(&mut population);
/// let order: Vec<f32> = population.iter().map(Genome::fitness).collect();
/// assert_eq!(order, [0.7, 0.4, 0.1]);
/// ```
pub fn sort_descending(population: &mut [Genome]) {
    population.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
}

/// Returns `true` if `population` is ordered best first.
#[must_use]
pub fn is_ranked(population: &[Genome]) -> bool {
    population.is_sorted_by(|a, b| a.fitness() >= b.fitness())
}
