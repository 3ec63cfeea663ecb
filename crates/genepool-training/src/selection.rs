//! Survivor selection and the fitness-weighted gene pool.
//!
//! After ranking, the best `elite_count` genomes are copied by value into the
//! next generation. Those elites and the worst `laggard_count` genomes also
//! enter the gene pool: each contributes its index once per tenth of fitness,
//! so a genome scoring `0.9` is nine times as likely to be drawn as a parent as
//! one scoring `0.1`. Laggards never survive themselves; they only keep some
//! diversity in the breeding pool.

use genepool_genome::Genome;
use rand::Rng;

/// Fitness is multiplied by this factor before rounding to a pool entry count.
pub const GENE_POOL_SCALE: f64 = 10.0;

/// Number of gene pool entries a genome with `fitness` contributes.
///
/// `fitness * 10` rounded half to even, never negative. Saturates at
/// `usize::MAX` for huge scores.
///
/// ```
/// use genepool_training::selection::gene_pool_weight;
///
/// assert_eq!(gene_pool_weight(0.9), 9);
/// assert_eq!(gene_pool_weight(0.25), 2);
/// assert_eq!(gene_pool_weight(0.0), 0);
/// assert_eq!(gene_pool_weight(-3.0), 0);
/// assert_eq!(gene_pool_weight(f32::MAX), usize::MAX);
/// ```
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn gene_pool_weight(fitness: f32) -> usize {
    let scaled = (f64::from(fitness) * GENE_POOL_SCALE).round_ties_even();
    if scaled > 0.0 { scaled as usize } else { 0 }
}

/// Multiset of indices into the ranked population, drawn from when breeding.
///
/// Stored as `(index, copies)` runs, so the memory used depends on the number
/// of contributors and not on their fitness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenePool {
    entries: Vec<(usize, usize)>,
    len: usize,
}

impl GenePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `copies` entries for `index`.
    pub fn add(&mut self, index: usize, copies: usize) {
        if copies == 0 {
            return;
        }
        self.entries.push((index, copies));
        self.len = self.len.saturating_add(copies);
    }

    /// `(index, copies)` runs in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(usize, usize)] {
        &self.entries
    }

    /// Total number of entries, saturating at `usize::MAX`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// How many times `index` appears in the pool.
    #[must_use]
    pub fn count_of(&self, index: usize) -> usize {
        self.entries
            .iter()
            .filter(|(entry, _)| *entry == index)
            .fold(0, |sum, (_, copies)| sum.saturating_add(*copies))
    }

    /// Draws one entry uniformly, or `None` if the pool is empty.
    pub fn choose<R>(&self, rng: &mut R) -> Option<usize>
    where
        R: Rng + ?Sized,
    {
        if self.is_empty() {
            return None;
        }
        let mut position = rng.random_range(0..self.len);
        for &(index, copies) in &self.entries {
            if position < copies {
                return Some(index);
            }
            position -= copies;
        }
        self.entries.last().map(|&(index, _)| index)
    }
}

/// Result of the selection step.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Start of the next generation: the elite copies, best first.
    pub next: Vec<Genome>,
    /// Breeding pool built from elites and laggards.
    pub gene_pool: GenePool,
}

/// Copies the elites and builds the gene pool from a ranked population.
///
/// Gene pool entries refer to indices of `ranked`, not of the new population.
///
/// # Panics
///
/// Panics if `elite_count + laggard_count` exceeds the population size.
#[must_use]
pub fn select(ranked: &[Genome], elite_count: usize, laggard_count: usize) -> Selection {
    assert!(
        elite_count + laggard_count <= ranked.len(),
        "survivors must fit in the population"
    );

    let mut next = Vec::with_capacity(ranked.len());
    let mut gene_pool = GenePool::new();

    for (index, elite) in ranked.iter().enumerate().take(elite_count) {
        next.push(elite.unscored_copy());
        gene_pool.add(index, gene_pool_weight(elite.fitness()));
    }

    for i in 0..laggard_count {
        let index = ranked.len() - 1 - i;
        gene_pool.add(index, gene_pool_weight(ranked[index].fitness()));
    }

    log::debug!(
        "selected {} elites, gene pool of {} entries from {} contributors",
        next.len(),
        gene_pool.len(),
        elite_count + laggard_count
    );

    Selection { next, gene_pool }
}

#[cfg(test)]
mod tests {
    use genepool_genome::Topology;
    use proptest::prelude::*;
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::rank;

    fn ranked_population(fitness: &[f32]) -> Vec<Genome> {
        let topology = Topology::new(vec![4, 6, 2]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut population: Vec<Genome> = fitness
            .iter()
            .map(|&f| {
                let mut genome = Genome::random(&topology, &mut rng);
                genome.set_fitness(f);
                genome
            })
            .collect();
        rank::sort_descending(&mut population);
        population
    }

    #[test]
    fn test_elites_copied_by_value_with_zero_fitness() {
        let ranked = ranked_population(&[0.9, 0.8, 0.7, 0.6, 0.5]);
        let Selection { next, .. } = select(&ranked, 2, 1);

        assert_eq!(next.len(), 2);
        for (copy, elite) in next.iter().zip(&ranked) {
            assert_eq!(copy.fitness(), 0.0);
            assert_eq!(copy.weights(), elite.weights());
            assert_eq!(copy.biases(), elite.biases());
        }
    }

    #[test]
    fn test_gene_pool_weighted_by_rounded_fitness() {
        let ranked = ranked_population(&[0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1, 0.0]);
        let Selection { gene_pool, .. } = select(&ranked, 2, 2);

        assert_eq!(gene_pool.count_of(0), 9);
        assert_eq!(gene_pool.count_of(1), 8);
        // laggards refer to the ranked population
        assert_eq!(gene_pool.count_of(8), 1);
        assert_eq!(gene_pool.count_of(9), 0);
        assert_eq!(gene_pool.len(), 18);
    }

    #[test]
    fn test_laggards_are_not_copied() {
        let ranked = ranked_population(&[0.5, 0.4, 0.3]);
        let Selection { next, gene_pool } = select(&ranked, 0, 2);
        assert!(next.is_empty());
        assert_eq!(gene_pool.entries(), &[(2, 3), (1, 4)]);
        assert_eq!(gene_pool.len(), 7);
    }

    #[test]
    fn test_non_positive_fitness_gives_empty_pool() {
        let ranked = ranked_population(&[0.0, -1.0, -4.0, 0.04]);
        let Selection { gene_pool, .. } = select(&ranked, 2, 2);
        assert!(gene_pool.is_empty());
        assert_eq!(gene_pool.choose(&mut StdRng::seed_from_u64(0)), None);
    }

    #[test]
    fn test_huge_fitness_does_not_materialize_entries() {
        let ranked = ranked_population(&[f32::MAX, 1e9, 0.5]);
        let Selection { gene_pool, .. } = select(&ranked, 2, 1);

        assert_eq!(gene_pool.entries().len(), 3);
        assert_eq!(gene_pool.count_of(0), usize::MAX);
        assert_eq!(gene_pool.count_of(1), 10_000_000_000);
        assert_eq!(gene_pool.count_of(2), 5);
        assert_eq!(gene_pool.len(), usize::MAX);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(gene_pool.choose(&mut rng).is_some_and(|index| index <= 2));
    }

    #[test]
    fn test_choose_follows_copy_counts() {
        let mut pool = GenePool::new();
        pool.add(4, 1);
        pool.add(7, 0);
        pool.add(2, 3);
        let mut rng = StdRng::seed_from_u64(4);
        let mut counts = [0_usize; 8];
        for _ in 0..4000 {
            counts[pool.choose(&mut rng).unwrap()] += 1;
        }
        assert_eq!(counts[7], 0);
        assert!((800..1200).contains(&counts[4]), "{counts:?}");
        assert!((2800..3200).contains(&counts[2]), "{counts:?}");
    }

    #[test]
    #[should_panic(expected = "survivors")]
    fn test_too_many_survivors_panics() {
        let ranked = ranked_population(&[0.5, 0.4]);
        let _ = select(&ranked, 2, 1);
    }

    proptest! {
        #[test]
        fn test_pool_count_matches_weight(
            fitness in prop::collection::vec(-1.0_f32..2.0, 1..20),
            elite_count in 0_usize..20,
        ) {
            let ranked = ranked_population(&fitness);
            let elite_count = elite_count.min(ranked.len());
            let laggard_count = ranked.len() - elite_count;
            let Selection { gene_pool, .. } = select(&ranked, elite_count, laggard_count);

            for (index, genome) in ranked.iter().enumerate() {
                prop_assert_eq!(gene_pool.count_of(index), gene_pool_weight(genome.fitness()));
            }
        }
    }
}
