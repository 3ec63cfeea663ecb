//! Parent drawing and uniform per-gene crossover.
//!
//! Children are bred in pairs. Each pair draws two parents from the gene pool,
//! then inherits every weight matrix and every bias vector independently: a
//! coin flip decides whether child 1 takes the gene of parent A (and child 2
//! the gene of parent B) or the other way around. Genes are never blended, so
//! each slot of a child is an exact copy of the same slot of one parent.

use genepool_genome::Genome;
use rand::Rng;

use crate::selection::GenePool;

/// Attempts at drawing two different parents before accepting a self-pairing.
pub const MAX_PARENT_DRAWS: usize = 100;

/// Probability that child 1 inherits a gene from parent A.
pub const INHERIT_FROM_FIRST_PARENT: f64 = 0.5;

/// Where the parents of a pair came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ParentSource {
    /// Drawn from a non-empty gene pool.
    GenePool,
    /// The gene pool was empty; parents are the ranked genomes at the pair's slot.
    RankFallback,
}

/// Picks the parent indices for the pair starting at child `slot`.
///
/// With a non-empty pool, up to [`MAX_PARENT_DRAWS`] attempts are made to draw
/// two different indices; if all fail, the last (equal) draw is used. With an
/// empty pool the parents are `slot` and `slot + 1` of the ranked population.
pub fn draw_parents<R>(
    gene_pool: &GenePool,
    slot: usize,
    rng: &mut R,
) -> (usize, usize, ParentSource)
where
    R: Rng + ?Sized,
{
    let mut parents = (slot, slot + 1);
    if gene_pool.is_empty() {
        return (parents.0, parents.1, ParentSource::RankFallback);
    }

    for _ in 0..MAX_PARENT_DRAWS {
        if let (Some(a), Some(b)) = (gene_pool.choose(rng), gene_pool.choose(rng)) {
            parents = (a, b);
        }
        if parents.0 != parents.1 {
            break;
        }
    }
    (parents.0, parents.1, ParentSource::GenePool)
}

/// Breeds two children from `a` and `b` by uniform crossover.
///
/// Both children start with fitness `0.0` and own copies of their genes.
pub fn crossover<R>(a: &Genome, b: &Genome, rng: &mut R) -> (Genome, Genome)
where
    R: Rng + ?Sized,
{
    let mut first = a.unscored_copy();
    let mut second = b.unscored_copy();

    for (x, y) in first.weights_mut().iter_mut().zip(second.weights_mut()) {
        if !rng.random_bool(INHERIT_FROM_FIRST_PARENT) {
            std::mem::swap(x, y);
        }
    }
    for (x, y) in first.biases_mut().iter_mut().zip(second.biases_mut()) {
        if !rng.random_bool(INHERIT_FROM_FIRST_PARENT) {
            std::mem::swap(x, y);
        }
    }

    (first, second)
}

/// Summary of one breeding step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreedingOutcome {
    /// Number of child pairs appended.
    pub pairs: usize,
    /// Pairs whose parents came from [`ParentSource::RankFallback`].
    pub fallback_pairs: usize,
}

/// Appends `children_count / 2` pairs of children to `next`.
///
/// Parent indices refer to `ranked`. An odd `children_count` breeds one child
/// less, leaving that slot to be filled randomly.
///
/// # Panics
///
/// Panics if the gene pool is empty and `ranked` has fewer than
/// `children_count` genomes to fall back on.
pub fn breed<R>(
    ranked: &[Genome],
    gene_pool: &GenePool,
    children_count: usize,
    next: &mut Vec<Genome>,
    rng: &mut R,
) -> BreedingOutcome
where
    R: Rng + ?Sized,
{
    let mut outcome = BreedingOutcome::default();
    if gene_pool.is_empty() && children_count >= 2 {
        log::warn!("gene pool is empty, pairing parents by rank");
    }

    for slot in (0..children_count / 2).map(|pair| pair * 2) {
        let (a, b, source) = draw_parents(gene_pool, slot, rng);
        if source.is_rank_fallback() {
            outcome.fallback_pairs += 1;
        }
        let (first, second) = crossover(&ranked[a], &ranked[b], rng);
        next.push(first);
        next.push(second);
        outcome.pairs += 1;
    }

    log::debug!(
        "bred {} children ({} pairs by rank fallback)",
        outcome.pairs * 2,
        outcome.fallback_pairs
    );
    outcome
}
