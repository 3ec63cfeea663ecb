//! Population lifecycle and the evaluation cursor.
//!
//! [`PopulationManager`] owns the current population and walks an external
//! evaluator through it one genome at a time. Every fitness report scores the
//! genome under the cursor and moves the cursor forward; the report for the
//! last genome closes the generation and builds the next population:
//!
//! ```text
//! Evaluating(0) → Evaluating(1) → … → Evaluating(P-1)
//!       ↑                                   │ report
//!       └──────────── repopulate ◄──────────┘
//! ```
//!
//! # Repopulation
//!
//! 1. **Rank** - sort the scored population best first
//! 2. **Select** - copy the elites by value, build the gene pool from elites and laggards
//! 3. **Breed** - draw parent pairs from the gene pool, uniform per-gene crossover
//! 4. **Mutate** - point mutations on the weight matrices of elites and children
//! 5. **Fill** - complete the population with random genomes
//!
//! # Example
//!
//! ```
//! use genepool_training::{params::GeneticAlgorithmParams, population::PopulationManager};
//! use rand::{SeedableRng as _, rngs::StdRng};
//!
//! let params = GeneticAlgorithmParams::new(vec![4, 6, 2], 10, 2, 1, 4, 0.05).unwrap();
//! let mut manager = PopulationManager::new(params, StdRng::seed_from_u64(1)).unwrap();
//!
//! // score the whole population with a stand-in evaluator
//! let summary = manager
//!     .evaluate_generation(&mut |genome: &genepool_genome::Genome| {
//!         genome.weights()[0].sum().abs().min(1.0)
//!     })
//!     .unwrap();
//!
//! assert_eq!(summary.generation, 0);
//! assert_eq!(manager.generation_count(), 1);
//! assert_eq!(manager.cursor(), 0);
//! assert!(manager.best_fitness_so_far().is_some());
//! ```

use genepool_genome::Genome;
use genepool_stats::descriptive::DescriptiveStats;
use rand::Rng;

use crate::{
    breeding, mutation,
    params::{ConfigurationError, GeneticAlgorithmParams},
    rank,
    selection::{self, Selection},
};

/// Error returned by [`PopulationManager::report_fitness`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum PopulationError {
    #[display("no genome pending evaluation at cursor {cursor} (population size {population_size})")]
    InvalidState {
        cursor: usize,
        population_size: usize,
    },
    #[display("fitness reported for genome {cursor} is not finite")]
    InvalidFitness { cursor: usize },
}

/// Scores one genome.
///
/// This is the integration point for whatever runs a genome: a simulation, a
/// game, a test harness. Closures `FnMut(&Genome) -> f32` implement it.
pub trait GenomeEvaluator {
    fn evaluate(&mut self, genome: &Genome) -> f32;
}

impl<F> GenomeEvaluator for F
where
    F: FnMut(&Genome) -> f32,
{
    fn evaluate(&mut self, genome: &Genome) -> f32 {
        self(genome)
    }
}

/// What happened after a fitness report.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum Report {
    /// The next genome of the same generation is now under evaluation.
    Next { cursor: usize },
    /// The generation was complete; a new population is installed and the
    /// cursor is back at 0.
    NewGeneration(GenerationSummary),
}

/// Statistics of a finished generation and of the repopulation that followed.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    /// Index of the generation that was evaluated (0 for the initial population).
    pub generation: usize,
    /// Fitness distribution of the evaluated population.
    pub fitness: DescriptiveStats,
    /// Entries in the gene pool built from the survivors.
    pub gene_pool_size: usize,
    /// Elites plus children carried into the new population.
    pub naturally_selected: usize,
    /// Freshly random genomes completing the new population.
    pub random_fill: usize,
    /// Child pairs bred from ranked slots because the gene pool was empty.
    pub fallback_pairs: usize,
    /// Weight matrices that received point mutations.
    pub mutated_matrices: usize,
}

/// Owns a population of genomes and evolves it as fitness reports arrive.
#[derive(Debug, Clone)]
pub struct PopulationManager<R> {
    params: GeneticAlgorithmParams,
    population: Vec<Genome>,
    cursor: usize,
    generation: usize,
    best: Option<Genome>,
    rng: R,
}

impl<R> PopulationManager<R>
where
    R: Rng,
{
    /// Validates `params` and creates a fully random initial population.
    ///
    /// The manager starts at generation 0 with the cursor on the first genome.
    pub fn new(params: GeneticAlgorithmParams, mut rng: R) -> Result<Self, ConfigurationError> {
        params.validate()?;
        let population = (0..params.population_size)
            .map(|_| Genome::random(&params.topology, &mut rng))
            .collect();
        log::info!(
            "created population of {} genomes with topology [{}]",
            params.population_size,
            params.topology
        );
        Ok(Self {
            params,
            population,
            cursor: 0,
            generation: 0,
            best: None,
            rng,
        })
    }

    #[must_use]
    pub fn params(&self) -> &GeneticAlgorithmParams {
        &self.params
    }

    /// The current population, in evaluation order.
    #[must_use]
    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    #[must_use]
    pub fn population_size(&self) -> usize {
        self.population.len()
    }

    /// Index of the genome currently under evaluation.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The genome the evaluator should run next.
    #[must_use]
    pub fn current_genome(&self) -> &Genome {
        &self.population[self.cursor]
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation_count(&self) -> usize {
        self.generation
    }

    /// Highest fitness ever reported, or `None` before the first report.
    #[must_use]
    pub fn best_fitness_so_far(&self) -> Option<f32> {
        self.best.as_ref().map(Genome::fitness)
    }

    /// Copy of the genome that received [`best_fitness_so_far`](Self::best_fitness_so_far).
    #[must_use]
    pub fn best_genome_so_far(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    /// Records `fitness` for the genome under evaluation and advances the cursor.
    ///
    /// NaN and infinite scores are rejected without changing any state.
    /// Reporting for the last genome of the population triggers
    /// [`repopulate`](Self::repopulate).
    pub fn report_fitness(&mut self, fitness: f32) -> Result<Report, PopulationError> {
        let cursor = self.cursor;
        let population_size = self.population.len();
        let Some(genome) = self.population.get_mut(cursor) else {
            return Err(PopulationError::InvalidState {
                cursor,
                population_size,
            });
        };
        if !fitness.is_finite() {
            return Err(PopulationError::InvalidFitness { cursor });
        }

        genome.set_fitness(fitness);
        if self.best.as_ref().is_none_or(|best| fitness > best.fitness()) {
            self.best = Some(genome.clone());
        }

        if cursor + 1 < population_size {
            self.cursor = cursor + 1;
            return Ok(Report::Next {
                cursor: self.cursor,
            });
        }
        Ok(Report::NewGeneration(self.repopulate()))
    }

    /// Replaces the population with the next generation and resets the cursor.
    ///
    /// Every genome is expected to carry the fitness of the generation being
    /// closed; genomes that were never reported keep the fitness they were
    /// created with.
    pub fn repopulate(&mut self) -> GenerationSummary {
        let params = &self.params;
        let generation = self.generation;

        rank::sort_descending(&mut self.population);
        let ranked = &self.population;
        let fitness = DescriptiveStats::new(ranked.iter().map(Genome::fitness))
            .expect("population is never empty");

        let Selection {
            mut next,
            gene_pool,
        } = selection::select(ranked, params.elite_count, params.laggard_count);
        let breeding = breeding::breed(
            ranked,
            &gene_pool,
            params.children_count,
            &mut next,
            &mut self.rng,
        );

        let naturally_selected = next.len();
        let mutated_matrices =
            mutation::mutate_genomes(&mut next, params.mutation_rate, &mut self.rng);

        let random_fill = params.population_size - naturally_selected;
        next.extend((0..random_fill).map(|_| Genome::random(&params.topology, &mut self.rng)));
        debug_assert_eq!(next.len(), params.population_size);

        self.population = next;
        self.cursor = 0;
        self.generation += 1;

        log::info!(
            "generation {generation} finished: best {:.3}, mean {:.3}, worst {:.3}, gene pool {} entries",
            fitness.max,
            fitness.mean,
            fitness.min,
            gene_pool.len()
        );

        GenerationSummary {
            generation,
            fitness,
            gene_pool_size: gene_pool.len(),
            naturally_selected,
            random_fill,
            fallback_pairs: breeding.fallback_pairs,
            mutated_matrices,
        }
    }

    /// Runs `evaluator` on every remaining genome of the current generation.
    ///
    /// Returns the summary produced when the generation closes.
    pub fn evaluate_generation<E>(
        &mut self,
        evaluator: &mut E,
    ) -> Result<GenerationSummary, PopulationError>
    where
        E: GenomeEvaluator + ?Sized,
    {
        loop {
            let fitness = evaluator.evaluate(self.current_genome());
            if let Report::NewGeneration(summary) = self.report_fitness(fitness)? {
                return Ok(summary);
            }
        }
    }
}
