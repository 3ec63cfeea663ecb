//! Evolution of weight/bias genomes with a gene-pool genetic algorithm.
//!
//! This crate implements the generational loop that improves a population of
//! [`Genome`](genepool_genome::Genome)s using fitness scores supplied by an
//! external evaluator. It does not know how a genome is run or how fitness is
//! computed; it only ranks, culls, breeds and mutates.
//!
//! # How Training Works
//!
//! 1. **Population** - Create `population_size` random genomes
//! 2. **Evaluation** - The evaluator scores the genome under the cursor and reports back
//! 3. **Ranking** - Once every genome is scored, sort best first ([`rank`])
//! 4. **Selection** - Copy elites, build the fitness-weighted gene pool ([`selection`])
//! 5. **Breeding** - Uniform per-gene crossover of gene pool parents ([`breeding`])
//! 6. **Mutation** - Bounded point mutation of weight matrices ([`mutation`])
//! 7. **Random fill** - Complete the next generation with fresh random genomes
//!
//! Steps 3–7 run inside [`population::PopulationManager::repopulate`], which is
//! triggered by the fitness report for the last genome of a generation.
//!
//! # Architecture
//!
//! ```text
//! Evaluator (simulation, game, ...)
//!     ↓ current_genome()        ↑ report_fitness(f)
//! PopulationManager ── rank → select → breed → mutate → fill
//!     ↓ owns
//! Population (Vec<Genome>, fixed size)
//! ```
//!
//! # Parameters
//!
//! See [`params::GeneticAlgorithmParams`]:
//!
//! - **Population size** - Number of genomes per generation
//! - **Elites** - Top genomes copied by value into the next generation
//! - **Laggards** - Bottom genomes that only feed the gene pool
//! - **Children** - Offspring bred per generation, in pairs
//! - **Mutation rate** - Probability of mutating each weight matrix
//!
//! # Current Limitations
//!
//! - **Fitness scale**: gene pool weights assume fitness roughly in `[0, 1]`;
//!   fitness `f` contributes `round(f * 10)` entries, so large scores produce
//!   large pools and scores below `0.05` contribute nothing
//! - **Single-threaded**: genomes are evaluated one at a time through the cursor
//! - **Biases never mutate**: only weight matrices are perturbed

pub mod breeding;
pub mod mutation;
pub mod params;
pub mod population;
pub mod rank;
pub mod selection;
