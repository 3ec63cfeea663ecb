//! Parameters of the genetic algorithm and their validation.

use genepool_genome::{Topology, TopologyError};
use serde::{Deserialize, Serialize};

/// Error returned when a parameter set cannot drive a population.
///
/// Detected before any population is created.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigurationError {
    #[display("population size must be positive")]
    EmptyPopulation,
    #[display(
        "elites ({elite_count}) + laggards ({laggard_count}) exceed population size ({population_size})"
    )]
    SurvivorsExceedPopulation {
        elite_count: usize,
        laggard_count: usize,
        population_size: usize,
    },
    #[display(
        "elites ({elite_count}) + children ({children_count}) exceed population size ({population_size})"
    )]
    OffspringExceedPopulation {
        elite_count: usize,
        children_count: usize,
        population_size: usize,
    },
    #[display("mutation rate {rate} is outside [0, 1]")]
    InvalidMutationRate { rate: f32 },
    #[display("invalid topology: {_0}")]
    #[from]
    Topology(TopologyError),
}

/// Controls how a population is evaluated, culled and rebuilt.
///
/// The defaults reproduce a small driving controller: 3 sensor inputs, one
/// hidden layer of 10 neurons and 2 outputs, evolved in populations of 85.
///
/// Every field has a default when deserializing, so a parameter file only
/// needs the values it changes:
///
/// ```
/// use genepool_training::params::GeneticAlgorithmParams;
///
/// let params: GeneticAlgorithmParams =
///     serde_json::from_str(r#"{ "population_size": 20, "topology": [4, 6, 2] }"#).unwrap();
/// assert_eq!(params.population_size, 20);
/// assert_eq!(params.elite_count, GeneticAlgorithmParams::default().elite_count);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticAlgorithmParams {
    /// Layer sizes shared by every genome
    pub topology: Topology,
    /// Number of genomes per generation
    pub population_size: usize,
    /// Best-ranked genomes copied by value into the next generation
    pub elite_count: usize,
    /// Worst-ranked genomes that only feed the gene pool
    pub laggard_count: usize,
    /// Children bred per generation (an odd count leaves one slot to random fill)
    pub children_count: usize,
    /// Probability of mutating each weight matrix of a naturally selected genome
    pub mutation_rate: f32,
}

impl Default for GeneticAlgorithmParams {
    fn default() -> Self {
        Self {
            topology: Topology::new(vec![3, 10, 2]).expect("default topology is valid"),
            population_size: 85,
            elite_count: 8,
            laggard_count: 3,
            children_count: 40,
            mutation_rate: 0.055,
        }
    }
}

impl GeneticAlgorithmParams {
    /// Builds and validates a parameter set from raw layer sizes.
    ///
    /// # Examples
    ///
    /// ```
    /// use genepool_training::params::{ConfigurationError, GeneticAlgorithmParams};
    ///
    /// let params = GeneticAlgorithmParams::new(vec![4, 6, 2], 10, 2, 1, 4, 0.1).unwrap();
    /// assert_eq!(params.naturally_selected_count(), 6);
    ///
    /// let err = GeneticAlgorithmParams::new(vec![4, 6, 2], 10, 8, 3, 0, 0.1).unwrap_err();
    /// assert!(matches!(err, ConfigurationError::SurvivorsExceedPopulation { .. }));
    /// ```
    pub fn new(
        layers: Vec<usize>,
        population_size: usize,
        elite_count: usize,
        laggard_count: usize,
        children_count: usize,
        mutation_rate: f32,
    ) -> Result<Self, ConfigurationError> {
        let params = Self {
            topology: Topology::new(layers)?,
            population_size,
            elite_count,
            laggard_count,
            children_count,
            mutation_rate,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks the relations between the counts and the mutation rate.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let Self {
            topology: _,
            population_size,
            elite_count,
            laggard_count,
            children_count,
            mutation_rate,
        } = *self;

        if population_size == 0 {
            return Err(ConfigurationError::EmptyPopulation);
        }
        if elite_count.saturating_add(laggard_count) > population_size {
            return Err(ConfigurationError::SurvivorsExceedPopulation {
                elite_count,
                laggard_count,
                population_size,
            });
        }
        if elite_count.saturating_add(children_count / 2 * 2) > population_size {
            return Err(ConfigurationError::OffspringExceedPopulation {
                elite_count,
                children_count,
                population_size,
            });
        }
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(ConfigurationError::InvalidMutationRate {
                rate: mutation_rate,
            });
        }
        Ok(())
    }

    /// Number of genomes of a new generation that are not randomly filled:
    /// the elites plus every child of a complete pair.
    #[must_use]
    pub fn naturally_selected_count(&self) -> usize {
        self.elite_count + self.children_count / 2 * 2
    }

    /// Number of freshly random genomes completing each new generation.
    #[must_use]
    pub fn random_fill_count(&self) -> usize {
        self.population_size - self.naturally_selected_count()
    }
}
