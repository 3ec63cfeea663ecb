use std::ops::RangeInclusive;

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Topology, TopologyError};

/// Range every weight and bias of a freshly created genome is drawn from.
///
/// Values are sampled independently and uniformly.
pub const INIT_RANGE: RangeInclusive<f32> = -1.0..=1.0;

/// Error returned when weight and bias shapes do not form a layer chain.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GenomeShapeError {
    #[display("genome has {weights} weight matrices but {biases} bias vectors")]
    CountMismatch { weights: usize, biases: usize },
    #[display("weight matrix {index} has {rows} rows, previous layer has {expected} neurons")]
    DisconnectedLayer {
        index: usize,
        rows: usize,
        expected: usize,
    },
    #[display("bias vector {index} has length {len}, weight matrix has {expected} columns")]
    BiasLength {
        index: usize,
        len: usize,
        expected: usize,
    },
    #[display("{_0}")]
    Topology(TopologyError),
}

/// A single candidate controller: weight matrices, bias vectors and a fitness score.
///
/// A genome owns its matrices. Cloning produces an independent deep copy, so a
/// copied genome can be mutated without affecting the original.
///
/// Deserialization checks that the shapes chain into a valid [`Topology`]. It
/// cannot know which topology a run expects, so callers loading a genome for a
/// given run still compare it with [`Genome::matches`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GenomeData")]
pub struct Genome {
    weights: Vec<Array2<f32>>,
    biases: Vec<Array1<f32>>,
    fitness: f32,
}

impl Genome {
    /// Creates a genome with every parameter drawn from [`INIT_RANGE`].
    ///
    /// Fitness starts at `0.0`.
    pub fn random<R>(topology: &Topology, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = topology
            .weight_shapes()
            .map(|shape| Array2::from_shape_simple_fn(shape, || rng.random_range(INIT_RANGE)))
            .collect();
        let biases = topology
            .bias_lengths()
            .map(|len| Array1::from_shape_simple_fn(len, || rng.random_range(INIT_RANGE)))
            .collect();
        Self {
            weights,
            biases,
            fitness: 0.0,
        }
    }

    /// Creates a genome with every parameter set to zero.
    #[must_use]
    pub fn zeros(topology: &Topology) -> Self {
        Self {
            weights: topology.weight_shapes().map(Array2::zeros).collect(),
            biases: topology.bias_lengths().map(Array1::zeros).collect(),
            fitness: 0.0,
        }
    }

    /// Deep copy of this genome with the fitness reset to `0.0`.
    ///
    /// This is how a genome is carried into the next generation: its values
    /// survive, its score does not.
    #[must_use]
    pub fn unscored_copy(&self) -> Self {
        Self {
            weights: self.weights.clone(),
            biases: self.biases.clone(),
            fitness: 0.0,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &[Array2<f32>] {
        &self.weights
    }

    /// Mutable access to the weight matrices.
    ///
    /// Replacing a matrix with one of a different shape breaks the genome's
    /// topology; callers only swap in matrices taken from the same slot of a
    /// genome with the same topology.
    pub fn weights_mut(&mut self) -> &mut [Array2<f32>] {
        &mut self.weights
    }

    #[must_use]
    pub fn biases(&self) -> &[Array1<f32>] {
        &self.biases
    }

    /// Mutable access to the bias vectors. The same shape rule as
    /// [`Genome::weights_mut`] applies.
    pub fn biases_mut(&mut self) -> &mut [Array1<f32>] {
        &mut self.biases
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    /// Returns `true` if every matrix and vector has the shape `topology` prescribes.
    #[must_use]
    pub fn matches(&self, topology: &Topology) -> bool {
        self.weights.len() == topology.connection_count()
            && self.biases.len() == topology.connection_count()
            && self
                .weights
                .iter()
                .zip(topology.weight_shapes())
                .all(|(w, shape)| w.dim() == shape)
            && self
                .biases
                .iter()
                .zip(topology.bias_lengths())
                .all(|(b, len)| b.len() == len)
    }

    /// Layer layout implied by the weight and bias shapes.
    pub fn topology(&self) -> Result<Topology, GenomeShapeError> {
        let Self {
            weights, biases, ..
        } = self;
        if weights.len() != biases.len() {
            return Err(GenomeShapeError::CountMismatch {
                weights: weights.len(),
                biases: biases.len(),
            });
        }

        let mut layers = Vec::with_capacity(weights.len() + 1);
        for (index, (w, b)) in weights.iter().zip(biases).enumerate() {
            let (rows, cols) = w.dim();
            match layers.last() {
                None => layers.push(rows),
                Some(&expected) if expected != rows => {
                    return Err(GenomeShapeError::DisconnectedLayer {
                        index,
                        rows,
                        expected,
                    });
                }
                Some(_) => {}
            }
            if b.len() != cols {
                return Err(GenomeShapeError::BiasLength {
                    index,
                    len: b.len(),
                    expected: cols,
                });
            }
            layers.push(cols);
        }
        Topology::new(layers).map_err(GenomeShapeError::Topology)
    }

    /// Iterates over every weight followed by every bias.
    pub fn parameters(&self) -> impl Iterator<Item = f32> + '_ {
        self.weights
            .iter()
            .flat_map(|w| w.iter().copied())
            .chain(self.biases.iter().flat_map(|b| b.iter().copied()))
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.weights.iter().map(Array2::len).sum::<usize>()
            + self.biases.iter().map(Array1::len).sum::<usize>()
    }
}

/// Serialized form of [`Genome`], checked before it becomes one.
#[derive(Deserialize)]
struct GenomeData {
    weights: Vec<Array2<f32>>,
    biases: Vec<Array1<f32>>,
    fitness: f32,
}

impl TryFrom<GenomeData> for Genome {
    type Error = GenomeShapeError;

    fn try_from(data: GenomeData) -> Result<Self, Self::Error> {
        let GenomeData {
            weights,
            biases,
            fitness,
        } = data;
        let genome = Self {
            weights,
            biases,
            fitness,
        };
        genome.topology()?;
        Ok(genome)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    fn topology() -> Topology {
        Topology::new(vec![4, 6, 2]).unwrap()
    }

    #[test]
    fn test_random_values_within_init_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let genome = Genome::random(&topology(), &mut rng);
        assert!(genome.matches(&topology()));
        assert_eq!(genome.fitness(), 0.0);
        assert_eq!(genome.parameter_count(), topology().parameter_count());
        assert!(genome.parameters().all(|v| INIT_RANGE.contains(&v)));
    }

    #[test]
    fn test_random_genomes_differ() {
        let mut rng = StdRng::seed_from_u64(2);
        let a = Genome::random(&topology(), &mut rng);
        let b = Genome::random(&topology(), &mut rng);
        assert_ne!(a.weights(), b.weights());
    }

    #[test]
    fn test_unscored_copy_is_independent() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut original = Genome::random(&topology(), &mut rng);
        original.set_fitness(4.5);

        let mut copy = original.unscored_copy();
        assert_eq!(copy.fitness(), 0.0);
        assert_eq!(copy.weights(), original.weights());
        assert_eq!(copy.biases(), original.biases());

        copy.weights_mut()[0][(0, 0)] = 42.0;
        assert_ne!(original.weights()[0][(0, 0)], 42.0);
    }

    #[test]
    fn test_matches_detects_shape_mismatch() {
        let genome = Genome::zeros(&topology());
        assert!(!genome.matches(&Topology::new(vec![4, 5, 2]).unwrap()));
        assert!(!genome.matches(&Topology::new(vec![4, 6]).unwrap()));
    }

    #[test]
    fn test_topology_is_inferred_from_shapes() {
        let genome = Genome::zeros(&topology());
        assert_eq!(genome.topology(), Ok(topology()));

        let mut broken = genome.clone();
        broken.biases_mut()[1] = Array1::zeros(3);
        assert_eq!(
            broken.topology(),
            Err(GenomeShapeError::BiasLength {
                index: 1,
                len: 3,
                expected: 2
            })
        );

        let mut broken = genome;
        broken.weights_mut()[1] = Array2::zeros((5, 2));
        assert_eq!(
            broken.topology(),
            Err(GenomeShapeError::DisconnectedLayer {
                index: 1,
                rows: 5,
                expected: 6
            })
        );
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_shapes() {
        let genome = Genome::zeros(&topology());
        let mut json = serde_json::to_value(&genome).unwrap();
        json["biases"].as_array_mut().unwrap().pop();
        let err = serde_json::from_value::<Genome>(json).unwrap_err();
        assert!(err.to_string().contains("2 weight matrices but 1 bias vectors"));

        let empty = r#"{"weights":[],"biases":[],"fitness":0.0}"#;
        assert!(serde_json::from_str::<Genome>(empty).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut genome = Genome::random(&topology(), &mut rng);
        genome.set_fitness(0.25);
        let json = serde_json::to_string(&genome).unwrap();
        let restored: Genome = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, genome);
    }
}
