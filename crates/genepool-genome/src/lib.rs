//! Genome representation for the genepool genetic algorithm.
//!
//! A genome is the parameter set of a fully connected feed-forward controller:
//! one weight matrix and one bias vector per connection between two adjacent
//! layers of a [`Topology`]. The training crate only reads and writes these
//! containers and the fitness score; how a genome is run is left to the
//! evaluator that scores it.
//!
//! # Shapes
//!
//! For a topology `[n0, n1, ..., nk]`, connection `i` owns:
//!
//! - a weight matrix of shape `(n_i, n_{i+1})`
//! - a bias vector of length `n_{i+1}`
//!
//! ```
//! use genepool_genome::{Genome, Topology};
//! use rand::{SeedableRng as _, rngs::StdRng};
//!
//! let topology: Topology = "4,6,2".parse().unwrap();
//! let genome = Genome::random(&topology, &mut StdRng::seed_from_u64(7));
//!
//! assert_eq!(genome.weights().len(), 2);
//! assert_eq!(genome.weights()[0].dim(), (4, 6));
//! assert_eq!(genome.biases()[1].len(), 2);
//! assert!(genome.matches(&topology));
//! ```

pub use self::{genome::*, topology::*};

mod genome;
mod topology;
