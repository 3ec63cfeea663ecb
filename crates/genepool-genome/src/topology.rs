use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Error returned when a layer layout cannot describe a network.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TopologyError {
    #[display("topology needs at least 2 layers, got {layers}")]
    TooFewLayers { layers: usize },
    #[display("layer {index} has no neurons")]
    EmptyLayer { index: usize },
    #[display("invalid layer size {text:?}: {source}")]
    InvalidLayerSize { text: String, source: ParseIntError },
}

/// Ordered layer sizes shared by every genome of a run.
///
/// The first layer is the input size and the last layer is the output size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology {
    layers: Vec<usize>,
}

impl Topology {
    /// Creates a topology from layer sizes.
    ///
    /// # Examples
    ///
    /// ```
    /// use genepool_genome::{Topology, TopologyError};
    ///
    /// let topology = Topology::new(vec![3, 10, 2]).unwrap();
    /// assert_eq!(topology.input_size(), 3);
    /// assert_eq!(topology.output_size(), 2);
    ///
    /// assert_eq!(
    ///     Topology::new(vec![3]),
    ///     Err(TopologyError::TooFewLayers { layers: 1 })
    /// );
    /// ```
    pub fn new(layers: Vec<usize>) -> Result<Self, TopologyError> {
        if layers.len() < 2 {
            return Err(TopologyError::TooFewLayers {
                layers: layers.len(),
            });
        }
        if let Some(index) = layers.iter().position(|&size| size == 0) {
            return Err(TopologyError::EmptyLayer { index });
        }
        Ok(Self { layers })
    }

    #[must_use]
    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    #[must_use]
    pub fn input_size(&self) -> usize {
        self.layers[0]
    }

    #[must_use]
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1]
    }

    /// Number of layer-to-layer connections (weight matrices per genome).
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.layers.len() - 1
    }

    /// Shapes `(rows, cols)` of the weight matrices, in order.
    pub fn weight_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.layers.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Lengths of the bias vectors, in order.
    pub fn bias_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.layers[1..].iter().copied()
    }

    /// Total number of weights and biases in one genome.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.weight_shapes()
            .map(|(rows, cols)| rows * cols + cols)
            .sum()
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = TopologyError;

    fn try_from(layers: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(layers)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Self {
        topology.layers
    }
}

/// Parses comma separated layer sizes such as `3,10,2`.
impl FromStr for Topology {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let layers = s
            .split(',')
            .map(str::trim)
            .map(|text| {
                text.parse()
                    .map_err(|source| TopologyError::InvalidLayerSize {
                        text: text.to_owned(),
                        source,
                    })
            })
            .collect::<Result<Vec<usize>, _>>()?;
        Self::new(layers)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, size) in self.layers.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{size}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_follow_adjacent_layers() {
        let topology = Topology::new(vec![4, 6, 2]).unwrap();
        assert_eq!(topology.input_size(), 4);
        assert_eq!(topology.output_size(), 2);
        assert_eq!(topology.connection_count(), 2);
        assert_eq!(
            topology.weight_shapes().collect::<Vec<_>>(),
            vec![(4, 6), (6, 2)]
        );
        assert_eq!(topology.bias_lengths().collect::<Vec<_>>(), vec![6, 2]);
        assert_eq!(topology.parameter_count(), 4 * 6 + 6 + 6 * 2 + 2);
    }

    #[test]
    fn test_rejects_empty_layer() {
        assert_eq!(
            Topology::new(vec![3, 0, 2]),
            Err(TopologyError::EmptyLayer { index: 1 })
        );
        assert_eq!(
            Topology::new(vec![]),
            Err(TopologyError::TooFewLayers { layers: 0 })
        );
    }

    #[test]
    fn test_parse_and_display() {
        let topology: Topology = "3, 10,2".parse().unwrap();
        assert_eq!(topology.layers(), &[3, 10, 2]);
        assert_eq!(topology.to_string(), "3,10,2");

        assert!(matches!(
            "3,x,2".parse::<Topology>(),
            Err(TopologyError::InvalidLayerSize { text, .. }) if text == "x"
        ));
        assert!(matches!(
            "5".parse::<Topology>(),
            Err(TopologyError::TooFewLayers { layers: 1 })
        ));
    }

    #[test]
    fn test_serde_validates_layers() {
        let topology: Topology = serde_json::from_str("[3,10,2]").unwrap();
        assert_eq!(serde_json::to_string(&topology).unwrap(), "[3,10,2]");
        assert!(serde_json::from_str::<Topology>("[3]").is_err());
    }
}
