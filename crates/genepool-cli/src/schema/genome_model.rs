use std::path::Path;

use chrono::{DateTime, Utc};
use genepool_genome::Genome;
use genepool_training::params::GeneticAlgorithmParams;
use serde::{Deserialize, Serialize};

use crate::util;

/// Best genome of a training run, as saved by the `train` command.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct GenomeModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub generations: usize,
    pub final_fitness: f32,
    pub params: GeneticAlgorithmParams,
    pub genome: Genome,
}

impl GenomeModel {
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        util::read_json_file("genome model", path)
    }
}
