//! Demonstration evaluator used by the `train` command.

use std::iter;

use genepool_genome::Genome;
use genepool_training::population::GenomeEvaluator;

/// Scores genomes by how closely their parameters match a hidden target genome.
///
/// Fitness is `1 - mean(|genome - target|) / 2`, which lies in `[0, 1]` for
/// parameters in `[-1, 1]`: identical genomes score 1.
#[derive(Debug, Clone)]
pub(crate) struct TargetEvaluator {
    target: Genome,
    evaluations: usize,
}

impl TargetEvaluator {
    pub(crate) fn new(target: Genome) -> Self {
        Self {
            target,
            evaluations: 0,
        }
    }

    pub(crate) fn evaluations(&self) -> usize {
        self.evaluations
    }
}

impl GenomeEvaluator for TargetEvaluator {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate(&mut self, genome: &Genome) -> f32 {
        self.evaluations += 1;
        let count = self.target.parameter_count();
        if count == 0 {
            return 0.0;
        }
        let distance = iter::zip(genome.parameters(), self.target.parameters())
            .map(|(value, target)| (value - target).abs())
            .sum::<f32>()
            / count as f32;
        (1.0 - distance / 2.0).clamp(0.0, 1.0)
    }
}
