use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use genepool_genome::{Genome, Topology};
use genepool_training::{
    params::GeneticAlgorithmParams,
    population::{GenerationSummary, PopulationManager},
};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

use crate::{
    evaluator::TargetEvaluator,
    schema::genome_model::GenomeModel,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Genetic algorithm parameter file (JSON); omitted fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Layer sizes, comma separated (e.g. `3,10,2`)
    #[arg(long)]
    topology: Option<Topology>,
    /// Number of genomes per generation
    #[arg(long)]
    population_size: Option<usize>,
    /// Best genomes copied into the next generation
    #[arg(long)]
    elites: Option<usize>,
    /// Worst genomes kept in the gene pool
    #[arg(long)]
    laggards: Option<usize>,
    /// Children bred per generation
    #[arg(long)]
    children: Option<usize>,
    /// Probability of mutating each weight matrix
    #[arg(long)]
    mutation_rate: Option<f32>,
    /// Number of generations to evaluate
    #[arg(long, default_value_t = 100)]
    generations: usize,
    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Model name stored in the output
    #[arg(long, default_value = "target-match")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainArg {
    fn load_params(&self) -> anyhow::Result<GeneticAlgorithmParams> {
        let mut params = match &self.config {
            Some(path) => util::read_json_file("parameter", path)?,
            None => GeneticAlgorithmParams::default(),
        };
        if let Some(topology) = &self.topology {
            params.topology = topology.clone();
        }
        if let Some(population_size) = self.population_size {
            params.population_size = population_size;
        }
        if let Some(elites) = self.elites {
            params.elite_count = elites;
        }
        if let Some(laggards) = self.laggards {
            params.laggard_count = laggards;
        }
        if let Some(children) = self.children {
            params.children_count = children;
        }
        if let Some(mutation_rate) = self.mutation_rate {
            params.mutation_rate = mutation_rate;
        }
        params
            .validate()
            .context("Invalid genetic algorithm parameters")?;
        log::debug!("training parameters: {params:?}");
        Ok(params)
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let params = arg.load_params()?;
    let mut rng = match arg.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_os_rng(),
    };

    let mut evaluator = TargetEvaluator::new(Genome::random(&params.topology, &mut rng));
    let mut manager = PopulationManager::new(params.clone(), rng)
        .context("Invalid genetic algorithm parameters")?;

    eprintln!("Training {} generations:", arg.generations);
    eprintln!(
        "  Topology:        [{}] ({} inputs, {} outputs)",
        params.topology,
        params.topology.input_size(),
        params.topology.output_size()
    );
    eprintln!("  Population size: {}", params.population_size);
    eprintln!(
        "  Elites/Laggards/Children: {}/{}/{}",
        params.elite_count, params.laggard_count, params.children_count
    );
    eprintln!("  Mutation rate:   {:.3}", params.mutation_rate);

    for _ in 0..arg.generations {
        let summary = manager.evaluate_generation(&mut evaluator)?;
        print_summary(&summary);
    }

    let Some(best) = manager.best_genome_so_far() else {
        anyhow::bail!("No genome was evaluated; nothing to save");
    };
    eprintln!();
    eprintln!("Evaluations: {}", evaluator.evaluations());
    eprintln!("Best fitness: {:.4}", best.fitness());

    let model = GenomeModel {
        name: arg.name.clone(),
        trained_at: Utc::now(),
        generations: manager.generation_count(),
        final_fitness: best.fitness(),
        params,
        genome: best.clone(),
    };
    let output = Output::new(arg.output.as_deref());
    output.save_json(&model)?;

    eprintln!();
    eprintln!("Model saved successfully");
    eprintln!("  Destination: {output}");
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.4}", model.final_fitness);
    eprintln!("  Parameters: {}", model.genome.parameter_count());

    Ok(())
}

fn print_summary(summary: &GenerationSummary) {
    let GenerationSummary {
        generation,
        fitness,
        gene_pool_size,
        naturally_selected,
        random_fill,
        fallback_pairs,
        mutated_matrices,
    } = summary;
    eprintln!("Generation #{generation}:");
    eprintln!(
        "  Fitness:   best {:.4}  mean {:.4}  worst {:.4}  std {:.4}",
        fitness.max, fitness.mean, fitness.min, fitness.std_dev
    );
    eprintln!(
        "  Next:      {naturally_selected} selected, {random_fill} random, {mutated_matrices} mutated matrices"
    );
    eprintln!("  Gene pool: {gene_pool_size} entries");
    if *fallback_pairs > 0 {
        eprintln!("  ({fallback_pairs} pairs bred by rank, gene pool was empty)");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::command::{CommandArgs, Mode};

    fn train_arg(args: &[&str]) -> TrainArg {
        let args = CommandArgs::try_parse_from(["genepool", "train"].iter().chain(args)).unwrap();
        match args.mode {
            Mode::Train(arg) => arg,
            mode => panic!("unexpected mode {mode:?}"),
        }
    }

    #[test]
    fn test_defaults_without_overrides() {
        let params = train_arg(&[]).load_params().unwrap();
        assert_eq!(params, GeneticAlgorithmParams::default());
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let params = train_arg(&[
            "--topology",
            "4,6,2",
            "--population-size",
            "10",
            "--elites",
            "2",
            "--laggards",
            "1",
            "--children",
            "4",
            "--mutation-rate",
            "0.25",
        ])
        .load_params()
        .unwrap();
        assert_eq!(params.topology.layers(), &[4, 6, 2]);
        assert_eq!(params.population_size, 10);
        assert_eq!(params.elite_count, 2);
        assert_eq!(params.laggard_count, 1);
        assert_eq!(params.children_count, 4);
        assert_eq!(params.mutation_rate, 0.25);
    }

    #[test]
    fn test_invalid_overrides_are_reported() {
        let err = train_arg(&["--population-size", "5"])
            .load_params()
            .unwrap_err();
        assert!(err.to_string().contains("Invalid genetic algorithm parameters"));
    }
}
