use std::path::PathBuf;

use genepool_stats::descriptive::DescriptiveStats;

use crate::schema::genome_model::GenomeModel;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Genome model file written by `train`
    model: PathBuf,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let InspectArg { model } = arg;
    let model = GenomeModel::open(model)?;
    let GenomeModel {
        name,
        trained_at,
        generations,
        final_fitness,
        params,
        genome,
    } = &model;

    if !genome.matches(&params.topology) {
        anyhow::bail!(
            "Genome shapes do not match the model topology [{}]",
            params.topology
        );
    }

    println!("Name:          {name}");
    println!("Trained at:    {trained_at}");
    println!("Generations:   {generations}");
    println!("Final fitness: {final_fitness:.4}");
    println!("Topology:      [{}]", params.topology);
    println!("Parameters:    {}", genome.parameter_count());

    println!("Weights:");
    for (i, weights) in genome.weights().iter().enumerate() {
        let (rows, cols) = weights.dim();
        print_stats(&format!("  #{i} {rows}x{cols}"), weights.iter().copied());
    }
    println!("Biases:");
    for (i, biases) in genome.biases().iter().enumerate() {
        print_stats(&format!("  #{i} {}", biases.len()), biases.iter().copied());
    }
    Ok(())
}

fn print_stats<I>(label: &str, values: I)
where
    I: IntoIterator<Item = f32>,
{
    match DescriptiveStats::new(values) {
        Some(stats) => println!(
            "{label:<12} min {:+.3}  max {:+.3}  mean {:+.3}  std {:.3}",
            stats.min, stats.max, stats.mean, stats.std_dev
        ),
        None => println!("{label:<12} (empty)"),
    }
}
