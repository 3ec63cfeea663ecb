use std::path::PathBuf;

use genepool_training::params::GeneticAlgorithmParams;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    let DefaultConfigArg { output } = arg;
    Output::new(output.as_deref()).save_json(&GeneticAlgorithmParams::default())
}
