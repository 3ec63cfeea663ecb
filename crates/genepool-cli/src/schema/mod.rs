pub(crate) mod genome_model;
