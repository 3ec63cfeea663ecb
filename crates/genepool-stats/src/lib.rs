//! Statistical summaries for the genepool workspace.
//!
//! The training loop reports a summary of every finished generation. This crate
//! keeps the arithmetic for those summaries out of the evolutionary code.
//!
//! # Examples
//!
//! ```
//! use genepool_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [0.2, 0.9, 0.4, 0.5];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.count, 4);
//! assert_eq!(stats.max, 0.9);
//! ```

pub mod descriptive;
