// mod.rs - Core logic module

pub mod classify;
pub mod concat;
pub mod divergence;
pub mod statistics;

// Re-export main types for convenience
pub use classify::classify;
pub use concat::{concatenate, parse_genes, Concatenation, ParsedGene};
pub use divergence::{compute_divergence, DivergenceCell, DivergenceRow, DivergenceTable};
pub use statistics::{compute_statistics, percent, round2, StatisticsReport};
