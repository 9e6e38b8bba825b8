// mod.rs - Data structures module

pub mod gene;
pub mod registry;
pub mod supermatrix;

// Re-export main types for convenience
pub use gene::{
    partition_from_records, GeneInput, GeneRecord, GeneSet, PartitionEntry, SequenceType,
    TaxonSequenceMap,
};
pub use registry::TaxonRegistry;
pub use supermatrix::{is_missing, Supermatrix, GAP, UNKNOWN};
