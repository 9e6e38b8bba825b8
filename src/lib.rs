// lib.rs - supermatrix library root

//! # supermatrix - Concatenate per-gene alignments into a partitioned supermatrix
//!
//! This library reads per-gene multiple sequence alignments written in
//! loosely structured text formats and joins them into a single alignment
//! keyed by taxon, together with the coordinate partition of every gene and
//! comparative statistics for downstream phylogenetics tools.
//!
//! ## Features
//!
//! - **Format sniffing**: FASTA, NEXUS (sequential or interleaved), GenBank and plain sequence text
//! - **Gap filling**: absent taxa are filled with gaps, length mismatches are padded or truncated
//! - **Partitions**: 1-based inclusive gene ranges tagged DNA, Protein or Unknown
//! - **Statistics**: missing data per taxon and per gene, taxon-gene sparsity
//! - **Divergence**: per-gene mismatch percentages against a selectable reference taxon
//! - **Diagnostics**: malformed inputs are skipped and reported, never fatal
//!
//! ## Basic Usage
//!
//! ```rust
//! use supermatrix::prelude::*;
//!
//! let genes = GeneSet::new(vec![
//!     GeneInput::from_text("gene1", ">A\nACGT\n>B\nACGT\n"),
//!     GeneInput::from_text("gene2", ">A\nTTTT\n>C\nGGGG\n"),
//! ])?;
//!
//! let result = Concatenation::build(&genes);
//! assert_eq!(result.supermatrix().get("C"), Some("----GGGG"));
//! assert_eq!(result.partition()[1].range, "5-8");
//!
//! let divergence = result.divergence(Some("A"));
//! assert_eq!(divergence.cell("B", "gene1").map(|c| c.mismatches), Some(0));
//! # Ok::<(), supermatrix::ConcatError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod parsers;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{classify, compute_divergence, compute_statistics};
    pub use crate::core::{Concatenation, DivergenceCell, DivergenceTable, StatisticsReport};
    pub use crate::data::{GeneInput, GeneRecord, GeneSet, PartitionEntry, SequenceType};
    pub use crate::data::{Supermatrix, TaxonRegistry, TaxonSequenceMap};
    pub use crate::diagnostics::{Diagnostic, Diagnostics};
    pub use crate::error::{ConcatError, ConcatResult};
    pub use crate::output::{write_supermatrix, MatrixFormat};
    pub use crate::parsers::{sniff_format, GeneFormat};
}

// Re-export main types at the root level for convenience
pub use core::Concatenation;
pub use data::{GeneInput, GeneSet, Supermatrix};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{ConcatError, ConcatResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "supermatrix v{} - Multi-gene alignment concatenation",
        VERSION
    )
}
