// error.rs - Fatal error types for construction and row editing

use thiserror::Error;

/// Errors that abort construction or reject a caller edit.
///
/// Everything recoverable (malformed gene files, length mismatches, empty
/// genes) goes through [`crate::diagnostics::Diagnostics`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConcatError {
    #[error("Received {names} gene names but {contents} gene contents")]
    InputLengthMismatch { names: usize, contents: usize },

    #[error("Gene name at position {0} is empty")]
    EmptyGeneName(usize),

    #[error("Duplicate gene name: '{0}'")]
    DuplicateGeneName(String),

    #[error("Taxon '{0}' not found in supermatrix")]
    TaxonNotFound(String),

    #[error("A taxon named '{0}' already exists")]
    DuplicateTaxon(String),

    #[error("Taxon name cannot be empty")]
    EmptyTaxonName,
}

/// Result type for construction and editing operations.
pub type ConcatResult<T> = Result<T, ConcatError>;
