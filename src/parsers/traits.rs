// traits.rs - Shared contract for gene file parsers

use super::ParseError;
use crate::data::TaxonSequenceMap;
use std::fmt::Debug;

/// What a parser hands back: the taxon map plus labels that were overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    pub sequences: TaxonSequenceMap,
    pub duplicates: Vec<String>,
}

impl ParseOutput {
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Maps the raw lines of one gene file to a taxon → sequence map.
///
/// `Ok` with an empty map means the file was understood but held no data;
/// `Err` means its structure was not recognised.
pub trait GeneParser: Send + Sync + Debug {
    fn parse(&self, gene_name: &str, lines: &[String]) -> Result<ParseOutput, ParseError>;

    /// Human-readable format name
    fn name(&self) -> &'static str;
}

/// Uppercase and drop whitespace and digits; any non-ASCII character
/// becomes `?` so one byte is always one alignment column.
pub fn clean_sequence(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_digit())
        .map(|c| if c.is_ascii() { c.to_ascii_uppercase() } else { '?' })
        .collect()
}

/// Accumulates finished sequences, skipping empty ones and noting overwrites.
#[derive(Debug, Default)]
pub struct SequenceCollector {
    output: ParseOutput,
}

impl SequenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, taxon: String, raw: &str) {
        let sequence = clean_sequence(raw);
        if sequence.is_empty() {
            return;
        }
        if self
            .output
            .sequences
            .insert(taxon.clone(), sequence)
            .is_some()
        {
            self.output.duplicates.push(taxon);
        }
    }

    pub fn finish(self) -> ParseOutput {
        self.output
    }
}
