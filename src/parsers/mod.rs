// mod.rs - Gene file format detection and parser dispatch

pub mod fasta;
pub mod genbank;
pub mod nexus;
pub mod traits;

pub use fasta::{FastaParser, PlainParser};
pub use genbank::{GenBankError, GenBankParser};
pub use nexus::{NexusError, NexusParser};
pub use traits::{clean_sequence, GeneParser, ParseOutput, SequenceCollector};

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Structural failure of one gene file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("NEXUS: {0}")]
    Nexus(#[from] NexusError),

    #[error("GenBank: {0}")]
    GenBank(#[from] GenBankError),
}

/// Format picked by [`sniff_format`], one variant per grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GeneFormat {
    Fasta,
    Nexus,
    GenBank,
    Plain,
}

impl GeneFormat {
    /// Run the matching parser over the gene's lines.
    pub fn parse(self, gene_name: &str, lines: &[String]) -> Result<ParseOutput, ParseError> {
        match self {
            GeneFormat::Fasta => FastaParser.parse(gene_name, lines),
            GeneFormat::Nexus => NexusParser.parse(gene_name, lines),
            GeneFormat::GenBank => GenBankParser.parse(gene_name, lines),
            GeneFormat::Plain => PlainParser.parse(gene_name, lines),
        }
    }
}

impl fmt::Display for GeneFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneFormat::Fasta => FastaParser.name(),
            GeneFormat::Nexus => NexusParser.name(),
            GeneFormat::GenBank => GenBankParser.name(),
            GeneFormat::Plain => PlainParser.name(),
        };
        write!(f, "{}", name)
    }
}

/// Choose a grammar from the whole file content, case-insensitively.
///
/// NEXUS wins over GenBank, GenBank over FASTA; anything else is `Plain`.
pub fn sniff_format(lines: &[String]) -> GeneFormat {
    let joined = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();
    let normalized = joined.split_whitespace().collect::<Vec<_>>().join(" ");

    if normalized.starts_with("#nexus")
        || normalized.contains("begin data")
        || normalized.contains("begin characters")
    {
        return GeneFormat::Nexus;
    }

    let genbank_marker = joined
        .lines()
        .any(|l| l.starts_with("locus ") || l.starts_with("version ") || l == "origin");
    if normalized.starts_with("locus") || genbank_marker {
        return GeneFormat::GenBank;
    }

    if normalized.starts_with('>') {
        return GeneFormat::Fasta;
    }

    GeneFormat::Plain
}
