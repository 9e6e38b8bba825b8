// gene.rs - Gene inputs, gene records and partition entries

use crate::error::{ConcatError, ConcatResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Taxon identifier → raw sequence, in the order taxa appear in the file
pub type TaxonSequenceMap = IndexMap<String, String>;

/// Residue alphabet inferred for a gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceType {
    #[serde(rename = "DNA")]
    Dna,
    Protein,
    Unknown,
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceType::Dna => write!(f, "DNA"),
            SequenceType::Protein => write!(f, "Protein"),
            SequenceType::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for SequenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dna" => Ok(SequenceType::Dna),
            "protein" => Ok(SequenceType::Protein),
            "unknown" => Ok(SequenceType::Unknown),
            _ => Err(format!("Invalid sequence type: {}. Use: DNA, Protein, Unknown", s)),
        }
    }
}

/// One gene file as handed over by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneInput {
    pub name: String,
    pub lines: Vec<String>,
}

impl GeneInput {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    /// Split a text blob into lines
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, text.lines().map(str::to_string).collect())
    }
}

/// Validated, ordered collection of gene inputs with unique names.
#[derive(Debug, Clone, Default)]
pub struct GeneSet {
    genes: Vec<GeneInput>,
}

impl GeneSet {
    /// Pair caller-assigned names with file contents.
    ///
    /// Fails when the two lists differ in length, or a name is empty or repeated.
    pub fn from_parts(names: Vec<String>, contents: Vec<Vec<String>>) -> ConcatResult<Self> {
        if names.len() != contents.len() {
            return Err(ConcatError::InputLengthMismatch {
                names: names.len(),
                contents: contents.len(),
            });
        }
        let genes = names
            .into_iter()
            .zip(contents)
            .map(|(name, lines)| GeneInput::new(name, lines))
            .collect();
        Self::new(genes)
    }

    pub fn new(genes: Vec<GeneInput>) -> ConcatResult<Self> {
        let mut seen = HashSet::new();
        for (i, gene) in genes.iter().enumerate() {
            if gene.name.trim().is_empty() {
                return Err(ConcatError::EmptyGeneName(i));
            }
            if !seen.insert(gene.name.as_str()) {
                return Err(ConcatError::DuplicateGeneName(gene.name.clone()));
            }
        }
        Ok(Self { genes })
    }

    pub fn genes(&self) -> &[GeneInput] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// Gene metadata with its 1-based inclusive coordinates in the supermatrix.
///
/// Created as a placeholder when the gene is parsed; `length`, `start` and
/// `end` are only meaningful after [`GeneRecord::finalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRecord {
    pub name: String,
    pub seq_type: SequenceType,
    pub length: usize,
    pub start: usize,
    pub end: usize,
}

impl GeneRecord {
    pub fn placeholder(name: impl Into<String>, seq_type: SequenceType) -> Self {
        Self {
            name: name.into(),
            seq_type,
            length: 0,
            start: 0,
            end: 0,
        }
    }

    /// Assign the coordinate range starting at `start`.
    pub fn finalize(&mut self, start: usize, length: usize) {
        self.length = length;
        self.start = start;
        self.end = if length > 0 { start + length - 1 } else { start };
    }

    /// 0-based half-open slice range, `None` for zero-length or unplaced records
    pub fn span(&self) -> Option<std::ops::Range<usize>> {
        if self.length == 0 || self.start == 0 || self.end < self.start {
            return None;
        }
        Some(self.start - 1..self.end)
    }

    pub fn range_label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

/// One row of the partition: `(gene name, "start-end", gene type)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionEntry {
    pub name: String,
    pub range: String,
    pub seq_type: SequenceType,
}

impl PartitionEntry {
    /// Parse the `start-end` label back into numbers
    pub fn bounds(&self) -> Option<(usize, usize)> {
        let (start, end) = self.range.split_once('-')?;
        Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
    }
}

/// Build the partition from finalized records, skipping zero-length genes.
pub fn partition_from_records(records: &[GeneRecord]) -> Vec<PartitionEntry> {
    records
        .iter()
        .filter(|r| r.length > 0)
        .map(|r| PartitionEntry {
            name: r.name.clone(),
            range: r.range_label(),
            seq_type: r.seq_type,
        })
        .collect()
}
