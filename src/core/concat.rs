// concat.rs - Parse, register and concatenate gene alignments into a supermatrix

use crate::core::classify::classify;
use crate::core::divergence::{compute_divergence, DivergenceTable};
use crate::core::statistics::{compute_statistics, StatisticsReport};
use crate::data::{
    is_missing, partition_from_records, GeneRecord, GeneSet, PartitionEntry, SequenceType,
    Supermatrix, TaxonRegistry, TaxonSequenceMap, GAP,
};
use crate::diagnostics::{Diagnostic, Diagnostics, LengthFix};
use crate::error::ConcatResult;
use crate::parsers::{sniff_format, GeneFormat};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// A gene that parsed into at least one taxon sequence.
#[derive(Debug, Clone)]
pub struct ParsedGene {
    pub name: String,
    pub format: GeneFormat,
    pub seq_type: SequenceType,
    pub sequences: TaxonSequenceMap,
}

impl ParsedGene {
    /// Length of the first non-empty sequence in file order
    pub fn effective_length(&self) -> usize {
        self.sequences
            .values()
            .map(String::len)
            .find(|len| *len > 0)
            .unwrap_or(0)
    }
}

/// Sniff and parse every gene in parallel, then report issues in input order.
///
/// Genes that fail to parse or yield nothing are left out of the result.
pub fn parse_genes(genes: &GeneSet, diagnostics: &mut Diagnostics) -> Vec<ParsedGene> {
    let results: Vec<_> = genes
        .genes()
        .par_iter()
        .map(|gene| {
            let format = sniff_format(&gene.lines);
            log::debug!("Gene '{}' sniffed as {}", gene.name, format);
            (gene, format, format.parse(&gene.name, &gene.lines))
        })
        .collect();

    let mut parsed = Vec::with_capacity(results.len());
    for (gene, format, result) in results {
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                diagnostics.push(Diagnostic::ParseFailure {
                    gene: gene.name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        for taxon in &output.duplicates {
            diagnostics.push(Diagnostic::DuplicateTaxon {
                gene: gene.name.clone(),
                taxon: taxon.clone(),
            });
        }

        if output.is_empty() {
            diagnostics.push(Diagnostic::EmptyResult {
                gene: gene.name.clone(),
            });
            continue;
        }

        // First sequence that still has a residue once gaps and unknowns are gone
        let seq_type = output
            .sequences
            .values()
            .find(|s| s.bytes().any(|c| !is_missing(c)))
            .map(|s| classify(s))
            .unwrap_or(SequenceType::Unknown);

        parsed.push(ParsedGene {
            name: gene.name.clone(),
            format,
            seq_type,
            sequences: output.sequences,
        });
    }
    parsed
}

/// Fit one taxon's sequence to the gene's effective length.
fn fit_to_length(sequence: &str, length: usize) -> (String, Option<LengthFix>) {
    let found = sequence.len();
    if found == length {
        (sequence.to_string(), None)
    } else if found < length {
        let mut padded = String::with_capacity(length);
        padded.push_str(sequence);
        padded.extend(std::iter::repeat(GAP).take(length - found));
        (padded, Some(LengthFix::Padded))
    } else {
        let cut = (0..=length)
            .rev()
            .find(|i| sequence.is_char_boundary(*i))
            .unwrap_or(0);
        let mut truncated = sequence[..cut].to_string();
        truncated.extend(std::iter::repeat(GAP).take(length - cut));
        (truncated, Some(LengthFix::Truncated))
    }
}

/// Build the supermatrix and finalized gene records, genes strictly in input order.
///
/// Taxa whose row ends up with the wrong total length are dropped from both
/// the matrix and the registry.
pub fn concatenate(
    genes: &[ParsedGene],
    registry: &mut TaxonRegistry,
    diagnostics: &mut Diagnostics,
) -> (Supermatrix, Vec<GeneRecord>) {
    let mut rows: BTreeMap<String, String> =
        registry.iter().map(|t| (t.to_string(), String::new())).collect();
    let mut records = Vec::with_capacity(genes.len());
    let mut position = 1usize;

    for gene in genes {
        let mut record = GeneRecord::placeholder(gene.name.as_str(), gene.seq_type);
        let length = gene.effective_length();
        if length == 0 {
            log::info!("Gene '{}' has no residues, skipping", gene.name);
            record.finalize(position, 0);
            records.push(record);
            continue;
        }

        for (taxon, row) in rows.iter_mut() {
            match gene.sequences.get(taxon) {
                Some(sequence) => {
                    let (fitted, fix) = fit_to_length(sequence, length);
                    if let Some(fix) = fix {
                        diagnostics.push(Diagnostic::LengthMismatch {
                            gene: gene.name.clone(),
                            taxon: taxon.clone(),
                            expected: length,
                            found: sequence.len(),
                            fix,
                        });
                    }
                    row.push_str(&fitted);
                }
                None => row.extend(std::iter::repeat(GAP).take(length)),
            }
        }

        record.finalize(position, length);
        position += length;
        records.push(record);
    }

    let expected = position - 1;
    let mut matrix = Supermatrix::new();
    for (taxon, row) in rows {
        if row.len() != expected {
            registry.remove(&taxon);
            diagnostics.push(Diagnostic::ConsistencyViolation {
                taxon,
                expected,
                found: row.len(),
            });
            continue;
        }
        matrix.insert(taxon, row);
    }

    (matrix, records)
}

/// Owned result of a full parse → concatenate run.
///
/// Derived views (partition, statistics, divergence) are computed from the
/// current state on every call, so row edits are reflected immediately.
#[derive(Debug, Clone)]
pub struct Concatenation {
    records: Vec<GeneRecord>,
    matrix: Supermatrix,
    registry: TaxonRegistry,
    diagnostics: Diagnostics,
}

impl Concatenation {
    pub fn build(genes: &GeneSet) -> Self {
        let mut diagnostics = Diagnostics::new();
        let parsed = parse_genes(genes, &mut diagnostics);
        let mut registry = TaxonRegistry::from_maps(parsed.iter().map(|g| &g.sequences));
        let (matrix, records) = concatenate(&parsed, &mut registry, &mut diagnostics);

        log::info!(
            "Concatenated {} genes across {} taxa ({} columns, {} diagnostics)",
            records.iter().filter(|r| r.length > 0).count(),
            matrix.len(),
            matrix.alignment_length(),
            diagnostics.len()
        );

        Self {
            records,
            matrix,
            registry,
            diagnostics,
        }
    }

    /// Pair names with contents and build; list mismatches are fatal.
    pub fn from_parts(names: Vec<String>, contents: Vec<Vec<String>>) -> ConcatResult<Self> {
        let genes = GeneSet::from_parts(names, contents)?;
        Ok(Self::build(&genes))
    }

    pub fn records(&self) -> &[GeneRecord] {
        &self.records
    }

    pub fn supermatrix(&self) -> &Supermatrix {
        &self.matrix
    }

    pub fn registry(&self) -> &TaxonRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn partition(&self) -> Vec<PartitionEntry> {
        partition_from_records(&self.records)
    }

    pub fn statistics(&self) -> StatisticsReport {
        compute_statistics(&self.matrix, &self.records)
    }

    /// Fresh divergence table; an unknown reference falls back to the first taxon.
    pub fn divergence(&self, reference: Option<&str>) -> DivergenceTable {
        compute_divergence(&self.matrix, &self.records, &self.registry.to_vec(), reference)
    }

    pub fn rename_taxon(&mut self, old: &str, new: &str) -> ConcatResult<()> {
        self.matrix.rename_taxon(old, new)?;
        self.registry.remove(old);
        self.registry.insert(new.trim());
        Ok(())
    }

    pub fn remove_taxon(&mut self, taxon: &str) -> ConcatResult<()> {
        self.matrix.remove_taxon(taxon)?;
        self.registry.remove(taxon);
        Ok(())
    }

    /// Keep only taxa matching the predicate; returns the removed names.
    pub fn retain_taxa<F>(&mut self, keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let removed = self.matrix.retain_taxa(keep);
        for taxon in &removed {
            self.registry.remove(taxon);
        }
        removed
    }
}
