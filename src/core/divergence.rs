// divergence.rs - Reference-relative per-gene mismatch percentages

use crate::core::statistics::{percent, round2};
use crate::data::{is_missing, GeneRecord, Supermatrix};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Highest value the leading integer percent may take
pub const MAX_ROUNDED_PERCENT: u32 = 99;

/// One (taxon, gene) comparison against the reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DivergenceCell {
    /// Whole-number percent, clamped to `0..=99`
    pub rounded: u32,
    pub mismatches: usize,
    /// Percent rounded to two decimals
    pub percent: f64,
}

impl DivergenceCell {
    /// Zero-mismatch cell used for the reference taxon
    pub const fn sentinel() -> Self {
        Self {
            rounded: 0,
            mismatches: 0,
            percent: 0.0,
        }
    }

    fn from_counts(mismatches: usize, length: usize) -> (Self, f64) {
        let precise = mismatches as f64 * 100.0 / length as f64;
        let rounded = precise.round().clamp(0.0, MAX_ROUNDED_PERCENT as f64) as u32;
        let cell = Self {
            rounded,
            mismatches,
            percent: percent(mismatches, length),
        };
        (cell, precise)
    }
}

impl fmt::Display for DivergenceCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {:.2}%)", self.rounded, self.mismatches, self.percent)
    }
}

/// Per-taxon summary plus one cell per gene (`None` when uncomputable).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivergenceRow {
    pub total_score: f64,
    pub charset_count: usize,
    pub cells: IndexMap<String, Option<DivergenceCell>>,
}

/// Fresh divergence table for one reference taxon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivergenceTable {
    /// `None` only when there were no taxa to compare
    pub reference: Option<String>,
    pub genes: Vec<String>,
    pub rows: BTreeMap<String, DivergenceRow>,
}

impl DivergenceTable {
    pub fn row(&self, taxon: &str) -> Option<&DivergenceRow> {
        self.rows.get(taxon)
    }

    pub fn cell(&self, taxon: &str, gene: &str) -> Option<&DivergenceCell> {
        self.rows.get(taxon)?.cells.get(gene)?.as_ref()
    }
}

/// Count positions where both residues are present and differ, ignoring case.
pub fn count_mismatches(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .filter(|(x, y)| !is_missing(**x) && !is_missing(**y) && !x.eq_ignore_ascii_case(y))
        .count()
}

fn has_residue(segment: &[u8]) -> bool {
    segment.iter().any(|c| !is_missing(*c))
}

/// Pick the requested reference if it has a row, else the first taxon in sorted order.
fn resolve_reference(matrix: &Supermatrix, taxa: &[String], requested: Option<&str>) -> Option<String> {
    if let Some(name) = requested {
        if matrix.contains(name) {
            return Some(name.to_string());
        }
        log::warn!("Reference taxon '{}' not found, using default", name);
    }
    let mut sorted: Vec<&String> = taxa.iter().filter(|t| matrix.contains(t)).collect();
    sorted.sort();
    sorted.first().map(|t| t.to_string())
}

/// Compare every listed taxon against the reference over each gene's span.
///
/// Reads only; calling it again after the matrix changes gives a new table.
pub fn compute_divergence(
    matrix: &Supermatrix,
    records: &[GeneRecord],
    taxa: &[String],
    reference: Option<&str>,
) -> DivergenceTable {
    let included: Vec<&GeneRecord> = records.iter().filter(|r| r.length > 0).collect();
    let genes: Vec<String> = included.iter().map(|r| r.name.clone()).collect();

    let Some(reference) = resolve_reference(matrix, taxa, reference) else {
        return DivergenceTable {
            reference: None,
            genes,
            rows: BTreeMap::new(),
        };
    };

    let mut rows = BTreeMap::new();
    for taxon in taxa {
        if !matrix.contains(taxon) {
            log::debug!("Taxon '{}' has no supermatrix row, skipping divergence", taxon);
            continue;
        }

        let row = if *taxon == reference {
            DivergenceRow {
                total_score: 0.0,
                charset_count: included.len(),
                cells: genes
                    .iter()
                    .map(|g| (g.clone(), Some(DivergenceCell::sentinel())))
                    .collect(),
            }
        } else {
            compare_to_reference(matrix, &included, taxon, &reference)
        };
        rows.insert(taxon.clone(), row);
    }

    DivergenceTable {
        reference: Some(reference),
        genes,
        rows,
    }
}

fn compare_to_reference(
    matrix: &Supermatrix,
    records: &[&GeneRecord],
    taxon: &str,
    reference: &str,
) -> DivergenceRow {
    let mut cells = IndexMap::with_capacity(records.len());
    let mut precise_sum = 0.0;
    let mut computed = 0usize;
    let mut charset_count = 0usize;

    for record in records {
        let cell = record.span().and_then(|span| {
            let ours = matrix.segment(taxon, span.clone())?;
            let theirs = matrix.segment(reference, span)?;
            if has_residue(ours) {
                charset_count += 1;
            }
            let (cell, precise) =
                DivergenceCell::from_counts(count_mismatches(ours, theirs), record.length);
            precise_sum += precise;
            computed += 1;
            Some(cell)
        });
        cells.insert(record.name.clone(), cell);
    }

    let total_score = if computed > 0 {
        round2(precise_sum / computed as f64)
    } else {
        0.0
    };

    DivergenceRow {
        total_score,
        charset_count,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SequenceType;

    fn record(name: &str, start: usize, length: usize) -> GeneRecord {
        let mut r = GeneRecord::placeholder(name, SequenceType::Dna);
        r.finalize(start, length);
        r
    }

    fn taxa(matrix: &Supermatrix) -> Vec<String> {
        matrix.taxa().map(str::to_string).collect()
    }

    #[test]
    fn test_single_mismatch() {
        let mut matrix = Supermatrix::new();
        matrix.insert("TaxonA", "ACGT");
        matrix.insert("TaxonB", "AGGT");
        let records = vec![record("gene1", 1, 4)];

        let table = compute_divergence(&matrix, &records, &taxa(&matrix), Some("TaxonA"));
        let cell = table.cell("TaxonB", "gene1").unwrap();
        assert_eq!(cell.mismatches, 1);
        assert_eq!(cell.percent, 25.0);
        assert_eq!(cell.rounded, 25);
        assert_eq!(cell.to_string(), "25 (1, 25.00%)");
        assert_eq!(table.row("TaxonB").unwrap().total_score, 25.0);
    }

    #[test]
    fn test_gaps_and_case_are_not_mismatches() {
        assert_eq!(count_mismatches(b"AC-T?", b"acGTA"), 0);
        assert_eq!(count_mismatches(b"ACGT", b"TGCA"), 4);
    }

    #[test]
    fn test_reference_row_and_default_reference() {
        let mut matrix = Supermatrix::new();
        matrix.insert("B", "ACGTTTTT");
        matrix.insert("A", "ACGA----");
        let records = vec![record("gene1", 1, 4), record("gene2", 5, 4)];

        let table = compute_divergence(&matrix, &records, &taxa(&matrix), Some("missing"));
        assert_eq!(table.reference.as_deref(), Some("A"));

        let reference = table.row("A").unwrap();
        assert_eq!(reference.charset_count, 2);
        assert_eq!(reference.total_score, 0.0);
        assert!(reference
            .cells
            .values()
            .all(|c| *c == Some(DivergenceCell::sentinel())));

        let other = table.row("B").unwrap();
        // B has residues in both genes; gene2 compares against gaps only
        assert_eq!(other.charset_count, 2);
        assert_eq!(table.cell("B", "gene1").unwrap().mismatches, 1);
        assert_eq!(table.cell("B", "gene2").unwrap().mismatches, 0);
        assert_eq!(other.total_score, 12.5);
    }

    #[test]
    fn test_charset_count_skips_empty_segments() {
        let mut matrix = Supermatrix::new();
        matrix.insert("A", "ACGTTTTT");
        matrix.insert("B", "ACGT-?--");
        let records = vec![record("gene1", 1, 4), record("gene2", 5, 4)];

        let table = compute_divergence(&matrix, &records, &taxa(&matrix), None);
        assert_eq!(table.row("B").unwrap().charset_count, 1);
    }

    #[test]
    fn test_uncomputable_range_is_excluded_from_score() {
        let mut matrix = Supermatrix::new();
        matrix.insert("A", "ACGT");
        matrix.insert("B", "AGGT");
        let records = vec![record("gene1", 1, 4), record("beyond", 5, 4)];

        let table = compute_divergence(&matrix, &records, &taxa(&matrix), None);
        let row = table.row("B").unwrap();
        assert_eq!(row.cells["beyond"], None);
        assert_eq!(row.total_score, 25.0);
    }

    #[test]
    fn test_rounded_percent_is_clamped() {
        let mut matrix = Supermatrix::new();
        matrix.insert("A", "AAAA");
        matrix.insert("B", "CCCC");
        let records = vec![record("gene1", 1, 4)];

        let table = compute_divergence(&matrix, &records, &taxa(&matrix), None);
        let cell = table.cell("B", "gene1").unwrap();
        assert_eq!(cell.rounded, 99);
        assert_eq!(cell.percent, 100.0);
    }

    #[test]
    fn test_switching_reference_is_reproducible() {
        let mut matrix = Supermatrix::new();
        matrix.insert("A", "ACGTTTTT");
        matrix.insert("B", "AGGTTTAT");
        matrix.insert("C", "ACCT----");
        let records = vec![record("gene1", 1, 4), record("gene2", 5, 4)];
        let names = taxa(&matrix);

        let first = compute_divergence(&matrix, &records, &names, Some("A"));
        let _ = compute_divergence(&matrix, &records, &names, Some("C"));
        let again = compute_divergence(&matrix, &records, &names, Some("A"));
        assert_eq!(first, again);
    }

    #[test]
    fn test_no_taxa() {
        let table = compute_divergence(&Supermatrix::new(), &[record("g", 1, 4)], &[], None);
        assert!(table.reference.is_none());
        assert!(table.rows.is_empty());
    }
}
