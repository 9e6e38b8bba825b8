// statistics.rs - Missing-data and sparsity metrics over a supermatrix

use crate::data::{is_missing, GeneRecord, Supermatrix};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `num / den * 100`, rounded half away from zero to two decimals; zero when
/// the denominator is zero.
///
/// Rounds in integer hundredths so ties such as `201 / 20000` are exact.
pub fn percent(num: usize, den: usize) -> f64 {
    if den == 0 {
        return 0.0;
    }
    let (num, den) = (num as u128, den as u128);
    let hundredths = (num * 20_000 + den) / (2 * den);
    hundredths as f64 / 100.0
}

/// Aggregate metrics for one supermatrix and its gene records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub number_of_taxa: usize,
    pub number_of_genes: usize,
    pub total_length: usize,
    /// Gap + unknown characters per taxon across the whole row
    pub missing_per_taxon: BTreeMap<String, usize>,
    /// Gap + unknown characters per gene, summed over all taxa
    pub missing_per_gene: IndexMap<String, usize>,
    pub overall_missing_percent: f64,
    pub gene_lengths: IndexMap<String, usize>,
    /// Share of (taxon, gene) cells holding no residue at all
    pub taxon_gene_sparsity_percent: f64,
}

fn count_missing(bytes: &[u8]) -> usize {
    bytes.iter().filter(|c| is_missing(**c)).count()
}

/// Compute the statistics bundle. Records with zero length are ignored.
pub fn compute_statistics(matrix: &Supermatrix, records: &[GeneRecord]) -> StatisticsReport {
    let included: Vec<&GeneRecord> = records.iter().filter(|r| r.length > 0).collect();
    let total_length: usize = included.iter().map(|r| r.length).sum();
    let number_of_taxa = matrix.len();

    let missing_per_taxon: BTreeMap<String, usize> = matrix
        .iter()
        .map(|(taxon, row)| (taxon.to_string(), count_missing(row.as_bytes())))
        .collect();
    let total_missing: usize = missing_per_taxon.values().sum();

    let mut missing_per_gene = IndexMap::new();
    let mut gene_lengths = IndexMap::new();
    let mut empty_cells = 0usize;

    for record in &included {
        gene_lengths.insert(record.name.clone(), record.length);

        let mut gene_missing = 0usize;
        if let Some(span) = record.span() {
            for (_, row) in matrix.iter() {
                let Some(segment) = row.as_bytes().get(span.clone()) else {
                    continue;
                };
                let missing = count_missing(segment);
                gene_missing += missing;
                if missing == segment.len() {
                    empty_cells += 1;
                }
            }
        }
        missing_per_gene.insert(record.name.clone(), gene_missing);
    }

    StatisticsReport {
        number_of_taxa,
        number_of_genes: included.len(),
        total_length,
        missing_per_taxon,
        missing_per_gene,
        overall_missing_percent: percent(total_missing, number_of_taxa * total_length),
        gene_lengths,
        taxon_gene_sparsity_percent: percent(empty_cells, number_of_taxa * included.len()),
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

    fn sample() -> (Supermatrix, Vec<GeneRecord>) {
        let mut matrix = Supermatrix::new();
        matrix.insert("A", "ACGTTTTT");
        matrix.insert("B", "ACGT----");
        matrix.insert("C", "----GG?G");
        (matrix, vec![record("gene1", 1, 4), record("gene2", 5, 4)])
    }

    #[test]
    fn test_counts_and_lengths() {
        let (matrix, records) = sample();
        let report = compute_statistics(&matrix, &records);

        assert_eq!(report.number_of_taxa, 3);
        assert_eq!(report.number_of_genes, 2);
        assert_eq!(report.total_length, 8);
        assert_eq!(report.missing_per_taxon["B"], 4);
        assert_eq!(report.missing_per_taxon["C"], 5);
        assert_eq!(report.missing_per_gene["gene1"], 4);
        assert_eq!(report.missing_per_gene["gene2"], 5);
        assert_eq!(report.gene_lengths["gene2"], 4);
        // 9 of 24 cells
        assert_eq!(report.overall_missing_percent, 37.5);
        // B/gene2 and C/gene1 are empty: 2 of 6
        assert_eq!(report.taxon_gene_sparsity_percent, 33.33);
    }

    #[test]
    fn test_zero_length_records_are_ignored() {
        let (matrix, mut records) = sample();
        records.push(GeneRecord::placeholder("empty", SequenceType::Unknown));
        let report = compute_statistics(&matrix, &records);
        assert_eq!(report.number_of_genes, 2);
        assert!(!report.gene_lengths.contains_key("empty"));
    }

    #[test]
    fn test_statistics_are_idempotent() {
        let (matrix, records) = sample();
        let first = compute_statistics(&matrix, &records);
        let second = compute_statistics(&matrix, &records);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(percent(1, 800), 0.13);
        assert_eq!(percent(2, 3), 66.67);
        assert_eq!(percent(1, 0), 0.0);
        assert_eq!(percent(201, 20_000), 1.01);
        assert_eq!(percent(1, 40), 2.5);
        assert_eq!(percent(3, 8), 37.5);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_empty_matrix() {
        let report = compute_statistics(&Supermatrix::new(), &[]);
        assert_eq!(report.number_of_taxa, 0);
        assert_eq!(report.overall_missing_percent, 0.0);
        assert_eq!(report.taxon_gene_sparsity_percent, 0.0);
    }
}
