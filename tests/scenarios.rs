// scenarios.rs - End-to-end concatenation scenarios through the public API

use supermatrix::prelude::*;

fn build(genes: &[(&str, &str)]) -> Concatenation {
    let set = GeneSet::new(
        genes
            .iter()
            .map(|(name, text)| GeneInput::from_text(*name, text))
            .collect(),
    )
    .unwrap();
    Concatenation::build(&set)
}

#[test]
fn test_identical_taxa_segments_match_inputs() {
    let result = build(&[
        ("g1", ">A\nACGTAC\n>B\nACGTAA\n"),
        ("g2", ">A\nMKLV\n>B\nMKLI\n"),
        ("g3", ">A\nTTG\n>B\nTTA\n"),
    ]);

    let matrix = result.supermatrix();
    assert_eq!(matrix.alignment_length(), 13);

    let records = result.records();
    let expected = [("A", ["ACGTAC", "MKLV", "TTG"]), ("B", ["ACGTAA", "MKLI", "TTA"])];
    for (taxon, segments) in expected {
        for (record, segment) in records.iter().zip(segments) {
            let span = record.span().unwrap();
            assert_eq!(matrix.segment(taxon, span), Some(segment.as_bytes()));
        }
    }
}

#[test]
fn test_absent_taxon_is_gap_filled_and_counted_missing() {
    let result = build(&[
        ("gene1", ">A\nACGT\n>B\nACGT\n"),
        ("gene2", ">A\nTTTT\n>C\nGGGG\n"),
    ]);

    let matrix = result.supermatrix();
    assert_eq!(matrix.get("A"), Some("ACGTTTTT"));
    assert_eq!(matrix.get("B"), Some("ACGT----"));
    assert_eq!(matrix.get("C"), Some("----GGGG"));

    let partition = result.partition();
    let rows: Vec<(&str, &str, SequenceType)> = partition
        .iter()
        .map(|p| (p.name.as_str(), p.range.as_str(), p.seq_type))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("gene1", "1-4", SequenceType::Dna),
            ("gene2", "5-8", SequenceType::Dna)
        ]
    );

    let stats = result.statistics();
    assert_eq!(stats.missing_per_taxon["B"], 4);
    assert_eq!(stats.missing_per_taxon["C"], 4);
    assert_eq!(stats, result.statistics());
}

#[test]
fn test_partition_is_contiguous_from_one() {
    let result = build(&[
        ("a", ">X\nACGTACGT\n"),
        ("empty", ">X\n"),
        ("b", "#NEXUS\nBEGIN DATA;\nMATRIX\nX MKLVFE\n;\nEND;\n"),
        ("c", ">X\nAC\n"),
    ]);

    let partition = result.partition();
    assert_eq!(partition.len(), 3);
    let mut next = 1;
    for entry in &partition {
        let (start, end) = entry.bounds().unwrap();
        assert_eq!(start, next);
        assert!(end >= start);
        next = end + 1;
    }
    assert_eq!(next - 1, result.supermatrix().alignment_length());
}

#[test]
fn test_interleaved_nexus_gene() {
    let nexus = "#NEXUS\n\
                 BEGIN DATA;\n\
                 DIMENSIONS NTAX=2 NCHAR=12;\n\
                 FORMAT DATATYPE=DNA INTERLEAVE GAP=-;\n\
                 MATRIX\n\
                 TaxonA ACGTAC\n\
                 TaxonB ACGTAA\n\
                 \n\
                 TaxonA GGGTTT\n\
                 TaxonB GGG--T\n\
                 ;\n\
                 END;\n";
    let result = build(&[("nex", nexus)]);

    assert_eq!(result.supermatrix().get("TaxonA"), Some("ACGTACGGGTTT"));
    assert_eq!(result.supermatrix().get("TaxonB"), Some("ACGTAAGGG--T"));
    assert!(result.diagnostics().is_empty());
}

#[test]
fn test_genbank_gene() {
    let genbank = "LOCUS       HS20   20 bp    DNA\n\
                   DEFINITION  test record.\n\
                   \x20 ORGANISM  Homo sapiens\n\
                   ORIGIN\n\
                   \x20       1 acgtacgtac gtacgtacgt\n\
                   //\n";
    let result = build(&[("gb", genbank)]);

    assert_eq!(
        result.supermatrix().get("Homo sapiens"),
        Some("ACGTACGTACGTACGTACGT")
    );
    assert_eq!(result.records()[0].seq_type, SequenceType::Dna);
}

#[test]
fn test_reference_divergence_and_switching_back() {
    let mut result = build(&[("g1", ">TaxonA\nACGT\n>TaxonB\nAGGT\n>TaxonC\nAC-T\n")]);

    let first = result.divergence(Some("TaxonA"));
    let cell = first.cell("TaxonB", "g1").unwrap();
    assert_eq!(cell.mismatches, 1);
    assert_eq!(cell.percent, 25.0);
    assert_eq!(cell.rounded, 25);
    assert_eq!(first.cell("TaxonA", "g1"), Some(&DivergenceCell::sentinel()));

    let switched = result.divergence(Some("TaxonB"));
    assert_eq!(switched.cell("TaxonA", "g1").unwrap().mismatches, 1);
    assert_eq!(switched.cell("TaxonB", "g1").unwrap().mismatches, 0);
    assert_eq!(result.divergence(Some("TaxonA")), first);

    // Edits are visible on the next computation
    result.rename_taxon("TaxonC", "TaxonZ").unwrap();
    let renamed = result.divergence(Some("TaxonA"));
    assert!(renamed.row("TaxonZ").is_some());
    assert!(renamed.row("TaxonC").is_none());
}

#[test]
fn test_malformed_gene_does_not_abort_batch() {
    let result = build(&[
        ("bad", "#NEXUS\nBEGIN DATA;\nDIMENSIONS NTAX=1;\nEND;\n"),
        ("good", ">A\nACGT\n"),
    ]);

    assert_eq!(result.supermatrix().get("A"), Some("ACGT"));
    let warnings: Vec<_> = result.diagnostics().warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].to_string().contains("bad"));
}

#[test]
fn test_mismatched_inputs_are_fatal() {
    let err = Concatenation::from_parts(vec!["a".to_string()], vec![]).unwrap_err();
    assert_eq!(err, ConcatError::InputLengthMismatch { names: 1, contents: 0 });
}
