// mod.rs - Output formatters module

use crate::core::{DivergenceTable, StatisticsReport};
use crate::data::{PartitionEntry, Supermatrix};
use crate::diagnostics::Diagnostics;
use bio::io::fasta;
use serde::Serialize;
use std::fmt;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// File layout for the concatenated alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    Fasta,
    Phylip,
}

impl MatrixFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            MatrixFormat::Fasta => "fasta",
            MatrixFormat::Phylip => "phy",
        }
    }
}

impl FromStr for MatrixFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fasta" | "fa" | "fas" => Ok(MatrixFormat::Fasta),
            "phylip" | "phy" => Ok(MatrixFormat::Phylip),
            _ => Err(format!("Unsupported output format: {}. Use: fasta, phylip", s)),
        }
    }
}

impl fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixFormat::Fasta => write!(f, "FASTA"),
            MatrixFormat::Phylip => write!(f, "PHYLIP"),
        }
    }
}

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        create_dir_all(parent).map_err(|e| {
            format!("Failed to create parent directory '{}': {}", parent.display(), e)
        })?;
    }
    Ok(())
}

fn create_writer(file_path: &str) -> Result<BufWriter<File>, String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    Ok(BufWriter::new(file))
}

fn write_header<W: Write>(writer: &mut W, command_line: &str) -> Result<(), String> {
    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(
        writer,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# supermatrix v{}", env!("CARGO_PKG_VERSION"))
        .map_err(|e| format!("Write error: {}", e))?;
    Ok(())
}

fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_writer(writer)
}

/// Write the supermatrix as FASTA, one unwrapped line per sequence
pub fn write_fasta(file_path: &str, matrix: &Supermatrix) -> Result<(), String> {
    let mut writer = fasta::Writer::new(create_writer(file_path)?);
    for (taxon, sequence) in matrix.iter() {
        writer
            .write(taxon, None, sequence.as_bytes())
            .map_err(|e| format!("Write error: {}", e))?;
    }
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    log::info!("Supermatrix written to: {} (FASTA format)", file_path);
    Ok(())
}

/// Relaxed PHYLIP label: whitespace becomes underscores
fn phylip_label(taxon: &str) -> String {
    taxon.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Write the supermatrix in relaxed (sequential, long-label) PHYLIP format
pub fn write_phylip(file_path: &str, matrix: &Supermatrix) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;
    writeln!(writer, "{} {}", matrix.len(), matrix.alignment_length())
        .map_err(|e| format!("Write error: {}", e))?;
    for (taxon, sequence) in matrix.iter() {
        writeln!(writer, "{} {}", phylip_label(taxon), sequence)
            .map_err(|e| format!("Write error: {}", e))?;
    }
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    log::info!("Supermatrix written to: {} (PHYLIP format)", file_path);
    Ok(())
}

/// Write supermatrix in the specified format
pub fn write_supermatrix(
    file_path: &str,
    format: MatrixFormat,
    matrix: &Supermatrix,
) -> Result<(), String> {
    match format {
        MatrixFormat::Fasta => write_fasta(file_path, matrix),
        MatrixFormat::Phylip => write_phylip(file_path, matrix),
    }
}

/// Write the partition table (gene, range, type) as TSV
pub fn write_partition(
    file_path: &str,
    partition: &[PartitionEntry],
    command_line: &str,
) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;
    write_header(&mut writer, command_line)?;

    let mut tsv = tsv_writer(&mut writer);
    tsv.write_record(["Gene", "Range", "Type"])
        .map_err(|e| format!("Write error: {}", e))?;
    for entry in partition {
        let seq_type = entry.seq_type.to_string();
        tsv.write_record([entry.name.as_str(), entry.range.as_str(), seq_type.as_str()])
            .map_err(|e| format!("Write error: {}", e))?;
    }
    tsv.flush().map_err(|e| format!("Flush error: {}", e))?;
    drop(tsv);

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    log::info!("Partition written to: {}", file_path);
    Ok(())
}

/// Write the divergence table as TSV with one column per gene
pub fn write_divergence(
    file_path: &str,
    table: &DivergenceTable,
    command_line: &str,
) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;
    write_header(&mut writer, command_line)?;
    if let Some(reference) = &table.reference {
        writeln!(writer, "# Reference: {}", reference)
            .map_err(|e| format!("Write error: {}", e))?;
    }

    let mut tsv = tsv_writer(&mut writer);
    let mut header = vec!["Taxon".to_string(), "TotalScore".to_string(), "CharsetCount".to_string()];
    header.extend(table.genes.iter().cloned());
    tsv.write_record(&header)
        .map_err(|e| format!("Write error: {}", e))?;

    for (taxon, row) in &table.rows {
        let mut record = vec![
            taxon.clone(),
            format!("{:.2}", row.total_score),
            row.charset_count.to_string(),
        ];
        for gene in &table.genes {
            let cell = match row.cells.get(gene) {
                Some(Some(cell)) => cell.to_string(),
                _ => "NA".to_string(),
            };
            record.push(cell);
        }
        tsv.write_record(&record)
            .map_err(|e| format!("Write error: {}", e))?;
    }
    tsv.flush().map_err(|e| format!("Flush error: {}", e))?;
    drop(tsv);

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    log::info!("Divergence table written to: {}", file_path);
    Ok(())
}

/// Pretty-printed JSON for any serialisable report
pub fn write_json<T: Serialize>(file_path: &str, value: &T) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| format!("Failed to serialize '{}': {}", file_path, e))?;
    writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    Ok(())
}

pub fn write_statistics(file_path: &str, report: &StatisticsReport) -> Result<(), String> {
    write_json(file_path, report)?;
    log::info!("Statistics written to: {}", file_path);
    Ok(())
}

pub fn write_diagnostics(file_path: &str, diagnostics: &Diagnostics) -> Result<(), String> {
    write_json(file_path, diagnostics)?;
    log::info!("{} diagnostics written to: {}", diagnostics.len(), file_path);
    Ok(())
}

/// Human-readable statistics summary for the terminal
pub fn format_statistics(report: &StatisticsReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Number of taxa:            {}\n", report.number_of_taxa));
    out.push_str(&format!("Number of genes:           {}\n", report.number_of_genes));
    out.push_str(&format!("Total length:              {}\n", report.total_length));
    out.push_str(&format!(
        "Overall missing data:      {:.2}%\n",
        report.overall_missing_percent
    ));
    out.push_str(&format!(
        "Taxon-gene sparsity:       {:.2}%\n",
        report.taxon_gene_sparsity_percent
    ));
    out.push_str("\nGene\tLength\tMissing\n");
    for (gene, length) in &report.gene_lengths {
        let missing = report.missing_per_gene.get(gene).copied().unwrap_or(0);
        out.push_str(&format!("{}\t{}\t{}\n", gene, length, missing));
    }
    out
}
