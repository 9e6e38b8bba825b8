// fasta.rs - Tolerant FASTA parser and the plain-text fallback

use super::traits::{GeneParser, ParseOutput, SequenceCollector};
use super::ParseError;

/// Header-line marker
pub const RECORD_MARKER: char = '>';

pub(crate) fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';')
}

/// Reads `>name` records. Sequence lines before the first header are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastaParser;

impl GeneParser for FastaParser {
    fn parse(&self, gene_name: &str, lines: &[String]) -> Result<ParseOutput, ParseError> {
        let mut collector = SequenceCollector::new();
        let mut current: Option<String> = None;
        let mut buffer = String::new();
        let mut unnamed = 0;

        for line in lines {
            let line = line.trim();
            if line.is_empty() || is_comment(line) {
                continue;
            }

            if let Some(header) = line.strip_prefix(RECORD_MARKER) {
                if let Some(name) = current.take() {
                    collector.push(name, &buffer);
                }
                buffer.clear();

                let header = header.trim();
                current = Some(if header.is_empty() {
                    unnamed += 1;
                    format!("{}_unnamed{}", gene_name, unnamed)
                } else {
                    header.to_string()
                });
            } else if current.is_some() {
                buffer.push_str(line);
            }
        }

        if let Some(name) = current {
            collector.push(name, &buffer);
        }

        Ok(collector.finish())
    }

    fn name(&self) -> &'static str {
        "FASTA"
    }
}

/// Unrecognised content: try FASTA first, otherwise treat every non-comment
/// line as one sequence belonging to a taxon named after the gene.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainParser;

impl GeneParser for PlainParser {
    fn parse(&self, gene_name: &str, lines: &[String]) -> Result<ParseOutput, ParseError> {
        let output = FastaParser.parse(gene_name, lines)?;
        if !output.is_empty() {
            return Ok(output);
        }

        log::debug!(
            "Gene '{}': no FASTA records, reading content as a single sequence",
            gene_name
        );
        let body: String = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty() && !is_comment(l))
            .collect();

        let mut collector = SequenceCollector::new();
        collector.push(gene_name.to_string(), &body);
        Ok(collector.finish())
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}
