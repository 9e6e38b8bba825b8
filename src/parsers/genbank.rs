// genbank.rs - GenBank flat-file parser (organism name + ORIGIN block)

use super::traits::{GeneParser, ParseOutput, SequenceCollector};
use super::ParseError;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur during GenBank parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenBankError {
    #[error("No ORIGIN block found")]
    MissingOrigin,
}

const RECORD_END: &str = "//";

fn organism_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s{2,}ORGANISM\s+(.*?)\s*\.?$").expect("valid ORGANISM pattern")
    })
}

fn organism_qualifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"/organism\s*=\s*"([^"]+)""#).expect("valid /organism pattern")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordState {
    Header,
    InOrigin,
}

/// State of the record currently being read
#[derive(Debug)]
struct PendingRecord {
    state: RecordState,
    name: Option<String>,
    from_organism_line: bool,
    sequence: String,
}

impl PendingRecord {
    fn new() -> Self {
        Self {
            state: RecordState::Header,
            name: None,
            from_organism_line: false,
            sequence: String::new(),
        }
    }

    fn has_content(&self) -> bool {
        self.name.is_some() || !self.sequence.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenBankParser;

impl GenBankParser {
    fn finish_record(
        gene_name: &str,
        record: &mut PendingRecord,
        index: &mut usize,
        collector: &mut SequenceCollector,
    ) {
        let done = std::mem::replace(record, PendingRecord::new());
        if done.sequence.is_empty() {
            if let Some(name) = done.name {
                log::debug!("Gene '{}': record '{}' has no sequence", gene_name, name);
            }
            return;
        }
        *index += 1;
        let name = done
            .name
            .unwrap_or_else(|| format!("{}_record{}", gene_name, index));
        collector.push(name, &done.sequence);
    }
}

impl GeneParser for GenBankParser {
    fn parse(&self, gene_name: &str, lines: &[String]) -> Result<ParseOutput, ParseError> {
        let mut collector = SequenceCollector::new();
        let mut record = PendingRecord::new();
        let mut index = 0usize;
        let mut saw_origin = false;

        for line in lines {
            let line = line.trim_end();
            if line.trim().is_empty() {
                continue;
            }

            if line.trim() == RECORD_END {
                Self::finish_record(gene_name, &mut record, &mut index, &mut collector);
                continue;
            }

            let head = line.split_whitespace().next().unwrap_or("");
            let unindented = !line.starts_with(char::is_whitespace);

            if unindented && head.eq_ignore_ascii_case("LOCUS") {
                if record.has_content() {
                    Self::finish_record(gene_name, &mut record, &mut index, &mut collector);
                }
                continue;
            }

            if unindented && head.eq_ignore_ascii_case("ORIGIN") {
                saw_origin = true;
                record.state = RecordState::InOrigin;
                record.sequence.clear();
                continue;
            }

            match record.state {
                RecordState::InOrigin => {
                    let body = line.trim_start().trim_start_matches(|c: char| c.is_ascii_digit());
                    record.sequence.push_str(body);
                }
                RecordState::Header => {
                    if let Some(caps) = organism_line().captures(line) {
                        record.name = Some(caps[1].trim().to_string());
                        record.from_organism_line = true;
                    } else if !record.from_organism_line && record.name.is_none() {
                        if let Some(caps) = organism_qualifier().captures(line) {
                            record.name = Some(caps[1].trim().to_string());
                        }
                    }
                }
            }
        }

        if record.has_content() {
            Self::finish_record(gene_name, &mut record, &mut index, &mut collector);
        }

        if !saw_origin {
            return Err(GenBankError::MissingOrigin.into());
        }
        Ok(collector.finish())
    }

    fn name(&self) -> &'static str {
        "GenBank"
    }
}
