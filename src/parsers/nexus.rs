// nexus.rs - NEXUS DATA/CHARACTERS block parser
//
// Only rows inside a DATA (or CHARACTERS) block's MATRIX command are read.
// Interleaved matrices repeat taxon labels; fragments are joined in the
// order they are encountered.

use super::traits::{GeneParser, ParseOutput, SequenceCollector};
use super::ParseError;
use indexmap::IndexMap;
use thiserror::Error;

/// Errors that can occur during NEXUS parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NexusError {
    #[error("No DATA or CHARACTERS block found")]
    NoDataBlock,

    #[error("DATA block has no MATRIX command")]
    MissingMatrix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NexusState {
    Outside,
    InOtherBlock,
    InDataBlock,
    InMatrix,
}

/// Per-taxon fragments of the current MATRIX, in first-seen order
#[derive(Debug, Default)]
struct MatrixBuffer {
    fragments: IndexMap<String, Vec<String>>,
}

impl MatrixBuffer {
    fn append(&mut self, label: String, fragment: &str) {
        self.fragments
            .entry(label)
            .or_default()
            .push(fragment.to_string());
    }

    fn flush_into(&mut self, collector: &mut SequenceCollector) {
        for (label, parts) in self.fragments.drain(..) {
            collector.push(label, &parts.concat());
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NexusParser;

impl GeneParser for NexusParser {
    fn parse(&self, gene_name: &str, lines: &[String]) -> Result<ParseOutput, ParseError> {
        let mut collector = SequenceCollector::new();
        let mut buffer = MatrixBuffer::default();
        let mut state = NexusState::Outside;
        let mut comment_depth = 0usize;
        let mut saw_data = false;
        let mut saw_matrix = false;

        for raw in lines {
            let line = strip_comments(raw, &mut comment_depth);
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let upper = trimmed.to_uppercase();

            state = match state {
                NexusState::Outside => match block_opening(&upper) {
                    Some(kind) if kind == "DATA" || kind == "CHARACTERS" => {
                        saw_data = true;
                        NexusState::InDataBlock
                    }
                    Some(_) => NexusState::InOtherBlock,
                    None => NexusState::Outside,
                },
                NexusState::InOtherBlock => {
                    if is_block_end(&upper) {
                        NexusState::Outside
                    } else {
                        NexusState::InOtherBlock
                    }
                }
                NexusState::InDataBlock => {
                    if is_block_end(&upper) {
                        NexusState::Outside
                    } else if first_token(&upper) == Some("MATRIX") {
                        saw_matrix = true;
                        let rest = trimmed[6..].trim();
                        if !rest.is_empty() && read_row(rest, &mut buffer) {
                            buffer.flush_into(&mut collector);
                            NexusState::InDataBlock
                        } else {
                            NexusState::InMatrix
                        }
                    } else {
                        NexusState::InDataBlock
                    }
                }
                NexusState::InMatrix => {
                    if is_block_end(&upper) {
                        log::warn!(
                            "Gene '{}': MATRIX not terminated by ';' before END",
                            gene_name
                        );
                        buffer.flush_into(&mut collector);
                        NexusState::Outside
                    } else if read_row(trimmed, &mut buffer) {
                        buffer.flush_into(&mut collector);
                        NexusState::InDataBlock
                    } else {
                        NexusState::InMatrix
                    }
                }
            };
        }

        if state == NexusState::InMatrix {
            log::warn!("Gene '{}': file ends inside MATRIX", gene_name);
            buffer.flush_into(&mut collector);
        }

        if !saw_data {
            return Err(NexusError::NoDataBlock.into());
        }
        if !saw_matrix {
            return Err(NexusError::MissingMatrix.into());
        }
        Ok(collector.finish())
    }

    fn name(&self) -> &'static str {
        "NEXUS"
    }
}

/// Remove `[...]` comments, which may nest and span lines.
fn strip_comments(line: &str, depth: &mut usize) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '[' => *depth += 1,
            ']' if *depth > 0 => *depth -= 1,
            _ if *depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn first_token(upper: &str) -> Option<&str> {
    upper
        .split_whitespace()
        .next()
        .map(|t| t.trim_end_matches(';'))
}

/// Block name for a `BEGIN <name>;` line
fn block_opening(upper: &str) -> Option<String> {
    let mut tokens = upper.split_whitespace();
    if tokens.next()? != "BEGIN" {
        return None;
    }
    Some(tokens.next()?.trim_end_matches(';').to_string())
}

fn is_block_end(upper: &str) -> bool {
    matches!(first_token(upper), Some("END") | Some("ENDBLOCK"))
}

/// Split a row into its label and the remaining text.
fn split_label(row: &str) -> (String, &str) {
    let quote = row.chars().next().filter(|c| *c == '\'' || *c == '"');
    match quote {
        Some(q) => {
            // A doubled quote inside the label stands for one literal quote
            let mut label = String::new();
            let mut chars = row.char_indices().skip(1).peekable();
            while let Some((i, c)) = chars.next() {
                if c != q {
                    label.push(c);
                } else if chars.next_if(|(_, next)| *next == q).is_some() {
                    label.push(q);
                } else {
                    return (label, &row[i + 1..]);
                }
            }
            (label, "")
        }
        None => {
            let end = row.find(char::is_whitespace).unwrap_or(row.len());
            (row[..end].to_string(), &row[end..])
        }
    }
}

/// Buffer one matrix row. Returns true when the row closes the matrix.
fn read_row(row: &str, buffer: &mut MatrixBuffer) -> bool {
    if row.starts_with(';') {
        return true;
    }

    let (label, rest) = split_label(row);
    let (fragment, terminated) = match rest.find(';') {
        Some(i) => (&rest[..i], true),
        None => (rest, false),
    };

    if !label.is_empty() {
        let fragment: String = fragment.split_whitespace().collect();
        buffer.append(label, &fragment);
    }
    terminated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_sequential_matrix() {
        let input = lines(
            "#NEXUS\n\
             BEGIN DATA;\n\
             \tDIMENSIONS NTAX=2 NCHAR=8;\n\
             \tFORMAT DATATYPE=DNA GAP=- MISSING=?;\n\
             \tMATRIX\n\
             \tTaxonA ACGT ACGT\n\
             \t'Taxon B' acgt-?gt\n\
             \t;\n\
             END;\n",
        );
        let output = NexusParser.parse("g", &input).unwrap();
        assert_eq!(output.sequences["TaxonA"], "ACGTACGT");
        assert_eq!(output.sequences["Taxon B"], "ACGT-?GT");
    }

    #[test]
    fn test_interleaved_rows_are_concatenated() {
        let input = lines(
            "#NEXUS\n\
             BEGIN DATA;\n\
             FORMAT DATATYPE=DNA INTERLEAVE;\n\
             MATRIX\n\
             A ACGT\n\
             B TTTT\n\
             \n\
             A GGCC\n\
             B AAAA;\n\
             END;\n",
        );
        let output = NexusParser.parse("g", &input).unwrap();
        assert_eq!(output.sequences["A"], "ACGTGGCC");
        assert_eq!(output.sequences["B"], "TTTTAAAA");
        assert!(output.duplicates.is_empty());
    }

    #[test]
    fn test_comments_and_other_blocks_are_ignored() {
        let input = lines(
            "#NEXUS\n\
             [ written by hand\n\
               over two lines ]\n\
             BEGIN TAXA;\n\
             TAXLABELS A B;\n\
             END;\n\
             begin characters;\n\
             matrix\n\
             A AC[inline]GT\n\
             B AC GT\n\
             ;\n\
             end;\n\
             BEGIN TREES;\n\
             TREE t = (A,B);\n\
             END;\n",
        );
        let output = NexusParser.parse("g", &input).unwrap();
        assert_eq!(output.sequences.len(), 2);
        assert_eq!(output.sequences["A"], "ACGT");
    }

    #[test]
    fn test_unterminated_matrix_is_flushed() {
        let input = lines("#NEXUS\nBEGIN DATA;\nMATRIX\nA ACGT\nB ACGA\nEND;\n");
        let output = NexusParser.parse("g", &input).unwrap();
        assert_eq!(output.sequences.len(), 2);
    }

    #[test]
    fn test_structural_errors() {
        let no_data = lines("#NEXUS\nBEGIN TREES;\nTREE t = (A,B);\nEND;\n");
        assert_eq!(
            NexusParser.parse("g", &no_data).unwrap_err(),
            ParseError::Nexus(NexusError::NoDataBlock)
        );

        let no_matrix = lines("#NEXUS\nBEGIN DATA;\nDIMENSIONS NTAX=1 NCHAR=4;\nEND;\n");
        assert_eq!(
            NexusParser.parse("g", &no_matrix).unwrap_err(),
            ParseError::Nexus(NexusError::MissingMatrix)
        );
    }

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("A ACGT"), ("A".to_string(), " ACGT"));
        assert_eq!(split_label("\"B c\" AC"), ("B c".to_string(), " AC"));
        assert_eq!(split_label("'open"), ("open".to_string(), ""));
        assert_eq!(
            split_label("'O''Brien' ACGT"),
            ("O'Brien".to_string(), " ACGT")
        );
        assert_eq!(split_label("''''"), ("'".to_string(), ""));
    }
}
