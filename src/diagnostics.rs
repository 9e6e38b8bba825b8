// diagnostics.rs - Non-fatal issue channel for the concatenation pipeline

use serde::Serialize;
use std::fmt;

/// How a length-mismatched sequence was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LengthFix {
    Padded,
    Truncated,
}

/// Severity of a recorded diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

/// A single non-fatal issue raised while building the supermatrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    /// Gene file could not be parsed; the gene was skipped.
    ParseFailure { gene: String, reason: String },
    /// Gene file parsed but produced no usable taxon data.
    EmptyResult { gene: String },
    /// Taxon sequence disagreed with the gene's effective length.
    LengthMismatch {
        gene: String,
        taxon: String,
        expected: usize,
        found: usize,
        fix: LengthFix,
    },
    /// Same taxon label appeared twice in one gene file; the later one won.
    DuplicateTaxon { gene: String, taxon: String },
    /// Taxon row failed the final length check and was dropped.
    ConsistencyViolation {
        taxon: String,
        expected: usize,
        found: usize,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::EmptyResult { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ParseFailure { gene, reason } => {
                write!(f, "Skipping gene '{}': {}", gene, reason)
            }
            Diagnostic::EmptyResult { gene } => {
                write!(f, "Gene '{}' yielded no usable sequences", gene)
            }
            Diagnostic::LengthMismatch {
                gene,
                taxon,
                expected,
                found,
                fix,
            } => {
                let action = match fix {
                    LengthFix::Padded => "padded with gaps",
                    LengthFix::Truncated => "truncated",
                };
                write!(
                    f,
                    "Gene '{}', taxon '{}': length {} differs from {} ({})",
                    gene, taxon, found, expected, action
                )
            }
            Diagnostic::DuplicateTaxon { gene, taxon } => {
                write!(
                    f,
                    "Gene '{}': taxon '{}' appears more than once, keeping the last record",
                    gene, taxon
                )
            }
            Diagnostic::ConsistencyViolation {
                taxon,
                expected,
                found,
            } => write!(
                f,
                "Dropping taxon '{}': concatenated length {} != expected {}",
                taxon, found, expected
            ),
        }
    }
}

/// Ordered collector of diagnostics.
///
/// Every entry is mirrored to the `log` facade when recorded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => log::warn!("{}", diagnostic),
            Severity::Info => log::info!("{}", diagnostic),
        }
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity() {
        let empty = Diagnostic::EmptyResult {
            gene: "cox1".to_string(),
        };
        let failure = Diagnostic::ParseFailure {
            gene: "cox1".to_string(),
            reason: "no MATRIX".to_string(),
        };
        assert_eq!(empty.severity(), Severity::Info);
        assert_eq!(failure.severity(), Severity::Warning);
    }

    #[test]
    fn test_collector_keeps_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::EmptyResult {
            gene: "g1".to_string(),
        });
        diagnostics.push(Diagnostic::LengthMismatch {
            gene: "g2".to_string(),
            taxon: "A".to_string(),
            expected: 4,
            found: 2,
            fix: LengthFix::Padded,
        });

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warnings().count(), 1);
        assert!(matches!(
            diagnostics.entries()[0],
            Diagnostic::EmptyResult { .. }
        ));
        assert!(diagnostics.entries()[1].to_string().contains("padded"));
    }
}
