// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::output::MatrixFormat;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug)]
pub struct ValidationResult {
    pub matrix_format: MatrixFormat,
    pub gene_names: Vec<String>,
    pub taxa_include_regex: Option<Regex>,
    pub taxa_exclude_regex: Option<Regex>,
}

impl ValidationResult {
    /// Apply the include/exclude patterns to one taxon name
    pub fn keep_taxon(&self, taxon: &str) -> bool {
        if let Some(include) = &self.taxa_include_regex {
            if !include.is_match(taxon) {
                return false;
            }
        }
        if let Some(exclude) = &self.taxa_exclude_regex {
            if exclude.is_match(taxon) {
                return false;
            }
        }
        true
    }

    pub fn has_taxon_filters(&self) -> bool {
        self.taxa_include_regex.is_some() || self.taxa_exclude_regex.is_some()
    }
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    if args.genes.is_empty() {
        return Err("No gene files given (pass them as arguments or via 'genes' in the config)".to_string());
    }

    if args.output.is_none() && !args.stats_only && !args.dry_run {
        return Err("--output is required unless --stats-only or --dry-run is set".to_string());
    }

    let matrix_format = MatrixFormat::from_str(&args.format)?;

    if args.threads == Some(0) {
        return Err("Thread count must be at least 1".to_string());
    }

    if let Some(reference) = &args.reference {
        if reference.trim().is_empty() {
            return Err("Reference taxon cannot be empty".to_string());
        }
    }

    let gene_names = match &args.names {
        Some(list) => {
            let names: Vec<String> = list.split(',').map(|n| n.trim().to_string()).collect();
            if names.len() != args.genes.len() {
                return Err(format!(
                    "Got {} gene names for {} gene files",
                    names.len(),
                    args.genes.len()
                ));
            }
            if let Some(i) = names.iter().position(|n| n.is_empty()) {
                return Err(format!("Gene name {} is empty", i + 1));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
                return Err(format!("Duplicate gene name '{}'", dup));
            }
            names
        }
        None => unique_gene_names(&args.genes),
    };

    // Compile regex patterns
    let taxa_include_regex = if let Some(pattern) = &args.include_taxa {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid include_taxa regex: {}", e))?)
    } else {
        None
    };

    let taxa_exclude_regex = if let Some(pattern) = &args.exclude_taxa {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid exclude_taxa regex: {}", e))?)
    } else {
        None
    };

    Ok(ValidationResult {
        matrix_format,
        gene_names,
        taxa_include_regex,
        taxa_exclude_regex,
    })
}

/// Gene names from file stems; clashes get `_1`, `_2`, ... appended.
pub fn unique_gene_names<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let mut taken = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let path = Path::new(path.as_ref());
            let base = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "gene".to_string());

            let mut name = base.clone();
            let mut counter = 1;
            while taken.contains(&name) {
                name = format!("{}_{}", base, counter);
                counter += 1;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["supermatrix"], args).unwrap()
    }

    #[test]
    fn test_unique_gene_names() {
        let names = unique_gene_names(&["data/cox1.fas", "other/cox1.nex", "cox1.gb", "rbcL"]);
        assert_eq!(names, vec!["cox1", "cox1_1", "cox1_2", "rbcL"]);
    }

    #[test]
    fn test_explicit_names_must_match_files() {
        let args = parse(&["--dry-run", "--names", "a,b", "x.fas"]);
        assert!(validate_args(&args).unwrap_err().contains("2 gene names"));

        let args = parse(&["--dry-run", "--names", "a, a", "x.fas", "y.fas"]);
        assert!(validate_args(&args).unwrap_err().contains("Duplicate"));

        let args = parse(&["--dry-run", "--names", " a , b ", "x.fas", "y.fas"]);
        assert_eq!(validate_args(&args).unwrap().gene_names, vec!["a", "b"]);
    }

    #[test]
    fn test_format_and_regex_validation() {
        let args = parse(&["--output", "out", "--format", "nexus", "x.fas"]);
        assert!(validate_args(&args).is_err());

        let args = parse(&["--output", "out", "--include-taxa", "(", "x.fas"]);
        assert!(validate_args(&args).unwrap_err().contains("include_taxa"));

        let args = parse(&["--output", "out", "x.fas"]);
        assert!(validate_args(&args).is_ok());
        assert!(validate_args(&parse(&["--output", "out"])).is_err());
    }

    #[test]
    fn test_output_required_when_writing() {
        let err = validate_args(&parse(&["x.fas"])).unwrap_err();
        assert!(err.contains("--output"));

        assert!(validate_args(&parse(&["--stats-only", "x.fas"])).is_ok());
        assert!(validate_args(&parse(&["--dry-run", "x.fas"])).is_ok());
    }

    #[test]
    fn test_taxon_filters() {
        let args = parse(&[
            "--stats-only",
            "--include-taxa",
            "^Homo",
            "--exclude-taxa",
            "neander",
            "x.fas",
        ]);
        let validation = validate_args(&args).unwrap();
        assert!(validation.has_taxon_filters());
        assert!(validation.keep_taxon("Homo sapiens"));
        assert!(!validation.keep_taxon("Homo neanderthalensis"));
        assert!(!validation.keep_taxon("Mus musculus"));
    }
}
