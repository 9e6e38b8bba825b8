// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub genes: Option<Vec<String>>,
    pub names: Option<Vec<String>>,
    pub output: Option<String>,
    pub format: Option<String>,

    // Divergence
    pub reference: Option<String>,

    // Taxon filtering
    pub include_taxa: Option<String>,
    pub exclude_taxa: Option<String>,

    // Performance
    pub threads: Option<usize>,

    // Flags
    pub stats_only: Option<bool>,
    pub dry_run: Option<bool>,
    pub verbose: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        Self::from_toml(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        log::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# supermatrix.toml - Configuration file for supermatrix
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Gene alignment files, in partition order
genes = ["cox1.fasta", "rbcL.nex", "matK.gb"]

# Gene names, one per file (omit to use file stems)
# names = ["cox1", "rbcL", "matK"]

# Output prefix: <prefix>.fasta|.phy, <prefix>.partition.tsv,
# <prefix>.stats.json, <prefix>.divergence.tsv, <prefix>.diagnostics.json
output = "supermatrix"

# Supermatrix format: fasta, phylip
format = "fasta"

# =============================================================================
# DIVERGENCE
# =============================================================================

# Reference taxon (omit to use the first taxon in sorted order)
# reference = "Homo sapiens"

# =============================================================================
# TAXON FILTERING
# =============================================================================

# Include only taxa matching regex pattern
# include_taxa = "^Homo.*"

# Exclude taxa matching regex pattern
# exclude_taxa = "outgroup.*"

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads used to parse gene files (omit for auto-detection)
threads = 4

# =============================================================================
# FLAGS
# =============================================================================

# Print statistics only, write no files
stats_only = false

# Parse inputs and report diagnostics without writing output
dry_run = false

# Debug logging
verbose = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config = Config::from_toml(&Config::generate_sample()).unwrap();
        assert_eq!(config.genes.as_ref().map(Vec::len), Some(3));
        assert_eq!(config.format.as_deref(), Some("fasta"));
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.reference, None);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        let config = Config {
            output: Some("out/run".to_string()),
            exclude_taxa: Some("^outgroup".to_string()),
            ..Config::default()
        };
        config.to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = Config::from_toml("threads = \"many\"").unwrap_err();
        assert!(err.contains("many"));
    }
}
