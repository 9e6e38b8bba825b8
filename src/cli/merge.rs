// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.genes.is_empty() {
            self.genes = config.genes.unwrap_or_default();
        }
        if self.names.is_none() {
            self.names = config.names.map(|names| names.join(","));
        }
        if self.output.is_none() {
            self.output = config.output;
        }

        // Only override the default, not an explicit CLI value
        if self.format == "fasta" {
            if let Some(format) = config.format {
                self.format = format;
            }
        }

        if self.reference.is_none() {
            self.reference = config.reference;
        }
        if self.include_taxa.is_none() {
            self.include_taxa = config.include_taxa;
        }
        if self.exclude_taxa.is_none() {
            self.exclude_taxa = config.exclude_taxa;
        }
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Flags can only be switched on by the config
        self.stats_only |= config.stats_only.unwrap_or(false);
        self.dry_run |= config.dry_run.unwrap_or(false);
        self.verbose |= config.verbose.unwrap_or(false);

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
