// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// supermatrix - Concatenate per-gene alignments into a partitioned supermatrix
pub struct Args {
    /// gene alignment files (FASTA, NEXUS, GenBank or plain sequence), in partition order
    #[argh(positional)]
    pub genes: Vec<String>,

    /// comma-separated gene names, one per file (default: file stems)
    #[argh(option)]
    pub names: Option<String>,

    /// output prefix for the supermatrix, partition, statistics and divergence files
    #[argh(option)]
    pub output: Option<String>,

    /// supermatrix format: fasta, phylip (default: fasta)
    #[argh(option, default = "String::from(\"fasta\")")]
    pub format: String,

    /// reference taxon for divergence (default: first taxon in sorted order)
    #[argh(option)]
    pub reference: Option<String>,

    /// include only taxa matching regex pattern
    #[argh(option)]
    pub include_taxa: Option<String>,

    /// exclude taxa matching regex pattern
    #[argh(option)]
    pub exclude_taxa: Option<String>,

    /// number of threads used to parse gene files (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// print statistics only, write no files
    #[argh(switch)]
    pub stats_only: bool,

    /// sniff and parse inputs, report diagnostics, write nothing
    #[argh(switch)]
    pub dry_run: bool,

    /// enable debug logging
    #[argh(switch)]
    pub verbose: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
