// main.rs - CLI entry point

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::time::Instant;
use supermatrix::cli::Config;
use supermatrix::output::{
    format_statistics, write_diagnostics, write_divergence, write_partition, write_statistics,
    write_supermatrix,
};
use supermatrix::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        println!("{}", Config::generate_sample());
        println!("# Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    log::info!("supermatrix v{}", env!("CARGO_PKG_VERSION"));
    if let Some(config_path) = &args.config {
        log::info!("Loaded configuration from: {}", config_path);
    }

    let validation = validate_args(&args)?;

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        log::info!("Threads: {}", n);
    } else {
        log::info!("Threads: {} (auto-detected)", rayon::current_num_threads());
    }

    let total_start = Instant::now();

    let (names, contents) = read_gene_files(&args.genes, &validation.gene_names)?;
    let genes = GeneSet::from_parts(names, contents).map_err(|e| e.to_string())?;
    log::info!("Parsing {} gene files", genes.len());

    let mut result = Concatenation::build(&genes);

    if validation.has_taxon_filters() {
        let removed = result.retain_taxa(|taxon| validation.keep_taxon(taxon));
        log::info!(
            "Taxon filters removed {} taxa, {} remain",
            removed.len(),
            result.supermatrix().len()
        );
    }

    if result.supermatrix().is_empty() {
        log::warn!("No taxa left in the supermatrix");
    }

    if args.dry_run {
        log::info!(
            "Dry run completed: {} taxa x {} columns, {} diagnostics ({} warnings)",
            result.supermatrix().len(),
            result.supermatrix().alignment_length(),
            result.diagnostics().len(),
            result.diagnostics().warnings().count()
        );
        return Ok(());
    }

    let statistics = result.statistics();

    if args.stats_only {
        print!("{}", format_statistics(&statistics));
        return Ok(());
    }

    let prefix = args
        .output
        .as_ref()
        .ok_or("--output is required unless --stats-only or --dry-run is set")?;
    let matrix_path = format!("{}.{}", prefix, validation.matrix_format.extension());

    write_supermatrix(&matrix_path, validation.matrix_format, result.supermatrix())?;
    write_partition(
        &format!("{}.partition.tsv", prefix),
        &result.partition(),
        &command_line,
    )?;
    write_statistics(&format!("{}.stats.json", prefix), &statistics)?;
    write_divergence(
        &format!("{}.divergence.tsv", prefix),
        &result.divergence(args.reference.as_deref()),
        &command_line,
    )?;
    write_diagnostics(&format!("{}.diagnostics.json", prefix), result.diagnostics())?;

    log::info!(
        "Completed in {:.2}s",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Read every gene file into lines, skipping empty ones with a warning.
fn read_gene_files(
    paths: &[String],
    names: &[String],
) -> Result<(Vec<String>, Vec<Vec<String>>), String> {
    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map_err(|e| format!("Invalid progress template: {}", e))?
            .progress_chars("#>-"),
    );

    let mut kept_names = Vec::with_capacity(paths.len());
    let mut contents = Vec::with_capacity(paths.len());

    for (path, name) in paths.iter().zip(names) {
        pb.set_message(name.clone());
        let bytes =
            fs::read(path).map_err(|e| format!("Failed to read gene file '{}': {}", path, e))?;
        let text = String::from_utf8_lossy(&bytes);
        pb.inc(1);

        if text.trim().is_empty() {
            log::warn!("Gene file '{}' is empty, skipping", path);
            continue;
        }
        kept_names.push(name.clone());
        contents.push(text.lines().map(str::to_string).collect());
    }
    pb.finish_and_clear();

    if contents.is_empty() {
        return Err("All gene files are empty".to_string());
    }
    Ok((kept_names, contents))
}
