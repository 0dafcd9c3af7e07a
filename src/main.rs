//! ili-align-viz CLI - ILI Alignment Diagrams
//!
//! Renders one interactive HTML diagram per survey run pair from the
//! matched-feature tables produced by the alignment stage.
//!
//! Usage:
//!   ili-align-viz [OPTIONS] --matches-2007-2015 <FILE> --matches-2015-2022 <FILE>

use std::io::{Write, stderr, stdout};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use ili_align_viz::{
    AlignVizConfig, RenderOptions, RunPair, discover_config, load_config_file, render_files,
    web::{ServerConfig, start_server},
};

/// ili-align-viz - See how pipeline features line up across ILI runs
#[derive(Parser, Debug)]
#[command(name = "ili-align-viz")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Matched table (CSV or JSON) aligning the 2007 run onto the 2015 run
    #[arg(long, value_name = "FILE")]
    matches_2007_2015: Option<PathBuf>,

    /// Matched table (CSV or JSON) aligning the 2015 run onto the 2022 run
    #[arg(long, value_name = "FILE")]
    matches_2015_2022: Option<PathBuf>,

    /// Only render these pairs (2007_to_2015, 2015_to_2022); unknown ids select 2015_to_2022
    #[arg(long = "pair", value_name = "ID")]
    pairs: Vec<String>,

    /// Directory the HTML files are written to (default: config or current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Config file path (default: search for .ili-align.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the per-category sample
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum features plotted per diagram
    #[arg(long, value_name = "N")]
    max_samples: Option<usize>,

    /// Padding on both sides of the distance range (m)
    #[arg(long, value_name = "METERS")]
    padding: Option<f64>,

    /// Open each diagram in the browser after writing it, even if the config disables it
    #[arg(long, conflicts_with = "no_open")]
    open: bool,

    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    // === Web presentation options ===
    /// Start web server presenting the rendered diagrams
    #[arg(long)]
    web: bool,

    /// Port for web server (default: 3000)
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Don't open diagrams or the web server in the browser
    #[arg(long)]
    no_open: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_configuration(args: &Args) -> Result<AlignVizConfig, Box<dyn std::error::Error>> {
    // An explicit config must load; a discovered one is best effort
    if let Some(path) = &args.config {
        return Ok(load_config_file(path)?);
    }

    let search_from = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    match discover_config(&search_from) {
        Ok(config) => Ok(config),
        Err(e) => {
            if args.verbose {
                eprintln!("Note: No config file loaded: {}", e);
            }
            Ok(AlignVizConfig::default())
        }
    }
}

/// Pairs to render, in order, without duplicates
fn selected_pairs(args: &Args) -> Vec<RunPair> {
    if args.pairs.is_empty() {
        return RunPair::ALL.to_vec();
    }

    let mut pairs = Vec::new();
    for id in &args.pairs {
        if !RunPair::is_known_id(id) {
            eprintln!(
                "Warning: Unknown pair '{}', using {}",
                id,
                RunPair::from_id(id).id()
            );
        }
        let pair = RunPair::from_id(id);
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    pairs
}

fn table_argument(args: &Args, pair: RunPair) -> Option<&Path> {
    match pair {
        RunPair::Run2007To2015 => args.matches_2007_2015.as_deref(),
        RunPair::Run2015To2022 => args.matches_2015_2022.as_deref(),
    }
}

/// Render options from the config with CLI args applied on top
fn render_options(args: &Args, config: &AlignVizConfig) -> RenderOptions {
    // CLI args override config, which overrides defaults
    let mut options = config.render_options();
    if let Some(seed) = args.seed {
        options.sampling.seed = seed;
    }
    if let Some(cap) = args.max_samples {
        options.sampling.cap = cap;
    }
    if let Some(padding) = args.padding {
        options.padding = padding;
    }
    options.present = (options.present || args.open) && !args.no_open;
    options
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_configuration(&args)?;
    if args.verbose {
        if let Some(source) = &config.source {
            eprintln!("Loaded configuration from {}", source.display());
        }
    }

    let options = render_options(&args, &config);

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output.dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut sources = Vec::new();
    for pair in selected_pairs(&args) {
        let table = table_argument(&args, pair).or_else(|| config.tables.table_for(pair));
        match table {
            Some(path) => sources.push((pair, path.to_path_buf())),
            None => eprintln!("Warning: No matched table given for {}, skipping", pair.id()),
        }
    }
    if sources.is_empty() {
        return Err(
            "No matched tables given (use --matches-2007-2015 / --matches-2015-2022 or [tables] in .ili-align.toml)"
                .into(),
        );
    }

    if args.verbose {
        eprintln!(
            "Sampling: cap={}, per_category={}, seed={}; padding={}m",
            options.sampling.cap, options.sampling.per_category, options.sampling.seed, options.padding
        );
    }

    eprintln!("Generating ILI alignment diagrams...");

    // Keep stdout clean for the JSON summary
    let mut writer: Box<dyn Write> = if args.json {
        Box::new(stderr())
    } else {
        Box::new(stdout())
    };
    let summary = render_files(&sources, &output_dir, &options, &mut writer)?;
    writer.flush()?;

    if args.verbose {
        for diagram in &summary.rendered {
            eprintln!(
                "{}: {} of {} rows plotted, {} markers, {} connectors",
                diagram.pair.id(),
                diagram.sample_rows,
                diagram.table_rows,
                diagram.counts.markers,
                diagram.counts.connectors
            );
        }
    }

    if args.json {
        let mut out = stdout();
        serde_json::to_writer_pretty(&mut out, &summary)?;
        writeln!(out)?;
    }

    if args.web {
        let server_config = ServerConfig {
            port: args.port,
            open_browser: !args.no_open,
        };

        // Run the web server using tokio runtime
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(start_server(
            summary.rendered.clone(),
            options.export.clone(),
            server_config,
        ))
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    }

    if !summary.is_success() {
        return Err(format!(
            "{} of {} diagrams failed",
            summary.failures.len(),
            sources.len()
        )
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["ili-align-viz", "--matches-2007-2015", "a.csv"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_presents_by_default() {
        let options = render_options(&parse(&[]), &AlignVizConfig::default());
        assert!(options.present);
    }

    #[test]
    fn test_no_open_disables_presenting() {
        let options = render_options(&parse(&["--no-open"]), &AlignVizConfig::default());
        assert!(!options.present);
    }

    #[test]
    fn test_open_overrides_config() {
        let mut config = AlignVizConfig::default();
        config.output.open = false;

        assert!(!render_options(&parse(&[]), &config).present);
        assert!(render_options(&parse(&["--open"]), &config).present);
    }

    #[test]
    fn test_cli_overrides_sampling() {
        let options = render_options(
            &parse(&["--seed", "9", "--max-samples", "4", "--padding", "250"]),
            &AlignVizConfig::default(),
        );
        assert_eq!(options.sampling.seed, 9);
        assert_eq!(options.sampling.cap, 4);
        assert_eq!(options.padding, 250.0);
    }
}
