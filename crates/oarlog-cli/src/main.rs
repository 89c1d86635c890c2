//! oarlog - convert rowing club logbook backups to JSON.
//!
//! Reads the boats, persons and destinations reference files plus any
//! number of logbook files, and writes normalized tables for the web viewer.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use oarlog_core::{Config, ImportPaths, Importer};

// ============================================================================
// Constants
// ============================================================================

/// Exit code when `--strict` is set and the consistency check found problems
const EXIT_INCONSISTENT: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "oarlog", version, about = "Convert rowing club backup files to JSON")]
struct Cli {
    /// Boats file (boats.efa2boats)
    #[arg(long)]
    boats: PathBuf,

    /// Persons file (persons.efa2persons)
    #[arg(long)]
    persons: PathBuf,

    /// Destinations file (destinations.efa2destinations)
    #[arg(long)]
    destinations: PathBuf,

    /// Logbook files (supports globs like *.efa2logbook)
    #[arg(long, required = true, num_args = 1..)]
    logbooks: Vec<String>,

    /// Output directory [default: from config, else "output"]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum distance to import, in km [default: from config, else 100]
    #[arg(long)]
    max_distance: Option<u32>,

    /// Write plain .json instead of .json.gz
    #[arg(long)]
    no_compress: bool,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,

    /// Exit with status 2 if the consistency check reports anything
    #[arg(long)]
    strict: bool,

    /// Config file [default: ~/.config/oarlog/config.json]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so file logs are flushed.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // RUST_LOG wins over -v when set
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(file_layer)
        .with(filter)
        .init();

    Ok(guard)
}

/// Expand logbook glob patterns. A pattern without matches is taken as a
/// literal path if that file exists.
fn expand_logbook_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let matches: Vec<PathBuf> = glob::glob(pattern)
            .with_context(|| format!("Invalid logbook pattern: {}", pattern))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(error = %e, "Unreadable logbook path");
                    None
                }
            })
            .collect();

        if !matches.is_empty() {
            files.extend(matches);
        } else if Path::new(pattern).exists() {
            files.push(PathBuf::from(pattern));
        } else {
            warn!(pattern = %pattern, "No files found matching pattern");
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(ref output) = cli.output {
        config.output_dir = output.clone();
    }
    if let Some(max_distance) = cli.max_distance {
        config.max_distance_km = max_distance;
    }
    if cli.no_compress {
        config.compress = false;
    }
    if cli.pretty {
        config.pretty = true;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = build_config(&cli).context("Failed to load config")?;

    let logbooks = expand_logbook_patterns(&cli.logbooks)?;
    if logbooks.is_empty() {
        anyhow::bail!("No logbook files found");
    }

    let paths = ImportPaths {
        boats: cli.boats,
        persons: cli.persons,
        destinations: cli.destinations,
        logbooks,
    };

    info!(output = %config.output_dir.display(), "Starting import");
    let summary = Importer::new(config).run(&paths)?;
    summary.log();

    if cli.strict && !summary.is_consistent() {
        return Ok(ExitCode::from(EXIT_INCONSISTENT));
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let _guard = match init_tracing(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_glob_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["2021.efa2logbook", "2019.efa2logbook", "notes.txt"] {
            std::fs::write(dir.path().join(name), "<efa/>").unwrap();
        }
        let pattern = format!("{}/*.efa2logbook", dir.path().display());

        let files = expand_logbook_patterns(&[pattern]).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("2019.efa2logbook"),
                dir.path().join("2021.efa2logbook"),
            ]
        );
    }

    #[test]
    fn test_expand_missing_pattern_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.efa2logbook", dir.path().display());
        assert!(expand_logbook_patterns(&[pattern]).unwrap().is_empty());
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"max_distance_km": 60, "compress": true}"#).unwrap();

        let cli = Cli::parse_from([
            "oarlog",
            "--boats",
            "b",
            "--persons",
            "p",
            "--destinations",
            "d",
            "--logbooks",
            "a",
            "b",
            "--no-compress",
            "--max-distance",
            "80",
            "--config",
            config_path.to_str().unwrap(),
        ]);
        assert_eq!(cli.logbooks, vec!["a".to_string(), "b".to_string()]);

        let config = build_config(&cli).unwrap();
        assert_eq!(config.max_distance_km, 80);
        assert!(!config.compress);
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }
}
