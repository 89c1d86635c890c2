//! End-to-end import pipeline.
//!
//! ```text
//! reference files ──► loader ──► Registries
//!                                   │
//! logbook files ──► normalizer ◄────┘  (one Resolver per run)
//!                        │
//!                        ▼
//!                     checker ──► export
//! ```
//!
//! Runs are single-threaded: placeholder ids depend on the order records
//! are resolved in, so logbook files are sorted by path and their records
//! processed in document order.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::checker::check_consistency;
use crate::config::Config;
use crate::error::{ImportError, Result};
use crate::export::ExportWriter;
use crate::loader::{load_boats, load_destinations, load_persons, LoadReport};
use crate::models::LogEntry;
use crate::normalizer::{NormalizeOptions, NormalizeStats, Normalizer};
use crate::registry::Registries;
use crate::resolver::Resolver;
use crate::source::read_records;

/// Input files for one run
#[derive(Debug, Clone)]
pub struct ImportPaths {
    pub boats: PathBuf,
    pub persons: PathBuf,
    pub destinations: PathBuf,
    pub logbooks: Vec<PathBuf>,
}

/// Per-kind entity counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub boats: usize,
    pub persons: usize,
    pub destinations: usize,
}

/// Everything a caller needs to report on a finished run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub exported: EntityCounts,
    pub placeholders: EntityCounts,
    pub entries: usize,
    pub future_years: usize,
    pub excessive_distances: usize,
    pub invalid_dates: usize,
    pub missing_boats: usize,
    pub skipped_boats: usize,
    pub skipped_persons: usize,
    pub archived_persons: usize,
    pub skipped_destinations: usize,
    pub boat_variant_warnings: usize,
    pub diagnostics: Vec<String>,
}

impl RunSummary {
    /// Share of problem records among everything that was looked at
    pub fn error_percentage(&self) -> f64 {
        let errors = self.excessive_distances + self.diagnostics.len();
        let total = errors + self.entries;
        if total == 0 {
            0.0
        } else {
            errors as f64 / total as f64 * 100.0
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Log the summary the way a finished run reports it
    pub fn log(&self) {
        if !self.diagnostics.is_empty() {
            info!("Consistency errors:");
            for diagnostic in &self.diagnostics {
                info!("  {}", diagnostic);
            }
        }

        info!("Export completed");
        info!("  Exported boats: {}", self.exported.boats);
        info!("  Exported persons: {}", self.exported.persons);
        info!("  Exported destinations: {}", self.exported.destinations);
        info!("  Exported logbook entries: {}", self.entries);
        info!(
            "  Placeholders created: {} boats, {} persons, {} destinations",
            self.placeholders.boats, self.placeholders.persons, self.placeholders.destinations
        );
        info!("  Boats skipped (unusable records): {}", self.skipped_boats);
        info!("  Persons skipped (no id): {}", self.skipped_persons);
        info!("  Archived persons skipped: {}", self.archived_persons);
        info!("  Destinations skipped (no id): {}", self.skipped_destinations);
        info!("  Logbook entries skipped (future year): {}", self.future_years);
        info!(
            "  Logbook entries skipped (excessive distance): {}",
            self.excessive_distances
        );
        info!("  Logbook entries skipped (invalid date): {}", self.invalid_dates);
        info!("  Logbook entries without boat: {}", self.missing_boats);
        info!("  Consistency errors: {}", self.diagnostics.len());
        info!("Percentage errors: {:.2}%", self.error_percentage());
    }
}

/// Result of resolving without exporting
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub registries: Registries,
    pub entries: Vec<LogEntry>,
    pub summary: RunSummary,
}

pub struct Importer {
    config: Config,
    options: NormalizeOptions,
}

impl Importer {
    pub fn new(config: Config) -> Self {
        let options = NormalizeOptions {
            max_distance_km: config.max_distance_km,
            ..NormalizeOptions::default()
        };
        Self { config, options }
    }

    /// Pin the year used by the future-date filter
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.options.current_year = year;
        self
    }

    /// Load, normalize, check and export
    pub fn run(&self, paths: &ImportPaths) -> Result<RunSummary> {
        let outcome = self.resolve(paths)?;

        let writer = ExportWriter::new(
            self.config.output_dir.clone(),
            self.config.compress,
            self.config.pretty,
        )?;
        writer.write_tables(&outcome.registries, &outcome.entries)?;
        writer.write_summary(&outcome.summary)?;

        Ok(outcome.summary)
    }

    /// Load, normalize and check, keeping everything in memory
    pub fn resolve(&self, paths: &ImportPaths) -> Result<ImportOutcome> {
        if paths.logbooks.is_empty() {
            return Err(ImportError::NoLogbooks);
        }

        let (boats, boat_report) = load_boats(&paths.boats)?;
        let (persons, person_report) = load_persons(&paths.persons)?;
        let (destinations, destination_report) = load_destinations(&paths.destinations)?;
        let mut registries = Registries {
            boats,
            persons,
            destinations,
        };

        let mut logbooks = paths.logbooks.clone();
        logbooks.sort();
        info!(files = logbooks.len(), "Processing logbook files");

        let mut resolver = Resolver::new();
        let mut normalizer = Normalizer::new(&mut registries, &mut resolver, self.options);
        for path in &logbooks {
            info!(path = %path.display(), "Processing logbook");
            let records = read_records(path)?;
            normalizer.process_all(&records);
        }
        let (entries, stats) = normalizer.finish();

        let diagnostics = check_consistency(&registries, &entries);
        let reports = LoadReports {
            boats: boat_report,
            persons: person_report,
            destinations: destination_report,
        };
        let summary = summarize(&registries, &entries, &stats, &reports, diagnostics);

        Ok(ImportOutcome {
            registries,
            entries,
            summary,
        })
    }
}

/// Loader counts for the three reference files
struct LoadReports {
    boats: LoadReport,
    persons: LoadReport,
    destinations: LoadReport,
}

fn summarize(
    registries: &Registries,
    entries: &[LogEntry],
    stats: &NormalizeStats,
    reports: &LoadReports,
    diagnostics: Vec<String>,
) -> RunSummary {
    RunSummary {
        exported: EntityCounts {
            boats: registries.boats.len(),
            persons: registries.persons.len(),
            destinations: registries.destinations.len(),
        },
        placeholders: EntityCounts {
            boats: registries.boats.placeholder_count(),
            persons: registries.persons.placeholder_count(),
            destinations: registries.destinations.placeholder_count(),
        },
        entries: entries.len(),
        future_years: stats.future_years,
        excessive_distances: stats.excessive_distances,
        invalid_dates: stats.invalid_dates,
        missing_boats: stats.missing_boats,
        skipped_boats: reports.boats.skipped,
        skipped_persons: reports.persons.skipped,
        archived_persons: reports.persons.archived,
        skipped_destinations: reports.destinations.skipped,
        boat_variant_warnings: reports.boats.warnings,
        diagnostics,
    }
}
