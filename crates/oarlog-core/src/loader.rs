//! Registry loader for the boat, person and destination reference files.
//!
//! Boats are expanded into one entity per rigging variant. Archived member
//! stubs are dropped. Nothing produced here is a placeholder.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{truncate_dump, Result};
use crate::models::{variant_id, Boat, Destination, Person, Sex};
use crate::registry::Registry;
use crate::source::{read_records, RawRecord};
use crate::utils::{parse_distance, parse_seats};

/// Surname prefix the club software uses for stubs reserving deleted ids
pub const ARCHIVE_MARKER: &str = "archiveID:";

/// Separator of per-variant values inside one boat field
const VARIANT_SEPARATOR: char = ';';

/// Counts from loading one reference file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Records read from the file
    pub records: usize,
    /// Entities inserted into the registry (boat variants count separately)
    pub loaded: usize,
    /// Records dropped as unusable (no id, broken variant fields)
    pub skipped: usize,
    /// Member stubs dropped for carrying the archive marker
    pub archived: usize,
    /// Records kept despite a warning (variant count disagreement)
    pub warnings: usize,
}

// ============================================================================
// Boats
// ============================================================================

pub fn load_boats(path: &Path) -> Result<(Registry<Boat>, LoadReport)> {
    info!(path = %path.display(), "Processing boats");
    let records = read_records(path)?;
    Ok(boats_from_records(&records))
}

pub fn boats_from_records(records: &[RawRecord]) -> (Registry<Boat>, LoadReport) {
    let mut registry = Registry::new();
    let mut report = LoadReport {
        records: records.len(),
        ..Default::default()
    };

    for record in records {
        let Some(base_id) = record.text("Id") else {
            warn!("Boat record without Id: skipping");
            debug!(record = %truncate_dump(&record.to_string()), "Full record");
            report.skipped += 1;
            continue;
        };
        let name = record.get("Name").unwrap_or_default();

        let (Some(seats), Some(rigging), Some(coxing)) = (
            record.get("TypeSeats"),
            record.get("TypeRigging"),
            record.get("TypeCoxing"),
        ) else {
            warn!(boat = name, id = base_id, "Boat has no variant fields: skipping");
            report.skipped += 1;
            continue;
        };

        let seats: Vec<&str> = seats.split(VARIANT_SEPARATOR).collect();
        let rigging: Vec<&str> = rigging.split(VARIANT_SEPARATOR).collect();
        let coxing: Vec<&str> = coxing.split(VARIANT_SEPARATOR).collect();

        if seats.len() != rigging.len() || seats.len() != coxing.len() {
            warn!(
                boat = name,
                id = base_id,
                seats = seats.len(),
                rigging = rigging.len(),
                coxing = coxing.len(),
                "Boat has inconsistent variant counts: skipping"
            );
            debug!(record = %truncate_dump(&record.to_string()), "Full record");
            report.skipped += 1;
            continue;
        }

        let n_variants = seats.len();
        if let Some(declared) = record.text("LastVariant") {
            if declared.parse::<usize>().ok() != Some(n_variants) {
                warn!(
                    boat = name,
                    id = base_id,
                    declared,
                    n_variants,
                    "Boat variant count disagrees with LastVariant: using {}",
                    n_variants
                );
                report.warnings += 1;
            }
        }

        let suffix = record.text("NameAffix").map(String::from);
        for (i, ((seat, rig), cox)) in seats.iter().zip(&rigging).zip(&coxing).enumerate() {
            let boat = Boat {
                id: variant_id(base_id, i as u32 + 1),
                base_id: base_id.to_string(),
                name: name.to_string(),
                suffix: suffix.clone(),
                seat_count: parse_seats(seat),
                rigging: rig.trim().to_lowercase(),
                coxed: cox.trim().to_lowercase(),
                is_placeholder: false,
            };
            if registry.insert(boat).is_some() {
                warn!(id = base_id, variant = i + 1, "Duplicate boat variant id");
            } else {
                report.loaded += 1;
            }
        }
    }

    info!(
        boats = registry.len(),
        skipped = report.skipped,
        "Loaded boat variants"
    );
    (registry, report)
}

// ============================================================================
// Persons
// ============================================================================

pub fn load_persons(path: &Path) -> Result<(Registry<Person>, LoadReport)> {
    info!(path = %path.display(), "Processing persons");
    let records = read_records(path)?;
    Ok(persons_from_records(&records))
}

pub fn persons_from_records(records: &[RawRecord]) -> (Registry<Person>, LoadReport) {
    let mut registry = Registry::new();
    let mut report = LoadReport {
        records: records.len(),
        ..Default::default()
    };

    for record in records {
        let Some(id) = record.text("Id") else {
            warn!("Person record without Id: skipping");
            report.skipped += 1;
            continue;
        };

        let last_name = record.text("LastName");
        if last_name.is_some_and(|n| n.starts_with(ARCHIVE_MARKER)) {
            debug!(id, "Skipping archived person");
            report.archived += 1;
            continue;
        }

        let person = Person {
            id: id.to_string(),
            first_name: record.text("FirstName").map(String::from),
            last_name: last_name.map(String::from),
            sex: Sex::from_source(record.get("Gender")),
            deleted: flag(record, "Deleted"),
            hidden: flag(record, "Invisible"),
            is_placeholder: false,
        };
        if registry.insert(person).is_some() {
            warn!(id, "Duplicate person id");
        } else {
            report.loaded += 1;
        }
    }

    info!(
        persons = registry.len(),
        archived = report.archived,
        skipped = report.skipped,
        "Loaded persons"
    );
    (registry, report)
}

/// Flags are set by the presence of the element unless it says "false"
fn flag(record: &RawRecord, tag: &str) -> bool {
    record
        .get(tag)
        .is_some_and(|v| !v.eq_ignore_ascii_case("false"))
}

// ============================================================================
// Destinations
// ============================================================================

pub fn load_destinations(path: &Path) -> Result<(Registry<Destination>, LoadReport)> {
    info!(path = %path.display(), "Processing destinations");
    let records = read_records(path)?;
    Ok(destinations_from_records(&records))
}

pub fn destinations_from_records(records: &[RawRecord]) -> (Registry<Destination>, LoadReport) {
    let mut registry = Registry::new();
    let mut report = LoadReport {
        records: records.len(),
        ..Default::default()
    };

    for record in records {
        let Some(id) = record.text("Id") else {
            warn!("Destination record without Id: skipping");
            report.skipped += 1;
            continue;
        };

        let destination = Destination {
            id: id.to_string(),
            name: record.get("Name").unwrap_or_default().to_string(),
            distance_km: record.has("Distance").then(|| parse_distance(record.get("Distance"))),
            is_open_water: record
                .get("Open")
                .filter(|v| v.eq_ignore_ascii_case("true"))
                .map(|_| true),
            is_placeholder: false,
        };
        if registry.insert(destination).is_some() {
            warn!(id, "Duplicate destination id");
        } else {
            report.loaded += 1;
        }
    }

    info!(
        destinations = registry.len(),
        skipped = report.skipped,
        "Loaded destinations"
    );
    (registry, report)
}
