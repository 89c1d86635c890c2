//! Consistency checks over the finished tables.
//!
//! Findings are advisory: they are returned as human-readable lines and
//! never change the data. Whether any of them should fail a run is up to
//! the caller.

use std::collections::HashMap;

use tracing::info;

use crate::models::{split_variant_id, LogEntry};
use crate::registry::Registries;
use crate::utils::DATE_FORMAT;

/// Check every entry reference and registry invariant, in a fixed order:
/// entries first, then duplicate ids, boats, persons.
pub fn check_consistency(registries: &Registries, entries: &[LogEntry]) -> Vec<String> {
    info!("Checking consistency");
    let mut errors = Vec::new();

    check_entries(registries, entries, &mut errors);
    check_duplicates(registries, &mut errors);
    check_boats(registries, &mut errors);
    check_persons(registries, &mut errors);

    errors
}

fn check_entries(registries: &Registries, entries: &[LogEntry], errors: &mut Vec<String>) {
    for (i, entry) in entries.iter().enumerate() {
        match entry.boat_id.as_deref() {
            None => errors.push(format!(
                "Logbook entry {}: no boat ID (date {})",
                i,
                entry.date.format(DATE_FORMAT)
            )),
            Some(boat) if !registries.boats.contains(boat) => errors.push(format!(
                "Logbook entry {}: boat ID '{}' not found in boats",
                i, boat
            )),
            Some(_) => {}
        }

        for (j, person) in entry.crew.iter().enumerate() {
            if !registries.persons.contains(person) {
                errors.push(format!(
                    "Logbook entry {}: crew[{}] ID '{}' not found in persons",
                    i, j, person
                ));
            }
        }

        if let Some(dest) = entry.destination_id.as_deref() {
            if !registries.destinations.contains(dest) {
                errors.push(format!(
                    "Logbook entry {}: destination ID '{}' not found in destinations",
                    i, dest
                ));
            }
        }
    }
}

fn check_duplicates(registries: &Registries, errors: &mut Vec<String>) {
    let tables = [
        ("boat", registries.boats.duplicates()),
        ("person", registries.persons.duplicates()),
        ("destination", registries.destinations.duplicates()),
    ];
    for (kind, duplicates) in tables {
        for id in duplicates {
            errors.push(format!("Duplicate {} ID '{}'", kind, id));
        }
    }
}

/// Variants of one boat must share their base id and name
fn check_boats(registries: &Registries, errors: &mut Vec<String>) {
    let mut names_by_base: HashMap<&str, &str> = HashMap::new();

    for boat in registries.boats.iter().filter(|b| !b.is_placeholder) {
        let stripped = split_variant_id(&boat.id).map(|(base, _)| base);
        if stripped != Some(boat.base_id.as_str()) {
            errors.push(format!(
                "Boat {} has oid {} but original ID {} (name {})",
                boat.id,
                boat.base_id,
                stripped.unwrap_or("<none>"),
                boat.name
            ));
        }

        match names_by_base.get(boat.base_id.as_str()) {
            None => {
                names_by_base.insert(&boat.base_id, &boat.name);
            }
            Some(&name) if name != boat.name => errors.push(format!(
                "Boat {} has name '{}' but a different variant with oid {} has name '{}'",
                boat.id, boat.name, boat.base_id, name
            )),
            Some(_) => {}
        }
    }
}

fn check_persons(registries: &Registries, errors: &mut Vec<String>) {
    for person in registries.persons.iter() {
        if !person.has_name() {
            errors.push(format!(
                "Person '{}' has neither first name nor last name",
                person.id
            ));
        }
    }
}
