//! Logbook normalizer: turns raw log records into [`LogEntry`] values.
//!
//! Every boat, crew, coxswain and destination reference is resolved through
//! the [`Resolver`], so admitted entries only carry registry ids. Two
//! admission filters drop records outright: dates in a future year and
//! distances above the configured maximum. Records with an unreadable date
//! are dropped as well.

use chrono::{Datelike, Local};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::truncate_dump;
use crate::models::{variant_id, LogEntry};
use crate::registry::Registries;
use crate::resolver::{EntityKind, Resolver};
use crate::source::RawRecord;
use crate::utils::{parse_date, parse_distance, parse_time};

/// Default cap on a single outing's distance, in kilometres
pub const DEFAULT_MAX_DISTANCE_KM: u32 = 100;

/// Number of crew slots (`Crew1Id` .. `Crew19Id`) in a log record
pub const CREW_SLOTS: usize = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub max_distance_km: u32,
    /// Entries dated after this year are rejected
    pub current_year: i32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            current_year: Local::now().year(),
        }
    }
}

/// Counters for records that were rejected or flagged while normalizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub records: usize,
    pub admitted: usize,
    pub future_years: usize,
    pub excessive_distances: usize,
    pub invalid_dates: usize,
    pub missing_boats: usize,
}

impl NormalizeStats {
    pub fn rejected(&self) -> usize {
        self.future_years + self.excessive_distances + self.invalid_dates
    }
}

/// Normalizes log records against a set of registries.
///
/// The registries grow as placeholders are minted; entries are appended in
/// the order records are fed in.
pub struct Normalizer<'a> {
    registries: &'a mut Registries,
    resolver: &'a mut Resolver,
    options: NormalizeOptions,
    entries: Vec<LogEntry>,
    stats: NormalizeStats,
}

impl<'a> Normalizer<'a> {
    pub fn new(
        registries: &'a mut Registries,
        resolver: &'a mut Resolver,
        options: NormalizeOptions,
    ) -> Self {
        Self {
            registries,
            resolver,
            options,
            entries: Vec::new(),
            stats: NormalizeStats::default(),
        }
    }

    /// Normalize a batch of records in document order
    pub fn process_all<'r>(&mut self, records: impl IntoIterator<Item = &'r RawRecord>) {
        for record in records {
            self.process(record);
        }
    }

    /// Normalize one record. Returns whether an entry was admitted.
    pub fn process(&mut self, record: &RawRecord) -> bool {
        self.stats.records += 1;
        match self.normalize(record) {
            Some(entry) => {
                self.entries.push(entry);
                self.stats.admitted += 1;
                true
            }
            None => false,
        }
    }

    pub fn stats(&self) -> &NormalizeStats {
        &self.stats
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn finish(self) -> (Vec<LogEntry>, NormalizeStats) {
        (self.entries, self.stats)
    }

    fn normalize(&mut self, record: &RawRecord) -> Option<LogEntry> {
        let Some(date) = record.text("Date").and_then(parse_date) else {
            self.stats.invalid_dates += 1;
            warn!(date = ?record.get("Date"), "Entry without a valid date, skipping");
            debug!(record = %truncate_dump(&record.to_string()), "Full record");
            return None;
        };

        if date.year() > self.options.current_year {
            self.stats.future_years += 1;
            warn!(date = %record.get("Date").unwrap_or_default(), "Entry with future year, skipping");
            debug!(record = %truncate_dump(&record.to_string()), "Full record");
            return None;
        }

        // Filter before resolving so rejected records mint no placeholders
        let distance = parse_distance(record.get("Distance"));
        if distance > self.options.max_distance_km {
            self.stats.excessive_distances += 1;
            warn!(
                distance_km = distance,
                max_km = self.options.max_distance_km,
                "Entry with excessive distance, skipping"
            );
            debug!(record = %truncate_dump(&record.to_string()), "Full record");
            return None;
        }

        let mut entry = LogEntry::new(date);
        entry.start_time = record.text("StartTime").and_then(parse_time);
        entry.end_time = record.text("EndTime").and_then(parse_time);

        entry.boat_id = self.resolve_boat(record);
        if entry.boat_id.is_none() {
            self.stats.missing_boats += 1;
            debug!(record = %truncate_dump(&record.to_string()), "Entry without boat");
        }

        entry.crew = self.resolve_crew(record);
        entry.destination_id = self.resolve_by_id_or_name(
            record,
            "DestinationId",
            "DestinationName",
            EntityKind::Destination,
        );
        entry.distance_km = record.has("Distance").then_some(distance);
        entry.session_type = record.text("SessionType").map(str::to_lowercase);
        entry.note = record.text("Comments").map(String::from);

        Some(entry)
    }

    fn resolve_boat(&mut self, record: &RawRecord) -> Option<String> {
        let boat_name = record.text("BoatName");

        let Some(boat_id) = record.text("BoatId") else {
            return boat_name.map(|name| self.resolve(name, EntityKind::Boat));
        };

        let declared = record
            .text("BoatVariant")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(1);

        // Exact variant first, then lower variants of the same boat
        for variant in (1..=declared).rev() {
            let id = variant_id(boat_id, variant);
            if self.registries.boats.contains(&id) {
                if variant != declared {
                    debug!(boat = boat_id, declared, used = variant, "Boat variant not found, using lower variant");
                }
                return Some(id);
            }
        }

        debug!(boat = boat_id, variant = declared, "Boat not found in registry, resolving by name");
        Some(self.resolve(boat_name.unwrap_or(boat_id), EntityKind::Boat))
    }

    fn resolve_crew(&mut self, record: &RawRecord) -> Vec<String> {
        let mut crew = Vec::new();
        for slot in 1..=CREW_SLOTS {
            let id_tag = format!("Crew{}Id", slot);
            let name_tag = format!("Crew{}Name", slot);
            if let Some(person) =
                self.resolve_by_id_or_name(record, &id_tag, &name_tag, EntityKind::Person)
            {
                crew.push(person);
            }
        }

        if let Some(cox) = self.resolve_by_id_or_name(record, "CoxId", "CoxName", EntityKind::Person)
        {
            crew.insert(0, cox);
        }
        crew
    }

    fn resolve_by_id_or_name(
        &mut self,
        record: &RawRecord,
        id_tag: &str,
        name_tag: &str,
        kind: EntityKind,
    ) -> Option<String> {
        let token = record.text(id_tag).or_else(|| record.text(name_tag))?;
        Some(self.resolve(token, kind))
    }

    fn resolve(&mut self, token: &str, kind: EntityKind) -> String {
        self.resolver.resolve(token, kind, self.registries)
    }
}
