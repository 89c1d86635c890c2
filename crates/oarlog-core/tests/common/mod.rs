//! Shared fixtures for the import harnesses.
//!
//! Builds small club-software exports on disk so tests can drive the whole
//! pipeline through [`oarlog_core::Importer`].

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use oarlog_core::{Config, ImportPaths};
use tempfile::TempDir;

pub const BOAT_A: &str = "aaaaaaaa-0000-4000-8000-000000000001";
pub const BOAT_B: &str = "aaaaaaaa-0000-4000-8000-000000000002";
pub const PERSON_MAX: &str = "bbbbbbbb-0000-4000-8000-000000000001";
pub const PERSON_ERIKA: &str = "bbbbbbbb-0000-4000-8000-000000000002";
pub const PERSON_NAMELESS: &str = "bbbbbbbb-0000-4000-8000-000000000003";
pub const PERSON_ARCHIVED: &str = "bbbbbbbb-0000-4000-8000-000000000004";
pub const DEST_WEHR: &str = "cccccccc-0000-4000-8000-000000000001";

/// Year the future-date filter is pinned to in harness runs
pub const CURRENT_YEAR: i32 = 2024;

/// One `<record>` as (tag, value) pairs
pub type Fields<'a> = &'a [(&'a str, &'a str)];

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Render a club-software document with the given records
pub fn document(kind: &str, records: &[Fields]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<efa>\n");
    xml.push_str(&format!("  <header><type>{}</type></header>\n  <data>\n", kind));
    for record in records {
        xml.push_str("    <record>");
        for (tag, value) in record.iter() {
            if value.is_empty() {
                xml.push_str(&format!("<{}/>", tag));
            } else {
                xml.push_str(&format!("<{tag}>{}</{tag}>", escape(value)));
            }
        }
        xml.push_str("</record>\n");
    }
    xml.push_str("  </data>\n</efa>\n");
    xml
}

pub fn boats_xml() -> String {
    document(
        "efa2boats",
        &[
            &[
                ("Id", BOAT_A),
                ("Name", "Wanderlust"),
                ("LastVariant", "3"),
                ("TypeSeats", "4X;4"),
                ("TypeRigging", "SCULL;RIEMEN"),
                ("TypeCoxing", "COXED;COXED"),
            ],
            &[
                ("Id", BOAT_B),
                ("Name", "Einer"),
                ("NameAffix", "rot"),
                ("LastVariant", "1"),
                ("TypeSeats", "1"),
                ("TypeRigging", "SCULL"),
                ("TypeCoxing", "COXLESS"),
            ],
        ],
    )
}

pub fn persons_xml() -> String {
    document(
        "efa2persons",
        &[
            &[
                ("Id", PERSON_MAX),
                ("FirstName", "Max"),
                ("LastName", "Muster"),
                ("Gender", "MALE"),
            ],
            &[
                ("Id", PERSON_ERIKA),
                ("FirstName", "Erika"),
                ("LastName", "Steuer"),
                ("Gender", "FEMALE"),
                ("Invisible", "true"),
            ],
            &[
                ("Id", PERSON_ARCHIVED),
                ("LastName", "archiveID:0815"),
                ("Gender", "MALE"),
            ],
        ],
    )
}

pub fn destinations_xml() -> String {
    document(
        "efa2destinations",
        &[&[
            ("Id", DEST_WEHR),
            ("Name", "Wehr"),
            ("Distance", "12 km"),
        ]],
    )
}

/// A scratch directory holding one complete export
pub struct Fixture {
    pub dir: TempDir,
    pub logbooks: Vec<PathBuf>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "boats.efa2boats", &boats_xml());
        write(dir.path(), "persons.efa2persons", &persons_xml());
        write(dir.path(), "destinations.efa2destinations", &destinations_xml());
        Self {
            dir,
            logbooks: Vec::new(),
        }
    }

    pub fn add_logbook(&mut self, name: &str, records: &[Fields]) -> &mut Self {
        let path = write(self.dir.path(), name, &document("efa2logbook", records));
        self.logbooks.push(path);
        self
    }

    pub fn paths(&self) -> ImportPaths {
        ImportPaths {
            boats: self.dir.path().join("boats.efa2boats"),
            persons: self.dir.path().join("persons.efa2persons"),
            destinations: self.dir.path().join("destinations.efa2destinations"),
            logbooks: self.logbooks.clone(),
        }
    }

    pub fn output_dir(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn config(&self, output: &str, compress: bool) -> Config {
        Config {
            output_dir: self.output_dir(output),
            compress,
            ..Config::default()
        }
    }
}

pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
