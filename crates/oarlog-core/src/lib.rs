//! oarlog-core: convert rowing club logbook backups into normalized tables.
//!
//! The club software exports boats, members, destinations and logbooks as
//! XML. Its references are messy: entities are sometimes named by id and
//! sometimes by free text, boats carry several rigging variants under one
//! id, and old logbook entries point at records that no longer exist.
//!
//! This crate loads the reference files into [`Registries`], resolves every
//! logbook reference against them (minting placeholder entities where
//! nothing matches), filters implausible entries, checks the result for
//! consistency and writes four JSON tables for the web viewer.

pub mod checker;
pub mod config;
pub mod error;
pub mod export;
pub mod importer;
pub mod loader;
pub mod models;
pub mod normalizer;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod utils;

pub use checker::check_consistency;
pub use config::Config;
pub use error::{ImportError, Result};
pub use importer::{ImportOutcome, ImportPaths, Importer, RunSummary};
pub use models::{Boat, Destination, LogEntry, Person, Sex};
pub use normalizer::{NormalizeOptions, NormalizeStats, Normalizer};
pub use registry::{Entity, Registries, Registry};
pub use resolver::{EntityKind, Resolver};
pub use source::RawRecord;
