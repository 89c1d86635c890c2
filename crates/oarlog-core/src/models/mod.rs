//! Data models for the exported logbook tables.
//!
//! This module contains the four record types written for the viewer:
//!
//! - `Boat`: one per rigging variant of a physical boat
//! - `Person`: club members and placeholder rowers
//! - `Destination`: rowing destinations
//! - `LogEntry`: one per outing, with all references resolved to ids
//!
//! Serialized field names are short tags (`oid`, `fn`, `fmr`, `t0`, ...)
//! shared with the viewer and must stay stable.

pub mod boat;
pub mod destination;
pub mod entry;
pub mod person;

pub use boat::{split_variant_id, variant_id, Boat, UNKNOWN_TAG};
pub use destination::Destination;
pub use entry::LogEntry;
pub use person::{Person, Sex, UNKNOWN_NAME};
