//! Field parsing helpers for club software exports.

pub mod parse;

// Re-export commonly used functions at module level
pub use parse::{
    is_stable_id, parse_date, parse_distance, parse_seats, parse_time, split_name, DATE_FORMAT,
};
