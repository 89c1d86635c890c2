use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

/// Date format used by the club software and by the exported tables
pub const DATE_FORMAT: &str = "%d.%m.%Y";

fn stable_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .expect("stable id pattern is valid")
    })
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("number pattern is valid"))
}

/// Whether a reference token has the shape of a stable record identifier
pub fn is_stable_id(token: &str) -> bool {
    stable_id_regex().is_match(token)
}

/// Parse a distance like "8 km" or "10.5 km" into whole kilometres.
/// Anything without a number counts as 0.
pub fn parse_distance(text: Option<&str>) -> u32 {
    text.and_then(|t| number_regex().captures(t))
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .map(|km| km.round().min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

/// Parse a seat count like "4X", "8" or "2". Unknown or digit-free values are 0.
pub fn parse_seats(text: &str) -> u32 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Parse a DD.MM.YYYY date
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Reduce a time like "10:30:00" to hour:minute granularity
pub fn parse_time(text: &str) -> Option<String> {
    let mut parts = text.trim().splitn(3, ':');
    let hour = parts.next()?;
    let minute = parts.next().unwrap_or("0");
    let time = NaiveTime::parse_from_str(&format!("{}:{}", hour, minute), "%H:%M").ok()?;
    Some(time.format("%H:%M").to_string())
}

/// Split a free-text person name on its first whitespace run.
/// A single word is treated as the family name.
pub fn split_name(text: &str) -> (Option<String>, Option<String>) {
    let trimmed = text.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => (
            Some(first.to_string()),
            Some(rest.trim_start().to_string()),
        ),
        None if trimmed.is_empty() => (None, None),
        None => (None, Some(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("8 km"), 8)]
    #[case(Some("10.5 km"), 11)]
    #[case(Some("85.6 km"), 86)]
    #[case(Some("150 km"), 150)]
    #[case(Some("ca. 12"), 12)]
    #[case(Some("km"), 0)]
    #[case(Some(""), 0)]
    #[case(None, 0)]
    fn test_parse_distance(#[case] input: Option<&str>, #[case] expected: u32) {
        assert_eq!(parse_distance(input), expected);
    }

    #[rstest]
    #[case("4X", 4)]
    #[case("8", 8)]
    #[case("2", 2)]
    #[case("unknown", 0)]
    #[case("", 0)]
    #[case("Gig 4+", 4)]
    fn test_parse_seats(#[case] input: &str, #[case] expected: u32) {
        assert_eq!(parse_seats(input), expected);
    }

    #[test]
    fn test_is_stable_id() {
        assert!(is_stable_id("0b1c2d3e-4f50-6172-8394-a5b6c7d8e9f0"));
        assert!(!is_stable_id("0B1C2D3E-4F50-6172-8394-A5B6C7D8E9F0"));
        assert!(!is_stable_id("Jane Doe"));
        assert!(!is_stable_id(""));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("03.07.2021"), NaiveDate::from_ymd_opt(2021, 7, 3));
        assert_eq!(parse_date("2021-07-03"), None);
        assert_eq!(parse_date("31.02.2021"), None);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("10:30:00").as_deref(), Some("10:30"));
        assert_eq!(parse_time("7:05").as_deref(), Some("07:05"));
        assert_eq!(parse_time("9").as_deref(), Some("09:00"));
        assert_eq!(parse_time("late"), None);
    }

    #[test]
    fn test_split_name() {
        assert_eq!(
            split_name("Jane Doe"),
            (Some("Jane".to_string()), Some("Doe".to_string()))
        );
        assert_eq!(
            split_name("Anna  von Berg"),
            (Some("Anna".to_string()), Some("von Berg".to_string()))
        );
        assert_eq!(split_name("Cher"), (None, Some("Cher".to_string())));
        assert_eq!(split_name("   "), (None, None));
    }
}
