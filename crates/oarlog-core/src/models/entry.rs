use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One rowing outing after all references have been resolved.
///
/// `crew` holds person ids; when the outing had a coxswain, it is always
/// the first element.
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub year: i32,
    #[serde(with = "entry_date")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub date: NaiveDate,
    #[serde(rename = "t0", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(rename = "t1", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(rename = "boat", default, skip_serializing_if = "Option::is_none")]
    pub boat_id: Option<String>,
    #[serde(default)]
    pub crew: Vec<String>,
    #[serde(rename = "dest", default, skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    #[serde(rename = "dist", default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LogEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            date,
            start_time: None,
            end_time: None,
            boat_id: None,
            crew: Vec::new(),
            destination_id: None,
            distance_km: None,
            session_type: None,
            note: None,
        }
    }
}

/// Dates travel as DD.MM.YYYY, the format the viewer splits on.
mod entry_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::utils::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
