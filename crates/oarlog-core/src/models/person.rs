use serde::{Deserialize, Serialize};

/// Family name given to placeholders whose reference carries no usable name
pub const UNKNOWN_NAME: &str = "Unknown";

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
    #[default]
    #[serde(rename = "u")]
    Unknown,
}

impl Sex {
    /// Classify the club software's gender value; anything unrecognized is unknown
    pub fn from_source(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("male") => Sex::Male,
            Some("female") => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

/// A club member, or a placeholder for a rower only known by name.
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(rename = "fn", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "ln", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub sex: Sex,
    // Both flags are carried through as-is; flagged members still row.
    #[serde(rename = "del", default)]
    pub deleted: bool,
    #[serde(rename = "hid", default)]
    pub hidden: bool,
    #[serde(rename = "fmr", default)]
    pub is_placeholder: bool,
}

impl Person {
    pub fn placeholder(id: &str, first_name: Option<String>, last_name: Option<String>) -> Self {
        Self {
            id: id.to_string(),
            first_name,
            last_name,
            sex: Sex::Unknown,
            deleted: false,
            hidden: false,
            is_placeholder: true,
        }
    }

    fn first(&self) -> Option<&str> {
        self.first_name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    fn last(&self) -> Option<&str> {
        self.last_name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Whether at least one of given or family name carries text
    pub fn has_name(&self) -> bool {
        self.first().is_some() || self.last().is_some()
    }
}
