use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    /// Typical round-trip distance in whole kilometres
    #[serde(rename = "dist", default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<u32>,
    #[serde(rename = "open", default, skip_serializing_if = "Option::is_none")]
    pub is_open_water: Option<bool>,
    #[serde(rename = "fmr", default)]
    pub is_placeholder: bool,
}

impl Destination {
    pub fn placeholder(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            distance_km: None,
            is_open_water: None,
            is_placeholder: true,
        }
    }
}
