use serde::{Deserialize, Serialize};

/// Rigging/coxing tag used for boats whose configuration is not known
pub const UNKNOWN_TAG: &str = "unknown";

/// One rigging variant of a physical boat.
///
/// The club software stores a boat once with `;`-joined per-variant
/// fields; here every variant is its own entity with id `{oid}-v{n}`.
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boat {
    pub id: String,
    /// Base id shared by all variants of the same boat
    #[serde(rename = "oid")]
    pub base_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Number of seats, 0 when unknown
    #[serde(rename = "size")]
    pub seat_count: u32,
    #[serde(rename = "rig")]
    pub rigging: String,
    #[serde(rename = "cox")]
    pub coxed: String,
    #[serde(rename = "fmr", default)]
    pub is_placeholder: bool,
}

impl Boat {
    /// Stand-in for a boat that is only known by name
    pub fn placeholder(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            base_id: id.to_string(),
            name: name.to_string(),
            suffix: None,
            seat_count: 0,
            rigging: UNKNOWN_TAG.to_string(),
            coxed: UNKNOWN_TAG.to_string(),
            is_placeholder: true,
        }
    }
}

/// Build the id of one variant of a base boat
pub fn variant_id(base_id: &str, variant: u32) -> String {
    format!("{}-v{}", base_id, variant)
}

/// Split `{base}-v{n}` into its base id and variant number
pub fn split_variant_id(id: &str) -> Option<(&str, u32)> {
    let (base, variant) = id.rsplit_once("-v")?;
    if base.is_empty() || variant.is_empty() || !variant.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((base, variant.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_id_round_trip() {
        let id = variant_id("abc", 2);
        assert_eq!(id, "abc-v2");
        assert_eq!(split_variant_id(&id), Some(("abc", 2)));
    }

    #[test]
    fn test_split_variant_id_rejects_plain_ids() {
        assert_eq!(split_variant_id("former-000001"), None);
        assert_eq!(split_variant_id("abc-v"), None);
        assert_eq!(split_variant_id("-v3"), None);
        assert_eq!(split_variant_id("abc-vx"), None);
    }

    #[test]
    fn test_placeholder_boat() {
        let boat = Boat::placeholder("former-000004", "Alte Liebe");
        assert!(boat.is_placeholder);
        assert_eq!(boat.base_id, "former-000004");
        assert_eq!(boat.seat_count, 0);
        assert_eq!(boat.rigging, UNKNOWN_TAG);
        assert_eq!(split_variant_id(&boat.id), None);
    }

    #[test]
    fn test_serialized_keys() {
        let mut boat = Boat::placeholder("former-000001", "Kahn");
        boat.suffix = Some("alt".to_string());
        let json = serde_json::to_value(&boat).unwrap();
        assert_eq!(json["oid"], "former-000001");
        assert_eq!(json["size"], 0);
        assert_eq!(json["rig"], "unknown");
        assert_eq!(json["cox"], "unknown");
        assert_eq!(json["fmr"], true);
        assert_eq!(json["suffix"], "alt");
    }
}
