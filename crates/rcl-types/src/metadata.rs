use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// GPS coordinates captured at the point of action.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Auxiliary facts attached to a custody block.
///
/// The well-known fields cover what the warehouse and distribution flows
/// record today; everything else lands in `extra`, an open map whose keys are
/// preserved verbatim. `extra` is a `BTreeMap` so the canonical serialization
/// of a block is key-order stable — the map participates in the block hash.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodyMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_refs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<GpsPoint>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CustodyMetadata {
    /// Metadata carrying only a quantity and unit, the most common shape.
    pub fn quantity(quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            quantity: Some(quantity),
            unit: Some(unit.into()),
            ..Self::default()
        }
    }

    /// Insert a free-form key into the open side map.
    pub fn insert_extra(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }

    /// The target location, if present and non-empty.
    pub fn target_location(&self) -> Option<&str> {
        self.target_location.as_deref().filter(|s| !s.is_empty())
    }
}
