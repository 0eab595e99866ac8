//! CityAir API response DTOs.
//!
//! These types map directly to the harvester v2 JSON responses. Only the
//! fields the client relies on are typed; everything else is captured in
//! flattened maps so no upstream metadata is lost.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

/// One monitoring post from `harvester/v2/Posts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: u64,

    pub name: Option<String>,

    /// Missing means the API did not say; treated as online.
    pub is_online: Option<bool>,

    pub geo: GeoDto,

    /// Remaining post fields (address, owner, sensors, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Location block nested in every post.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoDto {
    pub latitude: f64,
    pub longitude: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from `harvester/v2/Posts/measurements`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementsResponse {
    #[serde(default)]
    pub meta: MetaDto,

    /// Averaged records, oldest first.
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaDto {
    /// Field name to unit label, e.g. `temperature` to `°C`.
    #[serde(default)]
    pub units: BTreeMap<String, String>,
}
