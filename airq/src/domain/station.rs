//! Monitoring station types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Coordinate;

/// Upstream identifier of a monitoring station (a CityAir "post").
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed air-quality sensor installation.
///
/// Everything the locator needs is lifted into typed fields. The rest of
/// the upstream record is kept verbatim in `metadata` for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub coordinate: Coordinate,
    /// Whether the station is currently reporting.
    pub is_online: bool,
    /// Human-readable name, if the upstream record carries one.
    pub name: Option<String>,
    pub metadata: Map<String, Value>,
}

impl Station {
    /// Create an online station with no name or metadata.
    pub fn new(id: StationId, coordinate: Coordinate) -> Self {
        Self {
            id,
            coordinate,
            is_online: true,
            name: None,
            metadata: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn offline(mut self) -> Self {
        self.is_online = false;
        self
    }

    /// Name for display, falling back to the id.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} (#{})", self.id),
            None => format!("#{}", self.id),
        }
    }
}
