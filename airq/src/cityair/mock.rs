//! Mock CityAir client for running without API access.
//!
//! Loads a posts list and per-station measurement files from a directory
//! and serves them as if they were live API responses.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::domain::{Measurement, Station, StationId};

use super::client::decode_body;
use super::convert::{convert_measurements, convert_posts};
use super::error::CityAirError;
use super::source::AirQualitySource;
use super::types::{MeasurementsResponse, PostDto};

/// Mock client that serves data from JSON files.
///
/// Expected layout:
///
/// ```text
/// <dir>/posts.json              # body of harvester/v2/Posts
/// <dir>/measurements/<id>.json  # body of harvester/v2/Posts/measurements
/// ```
#[derive(Debug, Clone)]
pub struct MockCityAirClient {
    posts: Vec<PostDto>,
    measurements: HashMap<StationId, MeasurementsResponse>,
}

impl MockCityAirClient {
    /// Load fixtures from `data_dir`.
    ///
    /// `posts.json` is required; the `measurements` directory is optional.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, CityAirError> {
        let data_dir = data_dir.as_ref();

        let posts_path = data_dir.join("posts.json");
        let posts = decode_body(&posts_path.display().to_string(), &read(&posts_path)?)?;

        let mut measurements = HashMap::new();
        let measurements_dir = data_dir.join("measurements");
        if measurements_dir.is_dir() {
            let entries = std::fs::read_dir(&measurements_dir).map_err(|e| {
                CityAirError::Fixture(format!("failed to read {:?}: {e}", measurements_dir))
            })?;

            for entry in entries {
                let path = entry
                    .map_err(|e| CityAirError::Fixture(format!("failed to read entry: {e}")))?
                    .path();
                if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                    continue;
                }

                // "117.json" -> 117
                let id = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|s| s.parse::<u64>().ok())
                    .ok_or_else(|| CityAirError::Fixture(format!("invalid filename: {:?}", path)))?;

                let response = decode_body(&path.display().to_string(), &read(&path)?)?;
                measurements.insert(StationId(id), response);
            }
        }

        Ok(Self {
            posts,
            measurements,
        })
    }

    /// Stations that have a measurement fixture.
    pub fn stations_with_measurements(&self) -> Vec<StationId> {
        let mut ids: Vec<StationId> = self.measurements.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl AirQualitySource for MockCityAirClient {
    async fn fetch_stations(&self) -> Result<Vec<Station>, CityAirError> {
        Ok(convert_posts(self.posts.clone()))
    }

    /// `now` is ignored: fixtures are static.
    async fn fetch_latest_measurement(
        &self,
        station: StationId,
        _now: DateTime<Utc>,
    ) -> Result<Measurement, CityAirError> {
        let response = self
            .measurements
            .get(&station)
            .cloned()
            .ok_or(CityAirError::NoMeasurements(station))?;

        convert_measurements(station, response)
    }
}

fn read(path: &Path) -> Result<String, CityAirError> {
    std::fs::read_to_string(path)
        .map_err(|e| CityAirError::Fixture(format!("failed to read {:?}: {e}", path)))
}
