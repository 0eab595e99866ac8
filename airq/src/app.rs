//! The end-to-end lookup: fetch stations, pick the nearest, fetch its readings.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::cityair::{AirQualitySource, CityAirError};
use crate::config::ConfigError;
use crate::domain::{Coordinate, DistanceMetric, LocateError, Measurement, Station};
use crate::locator::nearest_online;
use crate::report::Report;

/// Errors from a full lookup run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("CityAir: {0}")]
    CityAir(#[from] CityAirError),

    #[error("locating station: {0}")]
    Locate(#[from] LocateError),
}

/// Nearest station together with its latest measurement.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub station: Station,
    pub distance: f64,
    pub metric: DistanceMetric,
    pub measurement: Measurement,
}

impl Lookup {
    /// Plain-text report for printing.
    pub fn report(&self) -> Report<'_> {
        Report {
            station: &self.station,
            distance: self.distance,
            metric: self.metric,
            measurement: &self.measurement,
        }
    }

    pub fn render(&self) -> String {
        self.report().to_string()
    }
}

/// Find the nearest online station to `reference` and fetch its readings.
pub async fn nearest_readings<S: AirQualitySource>(
    source: &S,
    reference: &Coordinate,
    metric: DistanceMetric,
    now: DateTime<Utc>,
) -> Result<Lookup, AppError> {
    let stations = source.fetch_stations().await?;
    info!(count = stations.len(), "fetched stations");

    let nearest = nearest_online(reference, &stations, metric)?;
    debug!(
        station = %nearest.station.id,
        distance = nearest.distance,
        unit = metric.unit(),
        "nearest station"
    );

    let measurement = source
        .fetch_latest_measurement(nearest.station.id, now)
        .await?;
    info!(
        station = %nearest.station.id,
        readings = measurement.readings.len(),
        "fetched latest measurement"
    );

    Ok(Lookup {
        station: nearest.station.clone(),
        distance: nearest.distance,
        metric,
        measurement,
    })
}
