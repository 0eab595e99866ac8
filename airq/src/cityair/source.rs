//! Abstraction over where station data comes from.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::domain::{Measurement, Station, StationId};

use super::error::CityAirError;

/// Trait for providing stations and their readings.
///
/// This abstraction allows the lookup flow to be run against fixture data.
pub trait AirQualitySource {
    /// All stations visible to the caller, in upstream order.
    fn fetch_stations(&self) -> impl Future<Output = Result<Vec<Station>, CityAirError>> + Send;

    /// Latest averaged measurement for `station` as of `now`.
    fn fetch_latest_measurement(
        &self,
        station: StationId,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Measurement, CityAirError>> + Send;
}
