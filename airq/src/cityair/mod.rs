//! CityAir air-quality API client.
//!
//! This module provides an HTTP client for the CityAir "harvester" API,
//! which exposes monitoring posts and their averaged sensor readings.
//!
//! Key characteristics of the API:
//! - Every request carries a bearer token
//! - Post coordinates are nested in a `geo` object
//! - Measurements are averaged over 5-minute intervals; the last record in
//!   `data` is the latest
//! - Units live in `meta.units`, separate from the values

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{CityAirClient, CityAirConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use convert::{
    INTERVAL_MINS, convert_measurements, convert_post, convert_posts, format_window_start,
    window_start,
};
pub use error::CityAirError;
pub use mock::MockCityAirClient;
pub use source::AirQualitySource;
pub use types::{GeoDto, MeasurementsResponse, MetaDto, PostDto};
