//! Domain types for the air-quality client.
//!
//! Stations and measurements are transient: fetched fresh per run, never
//! mutated after receipt. Coordinates from the upstream API are trusted;
//! only user input goes through [`Coordinate::validated`].

mod coordinate;
mod error;
mod measurement;
mod station;

pub use coordinate::{Coordinate, DistanceMetric, EARTH_RADIUS_KM, InvalidCoordinate};
pub use error::LocateError;
pub use measurement::{Measurement, Reading};
pub use station::{Station, StationId};
