//! Nearest air-quality station client.
//!
//! Queries the CityAir API, finds the monitoring station closest to a
//! reference point and reports its latest sensor readings.

pub mod app;
pub mod cityair;
pub mod config;
pub mod domain;
pub mod locator;
pub mod report;
