//! Nearest-station resolution.
//!
//! Picks the station closest to a reference point with a single linear
//! scan. Ties go to the station that appears first in the input, so the
//! result is deterministic for a given list order.

use crate::domain::{Coordinate, DistanceMetric, LocateError, Station};

/// A station paired with its distance from the reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    pub station: &'a Station,
    /// Distance in the unit of the metric that produced it.
    pub distance: f64,
}

/// Find the station nearest to `reference` by planar distance on raw degrees.
///
/// Returns [`LocateError::EmptyInput`] when `stations` is empty.
pub fn find_nearest<'a>(
    reference: &Coordinate,
    stations: &'a [Station],
) -> Result<&'a Station, LocateError> {
    find_nearest_by(reference, stations, DistanceMetric::Planar).map(|r| r.station)
}

/// Find the nearest station under the given metric.
///
/// The first station encountered wins ties.
pub fn find_nearest_by<'a>(
    reference: &Coordinate,
    stations: &'a [Station],
    metric: DistanceMetric,
) -> Result<Ranked<'a>, LocateError> {
    nearest_in(reference, stations.iter(), metric).ok_or(LocateError::EmptyInput)
}

/// Find the nearest station that is currently online.
///
/// Fails with [`LocateError::EmptyInput`] for an empty list, and with
/// [`LocateError::NoOnlineStation`] when every station is offline.
pub fn nearest_online<'a>(
    reference: &Coordinate,
    stations: &'a [Station],
    metric: DistanceMetric,
) -> Result<Ranked<'a>, LocateError> {
    if stations.is_empty() {
        return Err(LocateError::EmptyInput);
    }

    nearest_in(reference, stations.iter().filter(|s| s.is_online), metric)
        .ok_or(LocateError::NoOnlineStation(stations.len()))
}

/// Pair every station with its distance, closest first.
///
/// Equidistant stations keep their input order.
pub fn rank_by_distance<'a>(
    reference: &Coordinate,
    stations: &'a [Station],
    metric: DistanceMetric,
) -> Vec<Ranked<'a>> {
    let mut ranked: Vec<Ranked<'a>> = stations
        .iter()
        .map(|station| Ranked {
            station,
            distance: metric.distance(reference, &station.coordinate),
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}

/// Running-minimum scan. The incumbent survives ties, so the earliest wins.
fn nearest_in<'a>(
    reference: &Coordinate,
    stations: impl Iterator<Item = &'a Station>,
    metric: DistanceMetric,
) -> Option<Ranked<'a>> {
    stations
        .map(|station| Ranked {
            station,
            distance: metric.distance(reference, &station.coordinate),
        })
        .fold(None, |best, candidate| match best {
            Some(b) if b.distance <= candidate.distance => Some(b),
            _ => Some(candidate),
        })
}
