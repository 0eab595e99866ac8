//! Geographic coordinates and distance metrics.

use std::fmt;

/// Mean Earth radius in kilometres, used by the haversine metric.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Error returned when a coordinate is outside the valid range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    reason: &'static str,
}

/// A (latitude, longitude) pair in degrees.
///
/// Construction through [`Coordinate::new`] performs no validation: values
/// received from the upstream API are trusted as-is. Use
/// [`Coordinate::validated`] for user-supplied input.
///
/// # Examples
///
/// ```
/// use airq::domain::Coordinate;
///
/// let moscow = Coordinate::new(55.75, 37.61);
/// assert_eq!(moscow.latitude(), 55.75);
///
/// assert!(Coordinate::validated(91.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without range checks.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }

        Ok(Self::new(latitude, longitude))
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Straight-line distance on raw degree values.
    ///
    /// Not geodesically exact, but monotone enough for picking the closest
    /// station within a metro area.
    pub fn planar_distance(&self, other: &Coordinate) -> f64 {
        let dlat = other.latitude - self.latitude;
        let dlon = other.longitude - self.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }

    /// Great-circle distance in kilometres.
    pub fn haversine_km(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let hav = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

        // Rounding can push `hav` a hair above 1 for antipodal points.
        2.0 * EARTH_RADIUS_KM * hav.sqrt().min(1.0).asin()
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// How distance between two coordinates is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Euclidean distance on raw degrees.
    #[default]
    Planar,
    /// Great-circle distance in kilometres.
    Haversine,
}

impl DistanceMetric {
    /// Distance between `a` and `b` under this metric.
    pub fn distance(self, a: &Coordinate, b: &Coordinate) -> f64 {
        match self {
            DistanceMetric::Planar => a.planar_distance(b),
            DistanceMetric::Haversine => a.haversine_km(b),
        }
    }

    /// Parse a metric name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planar" | "euclidean" => Some(DistanceMetric::Planar),
            "haversine" | "geodesic" => Some(DistanceMetric::Haversine),
            _ => None,
        }
    }

    /// Unit label for distances under this metric.
    pub fn unit(self) -> &'static str {
        match self {
            DistanceMetric::Planar => "deg",
            DistanceMetric::Haversine => "km",
        }
    }
}
