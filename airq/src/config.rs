//! Runtime configuration, read from environment variables.

use std::path::PathBuf;

use crate::cityair::{CityAirConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::{Coordinate, DistanceMetric, InvalidCoordinate};

pub const TOKEN_VAR: &str = "CITYAIR_TOKEN";
pub const LATITUDE_VAR: &str = "CITYAIR_LATITUDE";
pub const LONGITUDE_VAR: &str = "CITYAIR_LONGITUDE";
pub const HOST_VAR: &str = "CITYAIR_HOST";
pub const TIMEOUT_VAR: &str = "CITYAIR_TIMEOUT_SECS";
pub const METRIC_VAR: &str = "CITYAIR_METRIC";
pub const MOCK_DIR_VAR: &str = "CITYAIR_MOCK_DIR";

/// Errors from loading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable could not be parsed
    #[error("{var} is invalid: {value:?}")]
    Invalid { var: &'static str, value: String },

    /// Latitude/longitude parsed but out of range
    #[error(transparent)]
    Coordinate(#[from] InvalidCoordinate),
}

/// Where to look and how to measure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Reference point to find the nearest station to.
    pub reference: Coordinate,

    pub metric: DistanceMetric,

    /// API access. Unused when `mock_dir` is set.
    pub api: CityAirConfig,

    /// Serve fixtures from this directory instead of calling the API.
    pub mock_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let mock_dir = get(MOCK_DIR_VAR).map(PathBuf::from);

        // A token is only needed when talking to the real API.
        let token = match get(TOKEN_VAR) {
            Some(token) => token,
            None if mock_dir.is_some() => String::new(),
            None => return Err(ConfigError::Missing(TOKEN_VAR)),
        };

        let latitude = parse_f64(LATITUDE_VAR, get(LATITUDE_VAR))?;
        let longitude = parse_f64(LONGITUDE_VAR, get(LONGITUDE_VAR))?;
        let reference = Coordinate::validated(latitude, longitude)?;

        let metric = match get(METRIC_VAR) {
            Some(value) => DistanceMetric::parse(&value).ok_or(ConfigError::Invalid {
                var: METRIC_VAR,
                value,
            })?,
            None => DistanceMetric::default(),
        };

        let timeout_secs = match get(TIMEOUT_VAR) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or(ConfigError::Invalid {
                    var: TIMEOUT_VAR,
                    value,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let base_url = get(HOST_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            reference,
            metric,
            api: CityAirConfig::new(token)
                .with_base_url(base_url)
                .with_timeout(timeout_secs),
            mock_dir,
        })
    }
}

fn parse_f64(var: &'static str, value: Option<String>) -> Result<f64, ConfigError> {
    let value = value.ok_or(ConfigError::Missing(var))?;
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::Invalid { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| map.get(var).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        (TOKEN_VAR, "tok"),
        (LATITUDE_VAR, "55.75"),
        (LONGITUDE_VAR, "37.61"),
    ];

    #[test]
    fn minimal_config_uses_defaults() {
        let config = load(MINIMAL).unwrap();

        assert_eq!(config.reference, Coordinate::new(55.75, 37.61));
        assert_eq!(config.metric, DistanceMetric::Planar);
        assert_eq!(config.api.token, "tok");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.mock_dir.is_none());
    }

    #[test]
    fn overrides() {
        let mut vars = MINIMAL.to_vec();
        vars.extend([
            (HOST_VAR, "http://localhost:9000"),
            (TIMEOUT_VAR, "30"),
            (METRIC_VAR, "haversine"),
        ]);
        let config = load(&vars).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.metric, DistanceMetric::Haversine);
    }

    #[test]
    fn missing_token() {
        let err = load(&[(LATITUDE_VAR, "1"), (LONGITUDE_VAR, "2")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing(TOKEN_VAR));
        assert_eq!(err.to_string(), "CITYAIR_TOKEN must be set");
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let err = load(&[(TOKEN_VAR, "  "), (LATITUDE_VAR, "1"), (LONGITUDE_VAR, "2")])
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(TOKEN_VAR));
    }

    #[test]
    fn mock_mode_needs_no_token() {
        let config = load(&[
            (MOCK_DIR_VAR, "fixtures"),
            (LATITUDE_VAR, "1"),
            (LONGITUDE_VAR, "2"),
        ])
        .unwrap();
        assert_eq!(config.mock_dir, Some(PathBuf::from("fixtures")));
    }

    #[test]
    fn missing_longitude() {
        let err = load(&[(TOKEN_VAR, "tok"), (LATITUDE_VAR, "1")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing(LONGITUDE_VAR));
    }

    #[test]
    fn unparsable_latitude() {
        let err = load(&[(TOKEN_VAR, "tok"), (LATITUDE_VAR, "lat"), (LONGITUDE_VAR, "2")])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: LATITUDE_VAR,
                value: "lat".into()
            }
        );
        assert_eq!(err.to_string(), "CITYAIR_LATITUDE is invalid: \"lat\"");
    }

    #[test]
    fn out_of_range_coordinate() {
        let err = load(&[(TOKEN_VAR, "tok"), (LATITUDE_VAR, "95"), (LONGITUDE_VAR, "2")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Coordinate(_)));
    }

    #[test]
    fn bad_metric_and_timeout() {
        let mut vars = MINIMAL.to_vec();
        vars.push((METRIC_VAR, "manhattan"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { var: METRIC_VAR, .. })
        ));

        let mut vars = MINIMAL.to_vec();
        vars.push((TIMEOUT_VAR, "0"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { var: TIMEOUT_VAR, .. })
        ));
    }
}
