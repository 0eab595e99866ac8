//! Sensor readings for one station.

/// A single named sensor value.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Upstream field name, e.g. `temperature` or `pm2`.
    pub name: String,
    /// `None` when the sensor reported null.
    pub value: Option<f64>,
    pub unit: Option<String>,
}

impl Reading {
    pub fn new(name: impl Into<String>, value: Option<f64>, unit: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit,
        }
    }
}

/// The latest averaged record reported by a station.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Measurement {
    /// Start of the averaging interval, as reported upstream.
    pub date: Option<String>,
    /// Aggregate CityAir air-quality index.
    pub aqi: Option<f64>,
    /// Readings in the order they should be displayed.
    pub readings: Vec<Reading>,
}

impl Measurement {
    /// Look up a reading by field name.
    pub fn get(&self, name: &str) -> Option<&Reading> {
        self.readings.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_by_name() {
        let m = Measurement {
            date: None,
            aqi: Some(2.0),
            readings: vec![
                Reading::new("temperature", Some(21.5), Some("°C".into())),
                Reading::new("pm2", None, None),
            ],
        };
        assert_eq!(m.get("temperature").and_then(|r| r.value), Some(21.5));
        assert!(m.get("pm2").is_some_and(|r| r.value.is_none()));
        assert!(m.get("co2").is_none());
    }
}
