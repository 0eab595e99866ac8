//! Plain-text rendering of a station and its latest readings.

use std::fmt;

use serde_json::Value;

use crate::domain::{DistanceMetric, Measurement, Reading, Station};

/// A station and its latest measurement, ready for display.
///
/// ```text
/// Station: Tverskaya (#117) at 55.75700, 37.61500 (0.00120 deg away)
///   address: Tverskaya st. 13
///   ownerId: 3
/// Measured: 2024-03-15T10:05:00Z
/// AQI: 2
/// temperature: 3.4 °C
/// humidity: n/a
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub station: &'a Station,
    pub distance: f64,
    pub metric: DistanceMetric,
    pub measurement: &'a Measurement,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Station: {} at {} ({:.5} {} away)",
            self.station.label(),
            self.station.coordinate,
            self.distance,
            self.metric.unit()
        )?;

        // Only scalar upstream fields; nested objects are too noisy for a console.
        for (key, value) in &self.station.metadata {
            if let Some(text) = scalar_text(value) {
                writeln!(f, "  {key}: {text}")?;
            }
        }

        if let Some(date) = &self.measurement.date {
            writeln!(f, "Measured: {date}")?;
        }
        match self.measurement.aqi {
            Some(aqi) => writeln!(f, "AQI: {}", format_value(aqi))?,
            None => writeln!(f, "AQI: n/a")?,
        }
        for reading in &self.measurement.readings {
            writeln!(f, "{}", render_reading(reading))?;
        }

        Ok(())
    }
}

/// Render the station header, its metadata, AQI and one line per reading.
pub fn render(
    station: &Station,
    distance: f64,
    metric: DistanceMetric,
    measurement: &Measurement,
) -> String {
    Report {
        station,
        distance,
        metric,
        measurement,
    }
    .to_string()
}

/// `name: value unit`, with `n/a` for a null value.
pub fn render_reading(reading: &Reading) -> String {
    let value = match reading.value {
        Some(v) => format_value(v),
        None => return format!("{}: n/a", reading.name),
    };

    match &reading.unit {
        Some(unit) if !unit.is_empty() => format!("{}: {value} {unit}", reading.name),
        _ => format!("{}: {value}", reading.name),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integers print without a trailing `.0`.
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
