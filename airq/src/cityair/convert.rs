//! Conversion from CityAir DTOs to domain types.

use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use serde_json::{Map, Value};

use crate::domain::{Coordinate, Measurement, Reading, Station, StationId};

use super::error::CityAirError;
use super::types::{MeasurementsResponse, PostDto};

/// Averaging interval requested from the measurements endpoint, in minutes.
pub const INTERVAL_MINS: u32 = 5;

/// Display order for well-known fields. Anything else follows alphabetically.
const FIELD_ORDER: &[&str] = &[
    "temperature",
    "pressure",
    "humidity",
    "pm2",
    "pm10",
    "co",
    "co2",
    "no",
    "no2",
    "so2",
    "o3",
    "h2s",
    "nh3",
];

/// Fields of a measurement record that are not sensor readings.
const NON_READING_FIELDS: &[&str] = &["date", "aqi", "id", "postId"];

/// Convert a post into a station.
///
/// Extra `geo` fields (address, district, ...) are merged into the station
/// metadata next to the other post fields. On a name clash the `geo` value wins.
pub fn convert_post(post: PostDto) -> Station {
    let mut metadata = post.extra;
    metadata.extend(post.geo.extra);

    Station {
        id: StationId(post.id),
        coordinate: Coordinate::new(post.geo.latitude, post.geo.longitude),
        is_online: post.is_online.unwrap_or(true),
        name: post.name,
        metadata,
    }
}

/// Convert the whole posts response, preserving upstream order.
pub fn convert_posts(posts: Vec<PostDto>) -> Vec<Station> {
    posts.into_iter().map(convert_post).collect()
}

/// Start of the measurement window for a request made at `now`.
///
/// `now` is floored to the 5-minute interval it falls in, then moved back one
/// interval, so the window always covers at least one completed average.
pub fn window_start(now: DateTime<Utc>) -> NaiveDateTime {
    let naive = now.naive_utc();
    let floored = naive
        .with_minute((naive.minute() / INTERVAL_MINS) * INTERVAL_MINS)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(naive);

    floored - Duration::minutes(i64::from(INTERVAL_MINS))
}

/// Format a window start the way the measurements endpoint expects it.
pub fn format_window_start(start: NaiveDateTime) -> String {
    start.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Extract the latest record from a measurements response.
pub fn convert_measurements(
    station: StationId,
    response: MeasurementsResponse,
) -> Result<Measurement, CityAirError> {
    let MeasurementsResponse { meta, mut data } = response;
    let record = data.pop().ok_or(CityAirError::NoMeasurements(station))?;

    let date = record.get("date").and_then(Value::as_str).map(str::to_string);
    let aqi = extract_aqi(&record)?;

    let mut readings: Vec<Reading> = record
        .iter()
        .filter(|(key, _)| !NON_READING_FIELDS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Number(n) => n.as_f64(),
                Value::Null => None,
                // Nested objects and strings are not sensor values
                _ => return None,
            };
            Some(Reading::new(key.clone(), value, meta.units.get(key).cloned()))
        })
        .collect();

    readings.sort_by_key(|r| field_rank(&r.name));

    Ok(Measurement {
        date,
        aqi,
        readings,
    })
}

/// Pull `aqi.cityairAqi.value` out of a record.
///
/// A missing `aqi` block is allowed; a present one with the wrong shape is not.
fn extract_aqi(record: &Map<String, Value>) -> Result<Option<f64>, CityAirError> {
    let Some(aqi) = record.get("aqi") else {
        return Ok(None);
    };
    if aqi.is_null() {
        return Ok(None);
    }

    let value = aqi
        .get("cityairAqi")
        .and_then(|a| a.get("value"))
        .ok_or_else(|| CityAirError::Malformed(format!("unexpected aqi block: {aqi}")))?;

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        _ => Err(CityAirError::Malformed(format!("non-numeric aqi value: {value}"))),
    }
}

fn field_rank(name: &str) -> (usize, String) {
    let pos = FIELD_ORDER
        .iter()
        .position(|f| *f == name)
        .unwrap_or(FIELD_ORDER.len());
    (pos, name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(json: &str) -> PostDto {
        serde_json::from_str(json).unwrap()
    }

    fn measurements(json: &str) -> MeasurementsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn convert_post_lifts_geo() {
        let station = convert_post(post(
            r#"{"id": 5, "name": "Arbat", "isOnline": false,
                "geo": {"latitude": 55.75, "longitude": 37.59, "address": "Arbat st. 1"},
                "ownerId": 9}"#,
        ));

        assert_eq!(station.id, StationId(5));
        assert_eq!(station.coordinate, Coordinate::new(55.75, 37.59));
        assert!(!station.is_online);
        assert_eq!(station.name.as_deref(), Some("Arbat"));
        assert_eq!(station.metadata["address"], "Arbat st. 1");
        assert_eq!(station.metadata["ownerId"], 9);
    }

    #[test]
    fn convert_post_defaults_to_online() {
        let station = convert_post(post(r#"{"id": 1, "geo": {"latitude": 1.0, "longitude": 2.0}}"#));
        assert!(station.is_online);
    }

    #[test]
    fn geo_fields_win_over_post_fields() {
        let station = convert_post(post(
            r#"{"id": 1, "kind": "post", "geo": {"latitude": 1.0, "longitude": 2.0, "kind": "geo"}}"#,
        ));
        assert_eq!(station.metadata["kind"], "geo");
    }

    #[test]
    fn convert_posts_preserves_order() {
        let posts = vec![
            post(r#"{"id": 3, "geo": {"latitude": 0.0, "longitude": 0.0}}"#),
            post(r#"{"id": 1, "geo": {"latitude": 0.0, "longitude": 0.0}}"#),
        ];
        let ids: Vec<u64> = convert_posts(posts).iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn window_start_floors_then_steps_back() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 7, 42).unwrap();
        assert_eq!(format_window_start(window_start(now)), "2024-03-15 10:00:00");
    }

    #[test]
    fn window_start_on_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 5, 0).unwrap();
        assert_eq!(format_window_start(window_start(now)), "2024-03-15 10:00:00");
    }

    #[test]
    fn window_start_crosses_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 3, 10).unwrap();
        assert_eq!(format_window_start(window_start(now)), "2024-03-14 23:55:00");
    }

    #[test]
    fn convert_measurements_takes_latest_record() {
        let resp = measurements(
            r#"{
                "meta": {"units": {"temperature": "°C", "pm2": "mg/m³", "pressure": "mmHg"}},
                "data": [
                    {"date": "2024-03-15T10:00:00Z", "temperature": 1.0},
                    {"date": "2024-03-15T10:05:00Z", "temperature": 2.5, "pm2": 0.011,
                     "pressure": 745.2, "humidity": null,
                     "aqi": {"cityairAqi": {"value": 2, "details": {}}}}
                ]
            }"#,
        );

        let m = convert_measurements(StationId(1), resp).unwrap();
        assert_eq!(m.date.as_deref(), Some("2024-03-15T10:05:00Z"));
        assert_eq!(m.aqi, Some(2.0));

        let names: Vec<&str> = m.readings.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["temperature", "pressure", "humidity", "pm2"]);

        let temp = m.get("temperature").unwrap();
        assert_eq!(temp.value, Some(2.5));
        assert_eq!(temp.unit.as_deref(), Some("°C"));

        let humidity = m.get("humidity").unwrap();
        assert_eq!(humidity.value, None);
        assert_eq!(humidity.unit, None);
    }

    #[test]
    fn unknown_fields_sort_after_known_ones() {
        let resp = measurements(
            r#"{"data": [{"zeta": 1, "alpha": 2, "no2": 3, "temperature": 4}]}"#,
        );
        let m = convert_measurements(StationId(1), resp).unwrap();
        let names: Vec<&str> = m.readings.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["temperature", "no2", "alpha", "zeta"]);
    }

    #[test]
    fn convert_measurements_empty_data() {
        let resp = measurements(r#"{"meta": {"units": {}}, "data": []}"#);
        let err = convert_measurements(StationId(8), resp).unwrap_err();
        assert!(matches!(err, CityAirError::NoMeasurements(StationId(8))));
    }

    #[test]
    fn malformed_aqi_is_rejected() {
        let resp = measurements(r#"{"data": [{"aqi": {"instantAqi": 3}}]}"#);
        let err = convert_measurements(StationId(1), resp).unwrap_err();
        assert!(matches!(err, CityAirError::Malformed(_)));
    }

    #[test]
    fn non_numeric_aqi_value_is_rejected() {
        let resp = measurements(r#"{"data": [{"aqi": {"cityairAqi": {"value": "high"}}}]}"#);
        let err = convert_measurements(StationId(1), resp).unwrap_err();
        assert!(matches!(err, CityAirError::Malformed(msg) if msg.contains("high")));
    }

    #[test]
    fn null_aqi_value_is_none() {
        let resp = measurements(r#"{"data": [{"aqi": {"cityairAqi": {"value": null}}}]}"#);
        let m = convert_measurements(StationId(1), resp).unwrap();
        assert_eq!(m.aqi, None);
    }

    #[test]
    fn missing_aqi_is_none() {
        let resp = measurements(r#"{"data": [{"temperature": 4}]}"#);
        let m = convert_measurements(StationId(1), resp).unwrap();
        assert_eq!(m.aqi, None);
    }
}
