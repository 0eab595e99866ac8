//! CityAir HTTP client.
//!
//! Authenticates with a bearer token and queries the "harvester" endpoints
//! for the list of posts and their latest averaged measurements.

use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, CONNECTION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Request, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::domain::{Measurement, Station, StationId};

use super::convert::{convert_measurements, convert_posts, format_window_start, window_start};
use super::error::CityAirError;
use super::source::AirQualitySource;
use super::types::{MeasurementsResponse, PostDto};

/// Default host for the CityAir API.
pub const DEFAULT_BASE_URL: &str = "https://api.cityscreen.io";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const POSTS_PATH: &str = "harvester/v2/Posts";
const MEASUREMENTS_PATH: &str = "harvester/v2/Posts/measurements";

/// Unit scheme: °C, mmHg, mg/m³.
const MEASURE_SCHEME: &str = "c_mmhg_mg";

/// How much of a bad response body to keep in errors.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the CityAir client.
#[derive(Clone)]
pub struct CityAirConfig {
    /// Bearer token
    pub token: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CityAirConfig {
    /// Create a new config with the given access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl std::fmt::Debug for CityAirConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CityAirConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// CityAir API client.
#[derive(Debug, Clone)]
pub struct CityAirClient {
    http: reqwest::Client,
    base_url: String,
    /// Sent with every request, so they are visible on a built `Request`.
    headers: HeaderMap,
}

impl CityAirClient {
    /// Create a new CityAir client with the given configuration.
    pub fn new(config: CityAirConfig) -> Result<Self, CityAirError> {
        let mut headers = HeaderMap::new();

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| CityAirError::InvalidToken)?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
        })
    }

    /// Full URL for an endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Build an authenticated GET for an endpoint.
    fn request(&self, path: &str, query: &[(&str, String)]) -> Result<Request, CityAirError> {
        Ok(self
            .http
            .get(self.url(path))
            .headers(self.headers.clone())
            .query(query)
            .build()?)
    }

    fn posts_request(&self) -> Result<Request, CityAirError> {
        self.request(POSTS_PATH, &[])
    }

    fn measurements_request(
        &self,
        station: StationId,
        now: DateTime<Utc>,
    ) -> Result<Request, CityAirError> {
        let query = [
            ("ids", station.to_string()),
            ("interval", "5m".to_string()),
            ("date__gt", format_window_start(window_start(now))),
            ("limit", "2".to_string()),
            ("measure_scheme", MEASURE_SCHEME.to_string()),
        ];

        self.request(MEASUREMENTS_PATH, &query)
    }

    /// Fetch all posts visible to the token, in API order.
    pub async fn fetch_posts(&self) -> Result<Vec<PostDto>, CityAirError> {
        self.get_json(self.posts_request()?).await
    }

    /// Fetch raw measurements for a station starting at the window for `now`.
    pub async fn fetch_measurements(
        &self,
        station: StationId,
        now: DateTime<Utc>,
    ) -> Result<MeasurementsResponse, CityAirError> {
        self.get_json(self.measurements_request(station, now)?).await
    }

    /// Send a request and decode the JSON body.
    ///
    /// A body that decodes to `null` or an empty array/object is an error:
    /// the API answers that way for unknown ids and expired tokens alike.
    async fn get_json<T: DeserializeOwned>(&self, request: Request) -> Result<T, CityAirError> {
        let url = request.url().to_string();
        debug!(%url, "CityAir request");

        let response = self.http.execute(request).await?;
        let status = response.status();

        let body = if status.is_success() {
            response.text().await?
        } else {
            response.text().await.unwrap_or_default()
        };
        check_status(status, &url, &body)?;
        debug!(%url, bytes = body.len(), "CityAir response");

        decode_body(&url, &body)
    }
}

/// Map an HTTP status to an error, if it is not a success.
fn check_status(status: StatusCode, url: &str, body: &str) -> Result<(), CityAirError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(CityAirError::Unauthorized);
    }

    if !status.is_success() {
        return Err(CityAirError::Api {
            status: status.as_u16(),
            url: url.to_string(),
            message: excerpt(body),
        });
    }

    Ok(())
}

impl AirQualitySource for CityAirClient {
    async fn fetch_stations(&self) -> Result<Vec<Station>, CityAirError> {
        let posts = self.fetch_posts().await?;
        Ok(convert_posts(posts))
    }

    async fn fetch_latest_measurement(
        &self,
        station: StationId,
        now: DateTime<Utc>,
    ) -> Result<Measurement, CityAirError> {
        let response = self.fetch_measurements(station, now).await?;
        convert_measurements(station, response)
    }
}

/// Decode a response body, rejecting empty payloads.
pub(crate) fn decode_body<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, CityAirError> {
    let value: Value = serde_json::from_str(body).map_err(|e| CityAirError::Json {
        message: e.to_string(),
        body: excerpt(body),
    })?;

    let empty = match &value {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    };
    if empty {
        return Err(CityAirError::EmptyResponse {
            url: url.to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| CityAirError::Json {
        message: e.to_string(),
        body: excerpt(body),
    })
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
