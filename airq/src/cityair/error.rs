//! CityAir client error types.

/// Errors that can occur when talking to the CityAir API.
#[derive(Debug, thiserror::Error)]
pub enum CityAirError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token rejected
    #[error("unauthorized: check CITYAIR_TOKEN")]
    Unauthorized,

    /// Token contains characters not allowed in a header
    #[error("CITYAIR_TOKEN is not a valid header value")]
    InvalidToken,

    /// API returned an error status
    #[error("API error {status} from {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// Response decoded to null or an empty collection
    #[error("empty response from {url}")]
    EmptyResponse { url: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message} (body: {body})")]
    Json { message: String, body: String },

    /// JSON was valid but not shaped as expected
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Station has no measurement in the requested window
    #[error("no measurements for station {0}")]
    NoMeasurements(crate::domain::StationId),

    /// Offline fixture could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),
}
