//! Domain error types.
//!
//! These errors describe why a nearest-station lookup produced no result.
//! They are distinct from API/IO errors.

/// Errors from locating a station.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    /// No stations to search
    #[error("no stations available to search")]
    EmptyInput,

    /// Stations exist but none is currently reporting
    #[error("none of the {0} stations is online")]
    NoOnlineStation(usize),
}
