//! Error types for the trip planner.

use thiserror::Error;

/// Failures a trip request can surface to its caller.
///
/// Station lookups are the deliberate exception: their failures degrade
/// the plan (fewer stops) instead of failing the trip, so they never
/// escape the planner.
#[derive(Debug, Error)]
pub enum Error {
    #[error("vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("could not geocode place: {0}")]
    Geocode(String),

    #[error("malformed route response: {0}")]
    MalformedRoute(String),

    #[error("invalid vehicle data: {0}")]
    InvalidVehicleData(String),

    #[error("station lookup failed: {0}")]
    StationLookup(String),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// HTTP-equivalent status for callers exposing this over the wire.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::VehicleNotFound(_) => 404,
            Error::Geocode(_) => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
