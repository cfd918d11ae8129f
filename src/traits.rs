//! Core provider traits for the trip planner.
//!
//! These are intentionally minimal. Concrete adapters (GraphHopper,
//! Chargetrip) implement them over HTTP; tests implement them in memory.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vehicle::VehicleRecord;

/// A (latitude, longitude) pair in degrees, WGS84.
pub type Coord = (f64, f64);

/// One routed leg through an ordered set of points, as the routing
/// provider returns it.
#[derive(Debug, Clone)]
pub struct RouteLeg {
    pub distance_meters: f64,
    pub duration_ms: u64,
    /// Path geometry in provider order: (longitude, latitude) pairs.
    pub points: Vec<[f64; 2]>,
}

/// A charging station returned by a proximity lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    pub id: String,
    pub name: String,
    /// Station location as (latitude, longitude).
    pub location: Coord,
    pub power_kw: f64,
}

/// Resolves a free-form place name to coordinates.
pub trait Geocoder {
    /// `Ok(None)` means the place could not be resolved.
    fn geocode(&self, place: &str) -> Result<Option<Coord>>;
}

/// Computes a drivable route through an ordered list of points.
pub trait RouteProvider {
    /// `points` is origin, optional via points, destination (2..N).
    fn route(&self, points: &[Coord]) -> Result<RouteLeg>;
}

/// Proximity lookup against the charging-station provider.
pub trait StationFinder {
    /// At most one candidate within `radius_m` of `center`.
    ///
    /// Non-success responses and empty result sets are `Ok(None)`.
    fn find_near(
        &self,
        center: Coord,
        radius_m: u32,
        limit: u32,
    ) -> Result<Option<ChargingStation>>;
}

/// Bulk vehicle catalog fetch (one query per refresh, not per trip).
pub trait VehicleSource {
    fn vehicle_list(&self) -> Result<Vec<VehicleRecord>>;
}
