//! Charging-stop insertion along a route polyline.
//!
//! Single greedy pass: walk the route accumulating traveled distance and
//! query for a station each time the accumulator reaches the vehicle's
//! worst-case range. A successful insertion resets the accumulator; a
//! miss leaves it untouched, so the next check lands further past the
//! true range boundary. At most one stop is proposed per threshold
//! crossing, even for a single segment longer than the full range.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::haversine;
use crate::polyline::RoutePolyline;
use crate::traits::{ChargingStation, StationFinder};
use crate::vehicle::VehicleProfile;

/// Station search radius applied at each range crossing, in meters.
const DEFAULT_SEARCH_RADIUS_M: u32 = 5_000;

/// Candidate stations requested per lookup.
const DEFAULT_STATION_LIMIT: u32 = 1;

#[derive(Debug, Clone)]
pub struct PlannerOptions {
    pub search_radius_m: u32,
    pub station_limit: u32,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            station_limit: DEFAULT_STATION_LIMIT,
        }
    }
}

/// Plans the charging stops needed to drive `route` with `profile`.
///
/// Stations come back in discovery order, which is also route order
/// since the scan is monotonic along the polyline. The lookup is
/// centered on the start point of the segment that crossed the
/// threshold, not the interpolated exhaustion point.
///
/// Lookup failures are absorbed: a transport error counts as "no
/// station found" and the trip is planned with fewer stops. A long run
/// of misses can therefore leave an inter-stop leg longer than the
/// worst-case range.
pub fn plan_stops<F>(
    route: &RoutePolyline,
    profile: &VehicleProfile,
    finder: &F,
    options: &PlannerOptions,
) -> Vec<ChargingStation>
where
    F: StationFinder + ?Sized,
{
    let points = route.points();
    if points.len() < 2 {
        return Vec::new();
    }

    // Segment geometry does not depend on lookup outcomes, so it can be
    // computed up front in parallel. The insertion scan stays
    // sequential: each lookup's outcome decides whether the accumulator
    // resets, which moves every later crossing point.
    let segment_km: Vec<f64> = points
        .par_windows(2)
        .map(|pair| haversine::distance_km(pair[0], pair[1]))
        .collect();

    let mut stations = Vec::new();
    let mut accumulated = 0.0;

    for (i, segment) in segment_km.iter().enumerate() {
        accumulated += segment;
        if accumulated < profile.worst_range_km {
            continue;
        }

        let center = points[i];
        match finder.find_near(center, options.search_radius_m, options.station_limit) {
            Ok(Some(station)) => {
                debug!(
                    station = %station.name,
                    traveled_km = accumulated,
                    "charging stop inserted"
                );
                stations.push(station);
                accumulated = 0.0;
            }
            Ok(None) => {
                debug!(
                    lat = center.0,
                    lon = center.1,
                    "no station within radius, continuing"
                );
            }
            Err(err) => {
                warn!(error = %err, "station lookup failed, treating as no station");
            }
        }
    }

    stations
}
