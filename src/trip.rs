//! Route assembly: turns a start city, end city and vehicle into a
//! complete trip plan.

use tracing::debug;

use crate::error::{Error, Result};
use crate::planner::{self, PlannerOptions};
use crate::polyline::RoutePolyline;
use crate::traits::{ChargingStation, Coord, Geocoder, RouteProvider, StationFinder};
use crate::vehicle::{CatalogSnapshot, VehicleProfile};

/// Completed trip: the final geometry plus everything the caller
/// displays.
#[derive(Debug, Clone)]
pub struct TripPlan {
    pub distance_km: f64,
    pub hours: u64,
    pub minutes: u64,
    pub route: RoutePolyline,
    pub stations: Vec<ChargingStation>,
    pub vehicle: VehicleProfile,
}

impl TripPlan {
    pub fn distance_label(&self) -> String {
        format!("{:.2} km", self.distance_km)
    }

    pub fn duration_label(&self) -> String {
        format!("{}h {}m", self.hours, self.minutes)
    }
}

/// Plans a trip from `start_city` to `end_city` with the vehicle
/// identified by `vehicle_id` in `catalog`.
///
/// The vehicle is resolved first, then both cities are geocoded, then a
/// direct route is requested and walked for charging stops. When stops
/// exist the route is requested again with the stops as via points, in
/// planner order, and the final distance, duration and geometry come
/// from that second response.
pub fn plan_trip<G, R, S>(
    start_city: &str,
    end_city: &str,
    vehicle_id: &str,
    catalog: &CatalogSnapshot,
    geocoder: &G,
    routes: &R,
    stations: &S,
    options: &PlannerOptions,
) -> Result<TripPlan>
where
    G: Geocoder + ?Sized,
    R: RouteProvider + ?Sized,
    S: StationFinder + ?Sized,
{
    let record = catalog.find(vehicle_id)?;
    let profile = VehicleProfile::derive(record)?;

    let origin = resolve(geocoder, start_city)?;
    let destination = resolve(geocoder, end_city)?;

    let direct = routes.route(&[origin, destination])?;
    let direct_polyline = RoutePolyline::from_lon_lat_pairs(&direct.points);
    if direct_polyline.len() < 2 {
        return Err(Error::MalformedRoute(
            "route has fewer than two points".to_string(),
        ));
    }

    let stops = planner::plan_stops(&direct_polyline, &profile, stations, options);
    debug!(
        stops = stops.len(),
        direct_km = direct_polyline.total_km(),
        "charging stops planned"
    );

    let (leg, route) = if stops.is_empty() {
        (direct, direct_polyline)
    } else {
        let mut via: Vec<Coord> = Vec::with_capacity(stops.len() + 2);
        via.push(origin);
        via.extend(stops.iter().map(|station| station.location));
        via.push(destination);

        let rerouted = routes.route(&via)?;
        let polyline = RoutePolyline::from_lon_lat_pairs(&rerouted.points);
        if polyline.len() < 2 {
            return Err(Error::MalformedRoute(
                "rerouted path has fewer than two points".to_string(),
            ));
        }
        (rerouted, polyline)
    };

    let (hours, minutes) = split_duration(leg.duration_ms);

    Ok(TripPlan {
        distance_km: leg.distance_meters / 1000.0,
        hours,
        minutes,
        route,
        stations: stops,
        vehicle: profile,
    })
}

fn resolve<G: Geocoder + ?Sized>(geocoder: &G, place: &str) -> Result<Coord> {
    geocoder
        .geocode(place)?
        .ok_or_else(|| Error::Geocode(place.to_string()))
}

/// Splits a provider duration into whole hours and minutes, discarding
/// leftover seconds.
fn split_duration(duration_ms: u64) -> (u64, u64) {
    let hours = duration_ms / 3_600_000;
    let minutes = (duration_ms % 3_600_000) / 60_000;
    (hours, minutes)
}
