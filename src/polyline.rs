//! Polyline representation for route geometries.
//!
//! Routing providers emit coordinates as (longitude, latitude) pairs;
//! everything inside the planner works in (latitude, longitude). The
//! swap happens here, at the boundary, exactly once.

use serde::{Deserialize, Serialize};

use crate::haversine;
use crate::traits::Coord;

/// An ordered driven path from origin to destination.
///
/// Stores latitude/longitude points directly for internal processing.
/// Point order is the direction of travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePolyline {
    points: Vec<Coord>,
}

impl RoutePolyline {
    /// Creates a polyline from (latitude, longitude) points.
    pub fn new(points: Vec<Coord>) -> Self {
        Self { points }
    }

    /// Creates a polyline from provider-order (longitude, latitude)
    /// pairs, swapping each into (latitude, longitude).
    pub fn from_lon_lat_pairs(pairs: &[[f64; 2]]) -> Self {
        Self {
            points: pairs.iter().map(|pair| (pair[1], pair[0])).collect(),
        }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coord> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total path length in kilometers.
    pub fn total_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine::distance_km(pair[0], pair[1]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_points() {
        let points = vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        let polyline = RoutePolyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
    }

    #[test]
    fn test_lon_lat_pairs_are_swapped() {
        // Provider order is (lon, lat); internal order is (lat, lon).
        let raw = [[-120.2, 38.5], [-120.95, 40.7]];
        let polyline = RoutePolyline::from_lon_lat_pairs(&raw);
        assert_eq!(polyline.points(), &[(38.5, -120.2), (40.7, -120.95)]);
    }

    #[test]
    fn test_into_points() {
        let points = vec![(38.5, -120.2), (40.7, -120.95)];
        let polyline = RoutePolyline::new(points.clone());
        let owned = polyline.into_points();
        assert_eq!(owned, points);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = RoutePolyline::new(vec![]);
        assert!(polyline.is_empty());
        assert_eq!(polyline.total_km(), 0.0);
    }

    #[test]
    fn test_total_km_sums_segments() {
        // Three points one degree of latitude apart: two ~111.19 km legs.
        let polyline = RoutePolyline::new(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let total = polyline.total_km();
        assert!((total - 222.39).abs() < 0.02, "got {}", total);
    }
}
