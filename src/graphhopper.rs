//! GraphHopper HTTP adapter for geocoding and routing.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::traits::{Coord, Geocoder, RouteLeg, RouteProvider};

#[derive(Debug, Clone)]
pub struct GraphHopperConfig {
    pub base_url: String,
    pub api_key: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for GraphHopperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graphhopper.com/api/1".to_string(),
            api_key: String::new(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphHopperClient {
    config: GraphHopperConfig,
    client: reqwest::blocking::Client,
}

impl GraphHopperClient {
    pub fn new(config: GraphHopperConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for GraphHopperClient {
    fn geocode(&self, place: &str) -> Result<Option<Coord>> {
        let url = format!("{}/geocode", self.config.base_url);
        let response = self
            .client
            .get(url)
            .query(&[("q", place), ("key", self.config.api_key.as_str())])
            .send()?
            .error_for_status()?
            .json::<GeocodeResponse>()?;

        Ok(response
            .hits
            .into_iter()
            .next()
            .map(|hit| (hit.point.lat, hit.point.lng)))
    }
}

impl RouteProvider for GraphHopperClient {
    fn route(&self, points: &[Coord]) -> Result<RouteLeg> {
        // Waypoints go on the wire as repeated point=lat,lon parameters,
        // in travel order.
        let mut query: Vec<(&str, String)> = points
            .iter()
            .map(|(lat, lon)| ("point", format!("{:.6},{:.6}", lat, lon)))
            .collect();
        query.push(("vehicle", self.config.profile.clone()));
        query.push(("instructions", "false".to_string()));
        query.push(("points_encoded", "false".to_string()));
        query.push(("key", self.config.api_key.clone()));

        let url = format!("{}/route", self.config.base_url);
        let response = self
            .client
            .get(url)
            .query(&query)
            .send()?
            .error_for_status()?
            .json::<RouteResponse>()?;

        let path = response
            .paths
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedRoute("response contains no paths".to_string()))?;

        let points = path
            .points
            .ok_or_else(|| Error::MalformedRoute("path has no decoded coordinates".to_string()))?
            .coordinates;

        Ok(RouteLeg {
            distance_meters: path.distance,
            duration_ms: path.time,
            points,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    hits: Vec<GeocodeHit>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    point: GeocodePoint,
}

#[derive(Debug, Deserialize)]
struct GeocodePoint {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    paths: Vec<RoutePath>,
}

#[derive(Debug, Deserialize)]
struct RoutePath {
    distance: f64,
    time: u64,
    #[serde(default)]
    points: Option<PathPoints>,
}

#[derive(Debug, Deserialize)]
struct PathPoints {
    coordinates: Vec<[f64; 2]>,
}
