//! Chargetrip GraphQL adapter for the vehicle catalog and station
//! lookups.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::traits::{ChargingStation, Coord, StationFinder, VehicleSource};
use crate::vehicle::VehicleRecord;

/// Bulk vehicle list query, mirroring the catalog fields the planner
/// and profile derivation consume.
const VEHICLE_LIST_QUERY: &str = r#"
query vehicleListAll {
  vehicleList {
    id
    naming {
      make
      model
      version
      edition
      chargetrip_version
    }
    drivetrain {
      type
    }
    connectors {
      standard
      power
      max_electric_power
      time
      speed
    }
    battery {
      usable_kwh
      full_kwh
    }
    range {
      chargetrip_range {
        best
        worst
      }
    }
  }
}
"#;

#[derive(Debug, Clone)]
pub struct ChargetripConfig {
    pub base_url: String,
    pub client_key: String,
    pub app_key: String,
    pub timeout_secs: u64,
}

impl Default for ChargetripConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.chargetrip.io/graphql".to_string(),
            client_key: String::new(),
            app_key: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChargetripClient {
    config: ChargetripConfig,
    client: reqwest::blocking::Client,
}

impl ChargetripClient {
    pub fn new(config: ChargetripConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn graphql<T: serde::de::DeserializeOwned>(&self, query: &str) -> Result<Option<T>> {
        let response = self
            .client
            .post(&self.config.base_url)
            .header("x-client-id", &self.config.client_key)
            .header("x-app-id", &self.config.app_key)
            .header("Authorization", format!("Bearer {}", self.config.client_key))
            .json(&json!({ "query": query }))
            .send()?
            .error_for_status()?
            .json::<GraphqlEnvelope<T>>()?;

        Ok(response.data)
    }
}

impl VehicleSource for ChargetripClient {
    fn vehicle_list(&self) -> Result<Vec<VehicleRecord>> {
        let data: Option<VehicleListData> = self.graphql(VEHICLE_LIST_QUERY)?;
        Ok(data.map(|body| body.vehicle_list).unwrap_or_default())
    }
}

impl StationFinder for ChargetripClient {
    fn find_near(
        &self,
        center: Coord,
        radius_m: u32,
        limit: u32,
    ) -> Result<Option<ChargingStation>> {
        let query = station_around_query(center, radius_m, limit);
        let data: Option<StationAroundData> = match self.graphql(&query) {
            Ok(data) => data,
            Err(err) => {
                // Soft failure: the caller plans with fewer stops.
                debug!(error = %err, "station provider unreachable, returning no station");
                return Ok(None);
            }
        };

        let station = data
            .map(|body| body.station_around)
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|record| {
                let [lon, lat] = record.location.coordinates;
                ChargingStation {
                    name: record.name.unwrap_or_else(|| record.id.clone()),
                    id: record.id,
                    location: (lat, lon),
                    power_kw: record.power.unwrap_or(0.0),
                }
            });

        Ok(station)
    }
}

/// Proximity query around one point. The provider expects GeoJSON
/// coordinate order: [longitude, latitude].
fn station_around_query(center: Coord, radius_m: u32, limit: u32) -> String {
    format!(
        r#"query {{
  stationAround(
    filter: {{
      location: {{ type: Point, coordinates: [{lon}, {lat}] }},
      distance: {radius}
    }},
    size: {limit}
  ) {{
    id
    name
    location {{
      coordinates
    }}
    power
  }}
}}"#,
        lon = center.1,
        lat = center.0,
        radius = radius_m,
        limit = limit,
    )
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct GraphqlEnvelope<T> {
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct VehicleListData {
    #[serde(rename = "vehicleList", default)]
    vehicle_list: Vec<VehicleRecord>,
}

#[derive(Debug, Deserialize)]
struct StationAroundData {
    #[serde(rename = "stationAround", default)]
    station_around: Vec<StationRecord>,
}

#[derive(Debug, Deserialize)]
struct StationRecord {
    id: String,
    #[serde(default)]
    name: Option<String>,
    location: StationLocation,
    #[serde(default)]
    power: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StationLocation {
    coordinates: [f64; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_query_uses_lon_lat_order() {
        let query = station_around_query((48.8566, 2.3522), 5_000, 1);
        assert!(query.contains("coordinates: [2.3522, 48.8566]"));
        assert!(query.contains("distance: 5000"));
        assert!(query.contains("size: 1"));
    }

    #[test]
    fn test_parse_station_response() {
        let body = r#"{
            "data": {
                "stationAround": [{
                    "id": "st-1",
                    "name": "Fastned Lyon",
                    "location": {"coordinates": [4.8357, 45.764]},
                    "power": 150.0
                }]
            }
        }"#;
        let envelope: GraphqlEnvelope<StationAroundData> =
            serde_json::from_str(body).expect("parse");
        let stations = envelope.data.expect("data").station_around;
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, "st-1");
        // Provider order is [lon, lat].
        assert_eq!(stations[0].location.coordinates, [4.8357, 45.764]);
    }

    #[test]
    fn test_parse_empty_station_response() {
        let envelope: GraphqlEnvelope<StationAroundData> =
            serde_json::from_str(r#"{"data": {"stationAround": []}}"#).expect("parse");
        assert!(envelope.data.expect("data").station_around.is_empty());
    }

    #[test]
    fn test_parse_vehicle_list_response() {
        let body = r#"{
            "data": {
                "vehicleList": [{
                    "id": "v-1",
                    "naming": {"make": "Renault", "model": "Zoe", "version": "R135"},
                    "battery": {"usable_kwh": 52.0, "full_kwh": 54.7},
                    "range": {"chargetrip_range": {"best": 390.0, "worst": 290.0}}
                }]
            }
        }"#;
        let envelope: GraphqlEnvelope<VehicleListData> = serde_json::from_str(body).expect("parse");
        let vehicles = envelope.data.expect("data").vehicle_list;
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].naming.make, "Renault");
    }

    #[test]
    fn test_parse_missing_data_key() {
        let envelope: GraphqlEnvelope<VehicleListData> =
            serde_json::from_str(r#"{"errors": [{"message": "unauthorized"}]}"#).expect("parse");
        assert!(envelope.data.is_none());
    }
}
