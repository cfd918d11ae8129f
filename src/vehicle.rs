//! Vehicle catalog records and the derived energy profile.
//!
//! Catalog records arrive from the vehicle provider in bulk and are held
//! in an immutable snapshot; a refresh replaces the whole snapshot so
//! in-flight readers keep the version they started with.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::VehicleSource;

/// Raw catalog record as the vehicle provider returns it.
///
/// Optional fields stay optional here; validation happens when a profile
/// is derived for a specific trip.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleRecord {
    pub id: String,
    pub naming: Naming,
    #[serde(default)]
    pub drivetrain: Option<Drivetrain>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
    #[serde(default)]
    pub battery: Option<Battery>,
    #[serde(default)]
    pub range: Option<RangeInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Naming {
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub chargetrip_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Drivetrain {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Connector {
    #[serde(default)]
    pub standard: Option<String>,
    #[serde(default)]
    pub power: Option<f64>,
    #[serde(default)]
    pub max_electric_power: Option<f64>,
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Battery {
    #[serde(default)]
    pub usable_kwh: Option<f64>,
    #[serde(default)]
    pub full_kwh: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeInfo {
    #[serde(default)]
    pub chargetrip_range: Option<ChargetripRange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChargetripRange {
    #[serde(default)]
    pub best: Option<f64>,
    #[serde(default)]
    pub worst: Option<f64>,
}

/// Consumption-relevant figures for one vehicle, derived once per trip
/// request and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleProfile {
    pub make: String,
    pub model: String,
    pub version: Option<String>,
    pub usable_battery_kwh: f64,
    pub best_range_km: f64,
    /// Conservative planning bound; always <= `best_range_km`.
    pub worst_range_km: f64,
    pub consumption_kwh_per_km: f64,
}

impl VehicleProfile {
    /// Derives the energy profile from a raw catalog record.
    ///
    /// A zero or missing best-case range would make the consumption rate
    /// undefined, so it is rejected here rather than dividing by zero.
    pub fn derive(record: &VehicleRecord) -> Result<Self> {
        let usable_battery_kwh = record
            .battery
            .as_ref()
            .and_then(|battery| battery.usable_kwh)
            .filter(|kwh| *kwh > 0.0)
            .ok_or_else(|| invalid(record, "missing usable battery capacity"))?;

        let range = record
            .range
            .as_ref()
            .and_then(|range| range.chargetrip_range.as_ref())
            .ok_or_else(|| invalid(record, "missing range figures"))?;

        let best_range_km = range
            .best
            .filter(|km| *km > 0.0)
            .ok_or_else(|| invalid(record, "zero or missing best-case range"))?;

        let worst_range_km = range
            .worst
            .filter(|km| *km > 0.0)
            .ok_or_else(|| invalid(record, "zero or missing worst-case range"))?;

        if worst_range_km > best_range_km {
            return Err(invalid(record, "worst-case range exceeds best-case range"));
        }

        Ok(Self {
            make: record.naming.make.clone(),
            model: record.naming.model.clone(),
            version: record.naming.version.clone(),
            usable_battery_kwh,
            best_range_km,
            worst_range_km,
            consumption_kwh_per_km: usable_battery_kwh / best_range_km,
        })
    }
}

fn invalid(record: &VehicleRecord, reason: &str) -> Error {
    Error::InvalidVehicleData(format!("{}: {}", record.id, reason))
}

/// An immutable view of the vehicle catalog at one refresh point.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    vehicles: Vec<VehicleRecord>,
}

impl CatalogSnapshot {
    pub fn new(vehicles: Vec<VehicleRecord>) -> Self {
        Self { vehicles }
    }

    pub fn vehicles(&self) -> &[VehicleRecord] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Finds the record for a requested vehicle id.
    pub fn find(&self, vehicle_id: &str) -> Result<&VehicleRecord> {
        self.vehicles
            .iter()
            .find(|vehicle| vehicle.id == vehicle_id)
            .ok_or_else(|| Error::VehicleNotFound(vehicle_id.to_string()))
    }
}

/// Process-wide vehicle catalog with wholesale snapshot replacement.
///
/// Readers clone an `Arc` of the current snapshot and never block a
/// refresh; a refresh swaps the snapshot under the write lock.
#[derive(Debug)]
pub struct VehicleCatalog {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl Default for VehicleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleCatalog {
    /// Creates an empty catalog; call [`VehicleCatalog::refresh`] to
    /// populate it.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::default())),
        }
    }

    /// The catalog as of the last completed refresh.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().expect("catalog lock poisoned").clone()
    }

    /// Fetches the full vehicle list and swaps it in, returning the new
    /// vehicle count. On fetch failure the previous snapshot stays.
    pub fn refresh<S: VehicleSource + ?Sized>(&self, source: &S) -> Result<usize> {
        let vehicles = source.vehicle_list()?;
        let count = vehicles.len();
        let snapshot = Arc::new(CatalogSnapshot::new(vehicles));
        *self.current.write().expect("catalog lock poisoned") = snapshot;
        debug!(count, "vehicle catalog refreshed");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, usable_kwh: Option<f64>, best: Option<f64>, worst: Option<f64>) -> VehicleRecord {
        VehicleRecord {
            id: id.to_string(),
            naming: Naming {
                make: "Tesla".to_string(),
                model: "Model 3".to_string(),
                version: Some("Long Range".to_string()),
                edition: None,
                chargetrip_version: None,
            },
            drivetrain: None,
            connectors: Vec::new(),
            battery: Some(Battery {
                usable_kwh,
                full_kwh: None,
            }),
            range: Some(RangeInfo {
                chargetrip_range: Some(ChargetripRange { best, worst }),
            }),
        }
    }

    #[test]
    fn test_derive_profile() {
        let profile = VehicleProfile::derive(&record("m3", Some(75.0), Some(500.0), Some(400.0)))
            .expect("valid record");
        assert_eq!(profile.make, "Tesla");
        assert_eq!(profile.usable_battery_kwh, 75.0);
        assert_eq!(profile.best_range_km, 500.0);
        assert_eq!(profile.worst_range_km, 400.0);
        assert!((profile.consumption_kwh_per_km - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_derive_rejects_zero_best_range() {
        let err = VehicleProfile::derive(&record("m3", Some(75.0), Some(0.0), Some(0.0)))
            .expect_err("zero best range");
        assert!(matches!(err, Error::InvalidVehicleData(_)));
    }

    #[test]
    fn test_derive_rejects_missing_battery() {
        let mut rec = record("m3", None, Some(500.0), Some(400.0));
        rec.battery = None;
        let err = VehicleProfile::derive(&rec).expect_err("missing battery");
        assert!(matches!(err, Error::InvalidVehicleData(_)));
    }

    #[test]
    fn test_derive_rejects_inverted_ranges() {
        let err = VehicleProfile::derive(&record("m3", Some(75.0), Some(300.0), Some(400.0)))
            .expect_err("worst > best");
        assert!(matches!(err, Error::InvalidVehicleData(_)));
    }

    #[test]
    fn test_snapshot_find() {
        let snapshot = CatalogSnapshot::new(vec![record("a", Some(50.0), Some(400.0), Some(300.0))]);
        assert!(snapshot.find("a").is_ok());
        let err = snapshot.find("b").expect_err("unknown id");
        assert!(matches!(err, Error::VehicleNotFound(ref id) if id == "b"));
    }

    struct FixedSource(Vec<VehicleRecord>);

    impl VehicleSource for FixedSource {
        fn vehicle_list(&self) -> Result<Vec<VehicleRecord>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_refresh_swaps_snapshot() {
        let catalog = VehicleCatalog::new();
        let before = catalog.snapshot();
        assert!(before.is_empty());

        let source = FixedSource(vec![record("a", Some(50.0), Some(400.0), Some(300.0))]);
        let count = catalog.refresh(&source).expect("refresh");
        assert_eq!(count, 1);

        // The earlier snapshot is unaffected by the swap.
        assert!(before.is_empty());
        assert_eq!(catalog.snapshot().len(), 1);
    }
}
