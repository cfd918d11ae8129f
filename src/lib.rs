//! ev-trip-planner core
//!
//! Plans an electric-vehicle road trip: a driving route between two
//! cities plus the charging stops the chosen vehicle needs to complete
//! it without running out of charge.

pub mod traits;
pub mod trip;
pub mod planner;
pub mod vehicle;
pub mod graphhopper;
pub mod chargetrip;
pub mod haversine;
pub mod polyline;
pub mod error;
