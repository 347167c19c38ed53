//! route-planner core
//!
//! Plans a single-vehicle round trip from a fixed depot: geocodes addresses,
//! orders stops with a multi-start TSP heuristic, and slices the result into
//! navigation requests.

pub mod error;
pub mod traits;
pub mod model;
pub mod region;
pub mod haversine;
pub mod nominatim;
pub mod photon;
pub mod cache_store;
pub mod geocode;
pub mod solver;
pub mod segment;
pub mod planner;
pub mod dataset;

pub use error::{Error, Result};
