//! Core seams of the route planner.
//!
//! These are intentionally minimal. Hosts implement them to plug in their own
//! stop types, lookup services, cache storage and status reporting.

use std::collections::HashMap;

use crate::error::Result;
use crate::haversine::DistanceMatrix;
use crate::model::Coordinate;

/// Anything with a free-text address that can be routed.
pub trait Place {
    fn address(&self) -> &str;

    /// Administrative region, if known.
    fn region(&self) -> Option<&str> {
        None
    }
}

/// An external service that turns an address into a coordinate.
///
/// Implementations report every failure (network, timeout, empty result)
/// as an error; the resolver decides what to do with it.
pub trait GeocodeProvider {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn lookup(&self, address: &str) -> Result<Coordinate>;
}

/// Durable backing for the geocode cache.
pub trait CacheStore {
    fn load(&self) -> Result<HashMap<String, Coordinate>>;

    /// Called after every new cache entry with the full mapping.
    fn persist(&self, entries: &HashMap<String, Coordinate>) -> Result<()>;
}

/// Builds a distance matrix with the depot at index 0.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, depot: Coordinate, points: &[Coordinate]) -> DistanceMatrix;
}

/// Pipeline stage reported through [`ProgressSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geocoding,
    Optimizing,
}

/// A single progress notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub stage: Stage,
    /// 1-based position of the current item.
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Receives progress notifications. Closures work out of the box.
pub trait ProgressSink: Sync {
    fn report(&self, progress: &Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(&Progress) + Sync,
{
    fn report(&self, progress: &Progress) {
        self(progress)
    }
}

/// Sink that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: &Progress) {}
}
