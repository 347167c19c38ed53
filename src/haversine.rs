//! Great-circle distance model.
//!
//! Straight-line distance on a spherical Earth stands in for road distance.
//! Less accurate than a road network but always available and a true metric.

use crate::model::Coordinate;
use crate::traits::DistanceMatrixProvider;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Square, symmetric distance matrix in kilometers.
///
/// Index 0 is always the depot; indices `1..size` are the stop points in the
/// order they were supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Index reserved for the depot.
    pub const DEPOT: usize = 0;

    /// Build from a depot and the resolved stop coordinates.
    pub fn from_points(depot: Coordinate, points: &[Coordinate]) -> Self {
        let all: Vec<Coordinate> = std::iter::once(depot).chain(points.iter().copied()).collect();
        let size = all.len();
        let mut data = vec![0.0; size * size];

        for i in 0..size {
            for j in (i + 1)..size {
                let km = haversine_km(all[i], all[j]);
                data[i * size + j] = km;
                data[j * size + i] = km;
            }
        }

        Self { data, size }
    }

    /// Build from an explicit row-major grid.
    ///
    /// Returns `None` unless the grid is square, has a zero diagonal and is
    /// symmetric. Non-finite entries mark unreachable pairs and must be
    /// mirrored like any other distance.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if size == 0 || data.len() != size * size {
            return None;
        }
        let same = |a: f64, b: f64| a == b || (a.is_nan() && b.is_nan());
        for i in 0..size {
            if data[i * size + i] != 0.0 {
                return None;
            }
            for j in (i + 1)..size {
                if !same(data[i * size + j], data[j * size + i]) {
                    return None;
                }
            }
        }
        Some(Self { data, size })
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of points, depot included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stop points, depot excluded.
    pub fn stop_count(&self) -> usize {
        self.size - 1
    }
}

/// Haversine-based matrix provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineMatrix;

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, depot: Coordinate, points: &[Coordinate]) -> DistanceMatrix {
        DistanceMatrix::from_points(depot, points)
    }
}
