//! Round-trip solver: nearest-neighbor construction refined by local search,
//! run from every stop as a starting point.
//!
//! Tours are sequences of matrix indices. The depot (index 0) is never part
//! of the sequence; it is the implicit first and last point of every tour.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::haversine::DistanceMatrix;
use crate::model::Coordinate;
use crate::traits::{DistanceMatrixProvider, Progress, ProgressSink, Stage};

/// A move is accepted only if it shortens the tour by more than this many
/// kilometers. Shared by 2-opt and Or-opt.
pub const IMPROVEMENT_EPSILON_KM: f64 = 1e-4;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Evaluate starting points on the rayon pool. Results are identical to
    /// the sequential run.
    pub parallel_starts: bool,
    /// Checked before each starting point.
    #[serde(skip)]
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SolveOptions {
    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// A candidate tour and its cyclic length through the depot.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub order: Vec<usize>,
    pub distance: f64,
}

impl Tour {
    pub fn new(order: Vec<usize>, matrix: &DistanceMatrix) -> Self {
        let distance = tour_distance(&order, matrix);
        Self { order, distance }
    }
}

#[derive(Debug, Clone)]
pub struct TspSolution<S> {
    /// Optimized resolved stops, then unresolved stops in input order.
    pub order: Vec<S>,
    /// Cyclic distance through the depot over the resolved stops.
    pub total_km: f64,
    pub unresolved: usize,
    pub starts_evaluated: usize,
}

/// Length of `depot → order[0] → … → order[n-1] → depot`.
pub fn tour_distance(order: &[usize], matrix: &DistanceMatrix) -> f64 {
    let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
        return 0.0;
    };

    let inner: f64 = order.windows(2).map(|pair| matrix.get(pair[0], pair[1])).sum();
    matrix.get(DistanceMatrix::DEPOT, first) + inner + matrix.get(last, DistanceMatrix::DEPOT)
}

// ============================================================================
// Construction
// ============================================================================

/// Greedy tour from `start`: always move to the closest unvisited stop,
/// lowest index on ties. Returns an empty order if `start` isn't a stop index.
///
/// Stops that are unreachable (non-finite distance) are appended in index
/// order so the result is always a permutation of the stop indices.
pub fn nearest_neighbor(start: usize, matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.size();
    if start == DistanceMatrix::DEPOT || start >= n {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    visited[DistanceMatrix::DEPOT] = true;
    visited[start] = true;

    let mut order = Vec::with_capacity(n - 1);
    order.push(start);
    let mut current = start;

    while order.len() < n - 1 {
        let mut best: Option<usize> = None;
        let mut best_distance = f64::INFINITY;
        for next in 1..n {
            if visited[next] {
                continue;
            }
            let distance = matrix.get(current, next);
            if distance < best_distance {
                best_distance = distance;
                best = Some(next);
            }
        }

        let Some(next) = best else {
            break;
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order.extend((1..n).filter(|&index| !visited[index]));
    order
}

// ============================================================================
// Local Search Operators
// ============================================================================

/// 2-opt: reverse segments while that removes more than the epsilon.
/// Runs until a full scan finds no improving reversal.
pub fn two_opt(order: &[usize], matrix: &DistanceMatrix) -> Tour {
    let n = order.len();
    let mut route = order.to_vec();
    if n < 3 {
        return Tour::new(route, matrix);
    }

    let mut improved = true;
    while improved {
        improved = false;
        for i in 0..n - 1 {
            for j in i + 1..n {
                let prev = if i == 0 { DistanceMatrix::DEPOT } else { route[i - 1] };
                let next = if j == n - 1 { DistanceMatrix::DEPOT } else { route[j + 1] };

                let removed = matrix.get(prev, route[i]) + matrix.get(route[j], next);
                let added = matrix.get(prev, route[j]) + matrix.get(route[i], next);

                if added < removed - IMPROVEMENT_EPSILON_KM {
                    route[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }

    Tour::new(route, matrix)
}

/// Or-opt: move runs of 1, 2 or 3 consecutive stops elsewhere in the tour
/// while that shortens it by more than the epsilon.
pub fn or_opt(order: &[usize], matrix: &DistanceMatrix) -> Tour {
    let n = order.len();
    let mut best = Tour::new(order.to_vec(), matrix);
    if n < 3 {
        return best;
    }

    let mut improved = true;
    while improved {
        improved = false;
        for segment_len in 1..=3.min(n - 1) {
            for from in 0..=n - segment_len {
                // `to` is the slot in the current order the segment lands in
                // front of; slots inside or right after the segment are no-ops.
                for to in 0..=n {
                    if (from..=from + segment_len).contains(&to) {
                        continue;
                    }
                    let candidate = relocate(&best.order, from, segment_len, to);
                    let distance = tour_distance(&candidate, matrix);
                    if distance < best.distance - IMPROVEMENT_EPSILON_KM {
                        best = Tour {
                            order: candidate,
                            distance,
                        };
                        improved = true;
                    }
                }
            }
        }
    }

    best
}

fn relocate(order: &[usize], from: usize, len: usize, to: usize) -> Vec<usize> {
    let mut result = order.to_vec();
    let segment: Vec<usize> = result.drain(from..from + len).collect();
    let insert_at = if to > from { to - len } else { to };
    result.splice(insert_at..insert_at, segment);
    result
}

/// Fixed refinement pipeline: 2-opt, Or-opt, then 2-opt again.
pub fn refine(order: &[usize], matrix: &DistanceMatrix) -> Tour {
    let first = two_opt(order, matrix);
    let relocated = or_opt(&first.order, matrix);
    two_opt(&relocated.order, matrix)
}

// ============================================================================
// Multi-start
// ============================================================================

#[derive(Debug, Clone)]
struct Candidate {
    start: usize,
    tour: Tour,
}

/// A tour shorter by more than the epsilon wins. Tours within the epsilon of
/// each other tie, and the lower start index wins the tie, which is the first
/// one found when starts are scanned in order.
fn better(current: Candidate, challenger: Candidate) -> Candidate {
    let shorter = challenger.tour.distance < current.tour.distance - IMPROVEMENT_EPSILON_KM;
    let tied_earlier = (challenger.tour.distance - current.tour.distance).abs() <= IMPROVEMENT_EPSILON_KM
        && challenger.start < current.start;
    if shorter || tied_earlier { challenger } else { current }
}

/// Construct and refine from every stop index, keeping the best tour.
/// Returns the tour and the number of starts that ran.
pub fn multi_start(
    matrix: &DistanceMatrix,
    options: &SolveOptions,
    progress: &dyn ProgressSink,
) -> Result<(Tour, usize)> {
    let total = matrix.stop_count();

    let run = |start: usize| -> Option<Candidate> {
        if options.is_cancelled() {
            return None;
        }
        progress.report(&Progress {
            stage: Stage::Optimizing,
            current: start,
            total,
            message: format!("optimizing from start {} of {}", start, total),
        });
        let tour = refine(&nearest_neighbor(start, matrix), matrix);
        debug!(start, distance = tour.distance, "start evaluated");
        Some(Candidate { start, tour })
    };

    let candidates: Vec<Candidate> = if options.parallel_starts {
        (1..matrix.size()).into_par_iter().filter_map(run).collect()
    } else {
        (1..matrix.size()).filter_map(run).collect()
    };

    let evaluated = candidates.len();
    let best = candidates.into_iter().reduce(better).ok_or(Error::Cancelled)?;
    Ok((best.tour, evaluated))
}

/// Order `stops` into the shortest round trip found from `depot`.
///
/// `coordinates` maps input indices to resolved coordinates. Stops without
/// one are appended after the optimized stops in their input order. Callers
/// fall back to another ordering when fewer than two stops are resolved;
/// this returns [`Error::InsufficientGeoData`] in that case.
pub fn solve<S, M>(
    stops: &[S],
    coordinates: &HashMap<usize, Coordinate>,
    depot: Coordinate,
    matrix_provider: &M,
    options: &SolveOptions,
    progress: &dyn ProgressSink,
) -> Result<TspSolution<S>>
where
    S: Clone,
    M: DistanceMatrixProvider + ?Sized,
{
    if stops.is_empty() {
        return Ok(TspSolution {
            order: Vec::new(),
            total_km: 0.0,
            unresolved: 0,
            starts_evaluated: 0,
        });
    }

    let mut resolved_indices = Vec::new();
    let mut points = Vec::new();
    let mut unresolved = Vec::new();
    for (index, stop) in stops.iter().enumerate() {
        match coordinates.get(&index) {
            Some(coordinate) => {
                resolved_indices.push(index);
                points.push(*coordinate);
            }
            None => unresolved.push(stop.clone()),
        }
    }

    if resolved_indices.len() < 2 {
        return Err(Error::InsufficientGeoData {
            resolved: resolved_indices.len(),
        });
    }

    let matrix = matrix_provider.matrix_for(depot, &points);
    if matrix.size() != points.len() + 1 {
        return Err(Error::invalid_config(format!(
            "distance matrix has {} points, expected depot plus {} stops",
            matrix.size(),
            points.len()
        )));
    }
    let (best, starts_evaluated) = multi_start(&matrix, options, progress)?;
    info!(
        starts = starts_evaluated,
        stops = resolved_indices.len(),
        unresolved = unresolved.len(),
        total_km = best.distance,
        "route optimized"
    );

    let unresolved_count = unresolved.len();
    let mut order: Vec<S> = best
        .order
        .iter()
        .map(|&matrix_index| stops[resolved_indices[matrix_index - 1]].clone())
        .collect();
    order.extend(unresolved);

    Ok(TspSolution {
        order,
        total_km: best.distance,
        unresolved: unresolved_count,
        starts_evaluated,
    })
}
