//! Planning session: owns the geocode cache and configuration and runs the
//! resolve → optimize → segment pipeline.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::geocode::{GeoResolver, ResolveOptions};
use crate::haversine::HaversineMatrix;
use crate::model::{Category, Coordinate, Stop};
use crate::nominatim::NominatimConfig;
use crate::photon::PhotonConfig;
use crate::region::{RegionOrder, sort_by_region};
use crate::segment::{NavigationRequest, SegmentOptions, segment};
use crate::solver::{SolveOptions, solve};
use crate::traits::{CacheStore, Place, ProgressSink};

/// Fixed start and end of every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    /// Used in navigation requests.
    pub address: String,
    /// Short display form.
    pub label: String,
    pub coordinate: Coordinate,
}

impl Default for Depot {
    fn default() -> Self {
        Self {
            address: "高雄市仁武區興昌巷10號".to_string(),
            label: "仁武區興昌巷10號".to_string(),
            coordinate: Coordinate::new(22.7124, 120.3395),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub depot: Depot,
    pub nominatim: NominatimConfig,
    pub photon: PhotonConfig,
    pub resolve: ResolveOptions,
    pub solve: SolveOptions,
    pub segment: SegmentOptions,
    pub regions: RegionOrder,
}

impl PlannerConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.depot.coordinate.is_valid() {
            return Err(Error::invalid_config(format!(
                "depot coordinate out of range: {:?}",
                self.depot.coordinate
            )));
        }
        if self.segment.chunk_size == 0 {
            return Err(Error::invalid_config("segment.chunk_size must be at least 1"));
        }
        Ok(())
    }
}

/// How a plan's order was produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanMethod {
    /// Nothing to plan.
    Empty,
    /// Multi-start local search; `total_km` covers the resolved stops.
    Optimized { total_km: f64 },
    /// Too few coordinates; ordered by administrative region.
    RegionFallback,
}

#[derive(Debug, Clone)]
pub struct RoutePlan<S> {
    pub order: Vec<S>,
    pub method: PlanMethod,
    /// Stops without a coordinate.
    pub unresolved: usize,
}

impl<S: Place> RoutePlan<S> {
    pub fn segments(&self, options: &SegmentOptions) -> Result<Vec<NavigationRequest<'_, S>>> {
        segment(&self.order, options)
    }

    /// One-line status for display.
    pub fn summary(&self, options: &SegmentOptions) -> String {
        match self.method {
            PlanMethod::Empty => "no stops to plan".to_string(),
            PlanMethod::RegionFallback => {
                format!("{} stops · not enough coordinates, ordered by region", self.order.len())
            }
            PlanMethod::Optimized { total_km } => {
                let mut line = format!("{} stops · {:.1} km", self.order.len(), total_km);
                if self.unresolved > 0 {
                    line.push_str(&format!(" · {} without coordinates", self.unresolved));
                }
                let chunks = self.order.len().div_ceil(options.chunk_size.max(1));
                if chunks > 1 {
                    line.push_str(&format!(" · {} segments", chunks));
                }
                line
            }
        }
    }
}

/// Keep only stops of `category`; `None` keeps everything.
pub fn filter_by_category(stops: &[Stop], category: Option<Category>) -> Vec<Stop> {
    stops
        .iter()
        .filter(|stop| category.is_none_or(|c| stop.category == c))
        .cloned()
        .collect()
}

#[derive(Debug)]
pub struct RoutePlanner {
    config: PlannerConfig,
    resolver: GeoResolver,
}

impl RoutePlanner {
    pub fn new(config: PlannerConfig, resolver: GeoResolver) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, resolver })
    }

    /// Planner with the default Nominatim → Photon providers.
    pub fn with_store<S>(config: PlannerConfig, store: S) -> Result<Self>
    where
        S: CacheStore + Send + 'static,
    {
        let resolver = GeoResolver::with_default_providers(
            store,
            config.nominatim.clone(),
            config.photon.clone(),
            config.resolve.clone(),
        )?;
        Self::new(config, resolver)
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &GeoResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut GeoResolver {
        &mut self.resolver
    }

    /// Resolve addresses, then optimize; with fewer than two coordinates the
    /// stops are ordered by region instead.
    pub fn plan<S>(&mut self, stops: &[S], progress: &dyn ProgressSink) -> Result<RoutePlan<S>>
    where
        S: Place + Clone,
    {
        if stops.is_empty() {
            return Ok(RoutePlan {
                order: Vec::new(),
                method: PlanMethod::Empty,
                unresolved: 0,
            });
        }

        let resolved = self.resolver.resolve_all(stops, progress);
        let unresolved = resolved.unresolved.len();

        if resolved.coordinates.len() < 2 {
            info!(
                resolved = resolved.coordinates.len(),
                total = stops.len(),
                "too few coordinates, ordering by region"
            );
            return Ok(RoutePlan {
                order: sort_by_region(stops, &self.config.regions),
                method: PlanMethod::RegionFallback,
                unresolved,
            });
        }

        let solution = solve(
            stops,
            &resolved.coordinates,
            self.config.depot.coordinate,
            &HaversineMatrix,
            &self.config.solve,
            progress,
        )?;

        Ok(RoutePlan {
            order: solution.order,
            method: PlanMethod::Optimized {
                total_km: solution.total_km,
            },
            unresolved,
        })
    }
}
