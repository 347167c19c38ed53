//! Address resolution: cache first, then the lookup providers in order.
//!
//! External calls are made one at a time with a fixed pause between them so
//! third-party rate limits are respected. Provider failures never escape this
//! module; they turn into "no coordinate" outcomes.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::model::Coordinate;
use crate::nominatim::{NominatimClient, NominatimConfig};
use crate::photon::{PhotonClient, PhotonConfig};
use crate::traits::{CacheStore, GeocodeProvider, Place, Progress, ProgressSink, Stage};

/// Append-only address → coordinate map. Keys match exactly, case and
/// whitespace included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoCache {
    entries: HashMap<String, Coordinate>,
}

impl GeoCache {
    pub fn new(entries: HashMap<String, Coordinate>) -> Self {
        Self { entries }
    }

    pub fn get(&self, address: &str) -> Option<Coordinate> {
        self.entries.get(address).copied()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries.contains_key(address)
    }

    /// Adds an entry unless the address is already known. Existing entries
    /// are ground truth and never replaced. Returns whether it was added.
    pub fn insert(&mut self, address: impl Into<String>, coordinate: Coordinate) -> bool {
        match self.entries.entry(address.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(coordinate);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &HashMap<String, Coordinate> {
        &self.entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Pause between consecutive external lookups, in milliseconds.
    pub request_delay_ms: u64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            request_delay_ms: 1100,
        }
    }
}

impl ResolveOptions {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Outcome of a single address lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Cached(Coordinate),
    Fetched { coordinate: Coordinate, provider: String },
    NotFound,
}

impl Lookup {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Lookup::Cached(coordinate) | Lookup::Fetched { coordinate, .. } => Some(*coordinate),
            Lookup::NotFound => None,
        }
    }
}

/// Result of [`GeoResolver::resolve_all`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    /// Coordinates keyed by input index.
    pub coordinates: HashMap<usize, Coordinate>,
    /// Input indices without a coordinate, ascending.
    pub unresolved: Vec<usize>,
    /// Number of addresses sent to the providers.
    pub external_lookups: usize,
}

pub struct GeoResolver {
    cache: GeoCache,
    store: Box<dyn CacheStore + Send>,
    providers: Vec<Box<dyn GeocodeProvider + Send>>,
    options: ResolveOptions,
}

impl std::fmt::Debug for GeoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoResolver")
            .field("cached", &self.cache.len())
            .field("providers", &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}

impl GeoResolver {
    /// Build a resolver, loading the cache from `store`. A store that fails
    /// to load starts the session with an empty cache.
    pub fn new<S>(store: S, providers: Vec<Box<dyn GeocodeProvider + Send>>, options: ResolveOptions) -> Self
    where
        S: CacheStore + Send + 'static,
    {
        let cache = match store.load() {
            Ok(entries) => GeoCache::new(entries),
            Err(err) => {
                warn!(error = %err, "failed to load geocode cache, starting empty");
                GeoCache::default()
            }
        };
        debug!(entries = cache.len(), "geocode cache loaded");

        Self {
            cache,
            store: Box::new(store),
            providers,
            options,
        }
    }

    /// Resolver backed by Nominatim, falling back to Photon.
    pub fn with_default_providers<S>(
        store: S,
        nominatim: NominatimConfig,
        photon: PhotonConfig,
        options: ResolveOptions,
    ) -> Result<Self>
    where
        S: CacheStore + Send + 'static,
    {
        let providers: Vec<Box<dyn GeocodeProvider + Send>> = vec![
            Box::new(NominatimClient::new(nominatim)?),
            Box::new(PhotonClient::new(photon)?),
        ];
        Ok(Self::new(store, providers, options))
    }

    pub fn cache(&self) -> &GeoCache {
        &self.cache
    }

    /// Add known coordinates without any external call. Persists once if
    /// anything new was added.
    pub fn seed<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (String, Coordinate)>,
    {
        let added = entries
            .into_iter()
            .filter(|(address, coordinate)| self.cache.insert(address.clone(), *coordinate))
            .count();
        if added > 0 {
            self.persist();
        }
        added
    }

    pub fn resolve(&mut self, address: &str) -> Option<Coordinate> {
        self.lookup(address).coordinate()
    }

    /// Cache, then each provider in order. A miss is never cached.
    pub fn lookup(&mut self, address: &str) -> Lookup {
        if let Some(coordinate) = self.cache.get(address) {
            debug!(address, "geocode cache hit");
            return Lookup::Cached(coordinate);
        }
        if address.trim().is_empty() {
            return Lookup::NotFound;
        }
        debug!(address, "geocode cache miss");

        for provider in &self.providers {
            match provider.lookup(address) {
                Ok(coordinate) if coordinate.is_valid() => {
                    self.cache.insert(address, coordinate);
                    self.persist();
                    return Lookup::Fetched {
                        coordinate,
                        provider: provider.name().to_string(),
                    };
                }
                Ok(coordinate) => {
                    warn!(provider = provider.name(), address, ?coordinate, "provider returned invalid coordinate");
                }
                Err(err) => {
                    warn!(provider = provider.name(), address, error = %err, "lookup failed");
                }
            }
        }

        info!(address, "address could not be resolved");
        Lookup::NotFound
    }

    /// Resolve every stop in input order. Cached addresses cost nothing;
    /// external lookups run one at a time with the configured pause between
    /// them.
    pub fn resolve_all<P>(&mut self, stops: &[P], progress: &dyn ProgressSink) -> Resolved
    where
        P: Place,
    {
        let mut resolved = Resolved::default();
        let total = stops.len();

        for (index, stop) in stops.iter().enumerate() {
            let address = stop.address();

            if let Some(coordinate) = self.cache.get(address) {
                resolved.coordinates.insert(index, coordinate);
                continue;
            }
            if address.trim().is_empty() {
                resolved.unresolved.push(index);
                continue;
            }

            if resolved.external_lookups > 0 {
                std::thread::sleep(self.options.request_delay());
            }
            progress.report(&Progress {
                stage: Stage::Geocoding,
                current: index + 1,
                total,
                message: format!("locating {}", address),
            });

            let lookup = self.lookup(address);
            resolved.external_lookups += 1;

            match lookup.coordinate() {
                Some(coordinate) => {
                    resolved.coordinates.insert(index, coordinate);
                }
                None => resolved.unresolved.push(index),
            }
        }

        debug!(
            total,
            resolved = resolved.coordinates.len(),
            unresolved = resolved.unresolved.len(),
            external = resolved.external_lookups,
            "bulk geocoding finished"
        );
        resolved
    }

    fn persist(&self) {
        if let Err(err) = self.store.persist(self.cache.entries()) {
            warn!(error = %err, "failed to persist geocode cache");
        }
    }
}
