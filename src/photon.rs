//! Photon HTTP adapter, the secondary geocoding provider.
//!
//! Photon answers in GeoJSON and accepts a location bias instead of a country
//! restriction.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Coordinate;
use crate::traits::GeocodeProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotonConfig {
    pub base_url: String,
    pub language: String,
    /// Search hint; results near this point rank higher.
    pub bias: Coordinate,
    pub timeout_secs: u64,
}

impl Default for PhotonConfig {
    fn default() -> Self {
        Self {
            base_url: "https://photon.komoot.io".to_string(),
            language: "en".to_string(),
            bias: Coordinate::new(22.63, 120.33),
            timeout_secs: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PhotonClient {
    config: PhotonConfig,
    client: reqwest::blocking::Client,
}

impl PhotonClient {
    pub fn new(config: PhotonConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl GeocodeProvider for PhotonClient {
    fn name(&self) -> &str {
        "photon"
    }

    fn lookup(&self, address: &str) -> Result<Coordinate> {
        let url = format!("{}/api/", self.config.base_url.trim_end_matches('/'));
        let lat = self.config.bias.lat.to_string();
        let lon = self.config.bias.lng.to_string();

        let body = self
            .client
            .get(url)
            .query(&[
                ("q", address),
                ("lang", self.config.language.as_str()),
                ("limit", "1"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<PhotonResponse>())?;

        best_match(&body).ok_or_else(|| Error::lookup_failed(self.name(), "no usable result"))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    geometry: PhotonGeometry,
}

/// GeoJSON point: `[lng, lat]`.
#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    coordinates: Vec<f64>,
}

pub(crate) fn best_match(body: &PhotonResponse) -> Option<Coordinate> {
    let feature = body.features.first()?;
    match feature.geometry.coordinates.as_slice() {
        [lng, lat, ..] => {
            let coordinate = Coordinate::new(*lat, *lng);
            coordinate.is_valid().then_some(coordinate)
        }
        _ => None,
    }
}
