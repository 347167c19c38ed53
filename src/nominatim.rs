//! Nominatim HTTP adapter, the primary geocoding provider.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Coordinate;
use crate::traits::GeocodeProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Comma-separated ISO country codes restricting the search.
    pub country_codes: String,
    /// Sent as `Accept-Language`.
    pub language: String,
    /// Nominatim's usage policy requires an identifying client string with a
    /// contact address. Replace the placeholder contact in deployments.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            country_codes: "tw".to_string(),
            language: "zh-TW".to_string(),
            user_agent: concat!("route-planner/", env!("CARGO_PKG_VERSION"), " (contact@example.com)").to_string(),
            timeout_secs: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl GeocodeProvider for NominatimClient {
    fn name(&self) -> &str {
        "nominatim"
    }

    fn lookup(&self, address: &str) -> Result<Coordinate> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));

        let places = self
            .client
            .get(url)
            .query(&[
                ("format", "json"),
                ("q", address),
                ("limit", "1"),
                ("countrycodes", self.config.country_codes.as_str()),
            ])
            .header(reqwest::header::ACCEPT_LANGUAGE, self.config.language.as_str())
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<NominatimPlace>>())?;

        best_match(&places).ok_or_else(|| Error::lookup_failed(self.name(), "no usable result"))
    }
}

/// Nominatim returns coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    lat: String,
    lon: String,
}

pub(crate) fn best_match(places: &[NominatimPlace]) -> Option<Coordinate> {
    let place = places.first()?;
    let coordinate = Coordinate::new(place.lat.parse().ok()?, place.lon.parse().ok()?);
    coordinate.is_valid().then_some(coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Option<Coordinate> {
        let places: Vec<NominatimPlace> = serde_json::from_str(body).ok()?;
        best_match(&places)
    }

    #[test]
    fn test_parses_first_place() {
        let body = r#"[
            {"place_id": 1, "lat": "22.6818", "lon": "120.2917", "display_name": "高雄榮民總醫院"},
            {"place_id": 2, "lat": "0", "lon": "0"}
        ]"#;
        assert_eq!(parse(body), Some(Coordinate::new(22.6818, 120.2917)));
    }

    #[test]
    fn test_empty_result() {
        assert_eq!(parse("[]"), None);
    }

    #[test]
    fn test_unparsable_coordinate() {
        assert_eq!(parse(r#"[{"lat": "north", "lon": "120.0"}]"#), None);
    }

    #[test]
    fn test_default_config() {
        let config = NominatimConfig::default();
        assert_eq!(config.country_codes, "tw");
        assert_eq!(config.language, "zh-TW");
        assert_eq!(config.timeout_secs, 8);
        assert!(config.user_agent.starts_with("route-planner/"));
        assert!(config.user_agent.ends_with("(contact@example.com)"));
    }
}
