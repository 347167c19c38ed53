//! Splits an ordered route into navigation requests small enough for a
//! directions provider's waypoint limit.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::traits::Place;

const GOOGLE_MAPS_DIRECTIONS: &str = "https://www.google.com/maps/dir/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOptions {
    /// Stops per request.
    pub chunk_size: usize,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self { chunk_size: 10 }
    }
}

/// An endpoint of a navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Waypoint<'a, P> {
    Depot,
    Stop(&'a P),
}

impl<P: Place> Waypoint<'_, P> {
    fn address<'b>(&'b self, depot_address: &'b str) -> &'b str {
        match self {
            Waypoint::Depot => depot_address,
            Waypoint::Stop(stop) => stop.address(),
        }
    }
}

/// One leg of the route as a directions request.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest<'a, P> {
    pub origin: Waypoint<'a, P>,
    pub destination: Waypoint<'a, P>,
    /// Intermediate stops in visiting order, endpoints excluded.
    pub waypoints: Vec<&'a P>,
}

impl<P: Place> NavigationRequest<'_, P> {
    /// Google Maps directions link for this leg.
    pub fn maps_url(&self, depot_address: &str) -> Result<Url> {
        let origin = self.origin.address(depot_address);
        let destination = self.destination.address(depot_address);
        let waypoints = self
            .waypoints
            .iter()
            .map(|stop| stop.address())
            .collect::<Vec<_>>()
            .join("|");

        let mut params = vec![("api", "1"), ("origin", origin), ("destination", destination)];
        if !waypoints.is_empty() {
            params.push(("waypoints", waypoints.as_str()));
        }
        params.push(("travelmode", "driving"));

        Url::parse_with_params(GOOGLE_MAPS_DIRECTIONS, &params)
            .map_err(|err| Error::invalid_config(format!("bad directions url: {}", err)))
    }
}

/// Chunk `stops` into requests of at most `chunk_size` stops each.
///
/// The first request leaves from the depot and the last returns to it. Every
/// other request ends at its own last stop, which is also where the next one
/// starts.
pub fn segment<'a, P>(stops: &'a [P], options: &SegmentOptions) -> Result<Vec<NavigationRequest<'a, P>>> {
    if options.chunk_size == 0 {
        return Err(Error::invalid_config("chunk_size must be at least 1"));
    }

    let chunk_count = stops.len().div_ceil(options.chunk_size);
    let requests = stops
        .chunks(options.chunk_size)
        .enumerate()
        .map(|(index, chunk)| {
            let origin = match index {
                0 => Waypoint::Depot,
                _ => Waypoint::Stop(&stops[index * options.chunk_size - 1]),
            };
            let is_last = index + 1 == chunk_count;

            let (destination, waypoints) = match chunk.split_last() {
                Some((last, rest)) if !is_last => (Waypoint::Stop(last), rest.iter().collect()),
                _ => (Waypoint::Depot, chunk.iter().collect()),
            };

            NavigationRequest {
                origin,
                destination,
                waypoints,
            }
        })
        .collect();

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stop;

    fn stops(n: usize) -> Vec<Stop> {
        (0..n)
            .map(|i| Stop::with_id(format!("s{}", i), format!("address {}", i), None))
            .collect()
    }

    fn endpoint_id<'a>(waypoint: &Waypoint<'a, Stop>) -> Option<&'a str> {
        match *waypoint {
            Waypoint::Depot => None,
            Waypoint::Stop(stop) => Some(stop.id.as_str()),
        }
    }

    #[test]
    fn test_twenty_three_stops_make_three_chunks() {
        let route = stops(23);
        let requests = segment(&route, &SegmentOptions::default()).expect("segmented");

        assert_eq!(requests.len(), 3);
        let counts: Vec<usize> = requests.iter().map(|r| r.waypoints.len()).collect();
        assert_eq!(counts, vec![9, 9, 3]);

        assert_eq!(endpoint_id(&requests[0].origin), None);
        assert_eq!(endpoint_id(&requests[0].destination), Some("s9"));
        assert_eq!(endpoint_id(&requests[1].origin), Some("s9"));
        assert_eq!(endpoint_id(&requests[1].destination), Some("s19"));
        assert_eq!(endpoint_id(&requests[2].origin), Some("s19"));
        assert_eq!(endpoint_id(&requests[2].destination), None);
    }

    #[test]
    fn test_single_chunk_returns_to_depot() {
        let route = stops(10);
        let requests = segment(&route, &SegmentOptions::default()).expect("segmented");

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].origin, Waypoint::Depot);
        assert_eq!(requests[0].destination, Waypoint::Depot);
        assert_eq!(requests[0].waypoints.len(), 10);
    }

    #[test]
    fn test_empty_route() {
        let route: Vec<Stop> = Vec::new();
        assert!(segment(&route, &SegmentOptions::default()).expect("segmented").is_empty());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let route = stops(3);
        let result = segment(&route, &SegmentOptions { chunk_size: 0 });
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_chunk_size_one() {
        let route = stops(3);
        let requests = segment(&route, &SegmentOptions { chunk_size: 1 }).expect("segmented");
        assert_eq!(requests.len(), 3);
        assert!(requests[0].waypoints.is_empty());
        assert!(requests[1].waypoints.is_empty());
        assert_eq!(requests[2].waypoints.len(), 1);
        assert_eq!(endpoint_id(&requests[2].origin), Some("s1"));
    }

    #[test]
    fn test_maps_url() {
        let route = vec![
            Stop::with_id("a", "高雄市左營區大中一路386號", None),
            Stop::with_id("b", "高雄市鳥松區大埤路123號", None),
        ];
        let requests = segment(&route, &SegmentOptions::default()).expect("segmented");
        let url = requests[0].maps_url("高雄市仁武區興昌巷10號").expect("url");

        assert_eq!(url.host_str(), Some("www.google.com"));
        assert_eq!(url.path(), "/maps/dir/");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("origin".to_string(), "高雄市仁武區興昌巷10號".to_string())));
        assert!(pairs.contains(&("destination".to_string(), "高雄市仁武區興昌巷10號".to_string())));
        assert!(pairs.contains(&(
            "waypoints".to_string(),
            "高雄市左營區大中一路386號|高雄市鳥松區大埤路123號".to_string()
        )));
        assert!(pairs.contains(&("travelmode".to_string(), "driving".to_string())));
    }
}
