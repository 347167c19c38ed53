//! Real Kaohsiung locations for realistic test fixtures.

use route_planner::model::{Coordinate, Stop};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, address: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, address, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn stop(&self) -> Stop {
        Stop::new(self.address, Some(self.name.to_string()))
    }
}

pub const DEPOT: Coordinate = Coordinate::new(22.7124, 120.3395);
pub const DEPOT_ADDRESS: &str = "高雄市仁武區興昌巷10號";

// ============================================================================
// Landmarks spread across the city (one per cluster center)
// ============================================================================

pub const LANDMARKS: &[Location] = &[
    Location::new("左營高鐵站", "高雄市左營區高鐵路105號", 22.6873, 120.3078),
    Location::new("美麗島站", "高雄市新興區中山一路115號", 22.6313, 120.3019),
    Location::new("夢時代", "高雄市前鎮區中華五路789號", 22.5950, 120.3070),
    Location::new("鳳山車站", "高雄市鳳山區曹公路", 22.6281, 120.3572),
    Location::new("岡山車站", "高雄市岡山區岡山路", 22.7918, 120.2979),
];

pub const PHARMACIES: &[Location] = &[
    Location::new("仁武大樹藥局", "高雄市仁武區仁雄路50號", 22.7005, 120.3469),
    Location::new("鳥松杏一藥局", "高雄市鳥松區中正路100號", 22.6598, 120.3640),
    Location::new("大社健康藥局", "高雄市大社區中山路200號", 22.7300, 120.3470),
    Location::new("楠梓長青藥局", "高雄市楠梓區建楠路55號", 22.7270, 120.3260),
    Location::new("三民安心藥局", "高雄市三民區九如一路300號", 22.6440, 120.3190),
];

/// 25 stops: five copies of each landmark coordinate.
pub fn clustered_points() -> Vec<Coordinate> {
    LANDMARKS
        .iter()
        .flat_map(|location| std::iter::repeat_n(location.coordinate(), 5))
        .collect()
}
