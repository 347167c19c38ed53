//! Core data types: coordinates, stops and stop categories.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::region::extract_region;
use crate::traits::Place;

/// A WGS-84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the lat/lng ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Closed set of stop categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Pharmacy,
    Clinic,
    Hospital,
    Company,
    #[default]
    Unknown,
}

impl Category {
    /// Guess the category from a name or address. Hospital wins over clinic,
    /// clinic over pharmacy, pharmacy over company.
    pub fn detect(text: &str) -> Self {
        if text.contains("醫院") {
            Category::Hospital
        } else if text.contains("診所") {
            Category::Clinic
        } else if ["藥局", "藥房", "藥妝"].iter().any(|k| text.contains(k)) {
            Category::Pharmacy
        } else if ["公司", "企業", "工廠", "工作室"].iter().any(|k| text.contains(k)) {
            Category::Company
        } else {
            Category::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Pharmacy => "藥局",
            Category::Clinic => "診所",
            Category::Hospital => "醫院",
            Category::Company => "私人公司",
            Category::Unknown => "",
        }
    }
}

static NEXT_STOP_ID: AtomicU64 = AtomicU64::new(1);

/// A place to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub address: String,
    pub name: Option<String>,
    #[serde(default)]
    pub category: Category,
    pub region: Option<String>,
}

impl Stop {
    /// Create a stop with a fresh id, deriving category and region.
    pub fn new(address: impl Into<String>, name: Option<String>) -> Self {
        let id = format!("stop-{}", NEXT_STOP_ID.fetch_add(1, Ordering::Relaxed));
        Self::with_id(id, address, name)
    }

    pub fn with_id(id: impl Into<String>, address: impl Into<String>, name: Option<String>) -> Self {
        let mut stop = Self {
            id: id.into(),
            address: address.into(),
            name: name.filter(|n| !n.trim().is_empty()),
            category: Category::Unknown,
            region: None,
        };
        stop.rederive();
        stop
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Display name, falling back to the address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }

    /// Recompute category and region from the current name and address.
    pub fn rederive(&mut self) {
        self.category = Category::detect(self.display_name());
        self.region = extract_region(&self.address);
    }
}

impl Place for Stop {
    fn address(&self) -> &str {
        &self.address
    }

    fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_category() {
        assert_eq!(Category::detect("高雄榮民總醫院"), Category::Hospital);
        assert_eq!(Category::detect("仁愛診所"), Category::Clinic);
        assert_eq!(Category::detect("大樹藥局"), Category::Pharmacy);
        assert_eq!(Category::detect("健康藥妝"), Category::Pharmacy);
        assert_eq!(Category::detect("中鋼工廠"), Category::Company);
        assert_eq!(Category::detect("高雄市仁武區興昌巷10號"), Category::Unknown);
    }

    #[test]
    fn test_hospital_beats_clinic() {
        assert_eq!(Category::detect("醫院附設診所"), Category::Hospital);
    }

    #[test]
    fn test_stop_derives_fields() {
        let stop = Stop::new("高雄市左營區大中一路386號", Some("高雄榮民總醫院".to_string()));
        assert_eq!(stop.category, Category::Hospital);
        assert_eq!(stop.region.as_deref(), Some("左營區"));
        assert_eq!(stop.display_name(), "高雄榮民總醫院");
    }

    #[test]
    fn test_blank_name_falls_back_to_address() {
        let stop = Stop::new("高雄市三民區自由一路100號", Some("  ".to_string()));
        assert_eq!(stop.name, None);
        assert_eq!(stop.display_name(), "高雄市三民區自由一路100號");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Stop::new("a", None);
        let b = Stop::new("a", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(22.7, 120.3).is_valid());
        assert!(!Coordinate::new(f64::NAN, 120.3).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
    }
}
