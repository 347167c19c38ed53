//! Administrative-region handling.
//!
//! Regions are derived from free-text addresses and give a deterministic,
//! geometry-free visiting order when too few stops could be geocoded.

use serde::{Deserialize, Serialize};

use crate::traits::Place;

const REGION_SUFFIXES: [char; 3] = ['區', '鄉', '鎮'];
const PREFIX_BOUNDARIES: [char; 2] = ['市', '縣'];

/// Keywords recognized when an address omits the region suffix.
const REGION_KEYWORDS: &[(&str, &str)] = &[
    ("左營", "左營區"),
    ("楠梓", "楠梓區"),
    ("岡山", "岡山區"),
    ("鳳山", "鳳山區"),
    ("三民", "三民區"),
    ("苓雅", "苓雅區"),
    ("前鎮", "前鎮區"),
    ("小港", "小港區"),
    ("旗山", "旗山區"),
    ("美濃", "美濃區"),
    ("仁武", "仁武區"),
    ("大社", "大社區"),
    ("燕巢", "燕巢區"),
    ("橋頭", "橋頭區"),
    ("鳥松", "鳥松區"),
    ("大寮", "大寮區"),
    ("林園", "林園區"),
    ("旗津", "旗津區"),
    ("鹽埕", "鹽埕區"),
    ("鼓山", "鼓山區"),
    ("新興", "新興區"),
    ("前金", "前金區"),
    ("大樹", "大樹區"),
];

/// Kaohsiung districts, nearest to the default depot first.
const KAOHSIUNG_DISTRICTS: &[&str] = &[
    "仁武區", "鳥松區", "大社區", "燕巢區", "岡山區", "橋頭區",
    "楠梓區", "左營區", "三民區", "新興區", "前金區", "苓雅區",
    "鼓山區", "鹽埕區", "旗津區", "前鎮區", "小港區", "鳳山區",
    "大寮區", "大樹區", "林園區", "路竹區", "湖內區", "茄萣區",
    "阿蓮區", "田寮區", "旗山區", "美濃區", "杉林區", "甲仙區",
    "內門區", "六龜區", "茂林區", "桃源區", "那瑪夏區",
];

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Pick the region out of an unbroken CJK run ending in a suffix, e.g.
/// `屏東萬丹鄉`. A known district wins; otherwise the last two characters
/// before the suffix, the common length for district names.
fn trailing_name(run: &[char]) -> String {
    let suffix_at = run.len() - 1;
    (2..=4)
        .rev()
        .map(|len| run[suffix_at - len..].iter().collect::<String>())
        .find(|name| KAOHSIUNG_DISTRICTS.contains(&name.as_str()))
        .unwrap_or_else(|| run[suffix_at - 2..].iter().collect())
}

/// Extract the administrative region (e.g. `仁武區`) from an address.
pub fn extract_region(address: &str) -> Option<String> {
    let chars: Vec<char> = address.chars().collect();

    for (pos, &c) in chars.iter().enumerate() {
        if !REGION_SUFFIXES.contains(&c) {
            continue;
        }
        let run = chars[..pos]
            .iter()
            .rev()
            .take_while(|&&p| is_cjk(p) && !PREFIX_BOUNDARIES.contains(&p))
            .count();
        if (2..=4).contains(&run) {
            return Some(chars[pos - run..=pos].iter().collect());
        }
        if run > 4 {
            return Some(trailing_name(&chars[pos - run..=pos]));
        }
    }

    REGION_KEYWORDS
        .iter()
        .find(|(keyword, _)| address.contains(keyword))
        .map(|(_, region)| region.to_string())
}

/// Priority list of region names used by the fallback ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionOrder {
    regions: Vec<String>,
}

impl Default for RegionOrder {
    fn default() -> Self {
        Self::new(KAOHSIUNG_DISTRICTS.iter().map(|r| r.to_string()).collect())
    }
}

impl RegionOrder {
    pub fn new(regions: Vec<String>) -> Self {
        Self { regions }
    }

    /// Position in the priority list; unknown or missing regions rank last.
    pub fn rank(&self, region: Option<&str>) -> usize {
        region
            .and_then(|r| self.regions.iter().position(|known| known == r))
            .unwrap_or(self.regions.len())
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }
}

/// Stable sort by region rank. Stops in the same region keep their input order.
pub fn sort_by_region<P>(stops: &[P], order: &RegionOrder) -> Vec<P>
where
    P: Place + Clone,
{
    let mut sorted = stops.to_vec();
    sorted.sort_by_key(|stop| order.rank(stop.region()));
    sorted
}
