//! Built-in sample route: ten Kaohsiung hospitals with surveyed coordinates.

use crate::model::{Category, Coordinate, Stop};

struct SampleStop {
    address: &'static str,
    name: &'static str,
    coordinate: Coordinate,
}

const HOSPITALS: &[SampleStop] = &[
    SampleStop { address: "高雄市左營區大中一路386號", name: "高雄榮民總醫院", coordinate: Coordinate::new(22.6818, 120.2917) },
    SampleStop { address: "高雄市鳥松區大埤路123號", name: "高雄長庚紀念醫院", coordinate: Coordinate::new(22.6494, 120.3540) },
    SampleStop { address: "高雄市三民區自由一路100號", name: "高雄醫學大學附設醫院", coordinate: Coordinate::new(22.6508, 120.3111) },
    SampleStop { address: "高雄市燕巢區角宿里義大路1號", name: "義大醫院", coordinate: Coordinate::new(22.7530, 120.3647) },
    SampleStop { address: "高雄市苓雅區中正一路2號", name: "國軍高雄總醫院", coordinate: Coordinate::new(22.6198, 120.3073) },
    SampleStop { address: "高雄市前金區中華三路68號", name: "高雄市立大同醫院", coordinate: Coordinate::new(22.6292, 120.2960) },
    SampleStop { address: "高雄市小港區山明路482號", name: "高雄市立小港醫院", coordinate: Coordinate::new(22.5651, 120.3528) },
    SampleStop { address: "高雄市鳳山區經武路42號", name: "高雄市立鳳山醫院", coordinate: Coordinate::new(22.6265, 120.3547) },
    SampleStop { address: "高雄市苓雅區成功一路162號", name: "阮綜合醫院", coordinate: Coordinate::new(22.6215, 120.3095) },
    SampleStop { address: "高雄市前鎮區中華五路2號", name: "高雄市立聯合醫院", coordinate: Coordinate::new(22.5960, 120.3060) },
];

/// The sample stops, in listing order.
pub fn kaohsiung_hospitals() -> Vec<Stop> {
    HOSPITALS
        .iter()
        .map(|s| Stop::new(s.address, Some(s.name.to_string())).category(Category::Hospital))
        .collect()
}

/// Address → coordinate pairs for seeding a geocode cache.
pub fn seed_entries() -> Vec<(String, Coordinate)> {
    HOSPITALS
        .iter()
        .map(|s| (s.address.to_string(), s.coordinate))
        .collect()
}
