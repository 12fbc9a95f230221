use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use stack_string::{format_sstr, StackString};
use std::{collections::HashMap, convert::TryFrom, fmt, str::FromStr};

use trail_lib::errors::TrailError as Error;

static POI_CLASS_MAP: Lazy<HashMap<&'static str, PoiClass>> = Lazy::new(init_poi_class_map);

/// Categorical point-of-interest class, the `Class` attribute of the hiking
/// feature service.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(into = "StackString", try_from = "StackString")]
pub enum PoiClass {
    Restaurant,
    Bus,
    CableCar,
    Picture,
    Other,
}

impl Default for PoiClass {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for PoiClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl From<PoiClass> for StackString {
    fn from(item: PoiClass) -> StackString {
        StackString::from_display(item)
    }
}

impl PoiClass {
    #[must_use]
    pub fn to_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Bus => "bus",
            Self::CableCar => "cable car",
            Self::Picture => "picture",
            Self::Other => "other",
        }
    }
}

impl FromStr for PoiClass {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        POI_CLASS_MAP
            .get(input.to_lowercase().as_str())
            .copied()
            .ok_or_else(|| Error::CustomError(format_sstr!("Invalid poi class {input}")))
    }
}

impl TryFrom<StackString> for PoiClass {
    type Error = Error;

    fn try_from(item: StackString) -> Result<Self, Self::Error> {
        item.as_str().parse()
    }
}

fn init_poi_class_map() -> HashMap<&'static str, PoiClass> {
    [
        ("restaurant", PoiClass::Restaurant),
        ("bus", PoiClass::Bus),
        ("cable car", PoiClass::CableCar),
        ("picture", PoiClass::Picture),
        ("other", PoiClass::Other),
    ]
    .iter()
    .copied()
    .collect()
}

#[cfg(test)]
mod tests {
    use crate::poi_class::PoiClass;

    #[test]
    fn test_poi_class_round_trip() {
        for class in [
            PoiClass::Restaurant,
            PoiClass::Bus,
            PoiClass::CableCar,
            PoiClass::Picture,
            PoiClass::Other,
        ] {
            assert_eq!(class.to_str().parse::<PoiClass>().unwrap(), class);
        }
        assert_eq!("Cable Car".parse::<PoiClass>().unwrap(), PoiClass::CableCar);
        assert!("gondola".parse::<PoiClass>().is_err());
    }
}
