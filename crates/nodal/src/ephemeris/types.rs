use crate::ephemeris::provider::EphemerisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic location coordinates in degrees.
///
/// Only constructed through [`GeoCoordinate::new`], so a value in hand is
/// always within `[-90, 90]` x `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    lat: f64,
    lon: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lon_ok = lon.is_finite() && (-180.0..=180.0).contains(&lon);
        (lat_ok && lon_ok).then_some(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Bodies the chart needs from the ephemeris.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    MeanNode,
    TrueNode,
}

impl Body {
    /// Swiss Ephemeris planet number
    pub fn swiss_id(self) -> i32 {
        match self {
            Body::Sun => 0,
            Body::Moon => 1,
            Body::MeanNode => 10,
            Body::TrueNode => 11,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::MeanNode => "mean_node",
            Body::TrueNode => "true_node",
        }
    }
}

/// Which lunar node computation to use. The two differ by up to a couple
/// of degrees, enough to flip the node's sign near a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeConvention {
    #[default]
    True,
    Mean,
}

impl NodeConvention {
    pub fn body(self) -> Body {
        match self {
            NodeConvention::True => Body::TrueNode,
            NodeConvention::Mean => Body::MeanNode,
        }
    }
}

impl FromStr for NodeConvention {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "true" | "true_node" => Ok(NodeConvention::True),
            "mean" | "mean_node" => Ok(NodeConvention::Mean),
            _ => Err(EphemerisError::InvalidNodeConvention(s.to_string())),
        }
    }
}

/// House system names accepted in configuration
const HOUSE_SYSTEMS: &[(&str, HouseSystem)] = &[
    ("placidus", HouseSystem::Placidus),
    ("whole_sign", HouseSystem::WholeSign),
    ("koch", HouseSystem::Koch),
    ("equal", HouseSystem::Equal),
    ("regiomontanus", HouseSystem::Regiomontanus),
    ("campanus", HouseSystem::Campanus),
    ("alcabitius", HouseSystem::Alcabitius),
    ("morinus", HouseSystem::Morinus),
    ("porphyry", HouseSystem::Porphyry),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    Placidus,
    WholeSign,
    Koch,
    Equal,
    Regiomontanus,
    Campanus,
    Alcabitius,
    Morinus,
    Porphyry,
}

impl HouseSystem {
    pub fn code(self) -> u8 {
        match self {
            HouseSystem::Placidus => b'P',
            HouseSystem::WholeSign => b'W',
            HouseSystem::Koch => b'K',
            HouseSystem::Equal => b'E',
            HouseSystem::Regiomontanus => b'R',
            HouseSystem::Campanus => b'C',
            HouseSystem::Alcabitius => b'B',
            HouseSystem::Morinus => b'M',
            HouseSystem::Porphyry => b'O',
        }
    }

    pub fn name(self) -> &'static str {
        HOUSE_SYSTEMS
            .iter()
            .find(|(_, system)| *system == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    pub fn valid_names() -> Vec<String> {
        HOUSE_SYSTEMS.iter().map(|(name, _)| name.to_string()).collect()
    }
}

impl FromStr for HouseSystem {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        HOUSE_SYSTEMS
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, system)| *system)
            .ok_or_else(|| EphemerisError::InvalidHouseSystem {
                system: s.to_string(),
                valid: HouseSystem::valid_names(),
            })
    }
}

/// House cusps and angles for one instant and place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseCusps {
    pub system: HouseSystem,
    /// Cusp longitudes for houses 1..=12, in order. Anything other than
    /// twelve finite values is treated as missing when assigning houses.
    pub cusps: Vec<f64>,
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Reduce a longitude onto the circle, always returning a value in `[0, 360)`.
pub fn normalize_degrees(lon: f64) -> f64 {
    let r = lon.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}
