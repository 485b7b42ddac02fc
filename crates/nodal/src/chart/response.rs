use crate::chart::calculator::ChartResult;
use crate::chart::zodiac::{Sign, ZodiacPlacement};
use serde::{Deserialize, Serialize};

/// Node entry of the response handed to report generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResponse {
    pub sign: Sign,
    /// Degree within sign, two decimals
    pub degree: f64,
    pub house: Option<u8>,
}

/// The wire form of a [`ChartResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResponse {
    pub sun_sign: Sign,
    pub moon_sign: Sign,
    pub rising_sign: Sign,
    pub north_node: NodeResponse,
    pub south_node: NodeResponse,
}

/// Round to two decimals without ever reaching the next sign.
pub fn round_degree(degree: f64) -> f64 {
    ((degree * 100.0).round() / 100.0).min(29.99)
}

impl From<&ZodiacPlacement> for NodeResponse {
    fn from(placement: &ZodiacPlacement) -> Self {
        Self {
            sign: placement.sign,
            degree: round_degree(placement.degree_in_sign),
            house: placement.house,
        }
    }
}

impl From<&ChartResult> for ChartResponse {
    fn from(chart: &ChartResult) -> Self {
        Self {
            sun_sign: chart.sun.sign,
            moon_sign: chart.moon.sign,
            rising_sign: chart.rising.sign,
            north_node: NodeResponse::from(&chart.north_node),
            south_node: NodeResponse::from(&chart.south_node),
        }
    }
}
