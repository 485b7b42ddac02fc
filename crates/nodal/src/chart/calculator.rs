use crate::chart::houses::assign_house;
use crate::chart::zodiac::ZodiacPlacement;
use crate::ephemeris::{Body, EphemerisProvider, GeoCoordinate, HouseSystem, JulianDay, NodeConvention};
use crate::error::ChartError;
use crate::time::BirthMoment;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Policy choices fixed when the calculator is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChartOptions {
    pub node_convention: NodeConvention,
    pub house_system: HouseSystem,
}

/// Sun, Moon, Ascendant and lunar nodes for one birth moment and place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResult {
    pub julian_day: JulianDay,
    pub node_convention: NodeConvention,
    pub house_system: HouseSystem,
    pub sun: ZodiacPlacement,
    pub moon: ZodiacPlacement,
    /// Never carries a house: the ascendant defines house 1.
    pub rising: ZodiacPlacement,
    pub north_node: ZodiacPlacement,
    pub south_node: ZodiacPlacement,
}

pub struct ChartCalculator {
    ephemeris: Arc<dyn EphemerisProvider>,
    options: ChartOptions,
}

impl ChartCalculator {
    pub fn new(ephemeris: Arc<dyn EphemerisProvider>, options: ChartOptions) -> Self {
        Self { ephemeris, options }
    }

    pub fn options(&self) -> ChartOptions {
        self.options
    }

    /// Compute a chart with the options chosen at construction.
    pub fn compute_chart(
        &self,
        moment: &BirthMoment,
        location: &GeoCoordinate,
    ) -> Result<ChartResult, ChartError> {
        self.compute_chart_with(
            moment,
            location,
            self.options.node_convention,
            self.options.house_system,
        )
    }

    /// Compute a chart with an explicit node convention and house system.
    /// Ephemeris failures propagate unchanged; nothing is retried.
    pub fn compute_chart_with(
        &self,
        moment: &BirthMoment,
        location: &GeoCoordinate,
        node_convention: NodeConvention,
        house_system: HouseSystem,
    ) -> Result<ChartResult, ChartError> {
        let jd = moment.julian_day();

        let sun_lon = self.ephemeris.longitude_of(Body::Sun, jd)?;
        let moon_lon = self.ephemeris.longitude_of(Body::Moon, jd)?;
        let node_lon = self.ephemeris.longitude_of(node_convention.body(), jd)?;
        let houses = self.ephemeris.house_cusps(jd, location, house_system)?;

        let place = |lon: f64| ZodiacPlacement::from_longitude(lon).with_house(assign_house(lon, &houses.cusps));

        let sun = place(sun_lon);
        let moon = place(moon_lon);
        let rising = ZodiacPlacement::from_longitude(houses.ascendant);
        let north_node = place(node_lon);
        let south_node = north_node.antipode();

        debug!(
            "{}: sun {} moon {} rising {} node {} (house {:?})",
            jd, sun.sign, moon.sign, rising.sign, north_node.sign, north_node.house
        );

        Ok(ChartResult {
            julian_day: jd,
            node_convention,
            house_system,
            sun,
            moon,
            rising,
            north_node,
            south_node,
        })
    }
}
