//! Natal chart core: resolves a birth place, pins the local birth time to an
//! absolute instant, and places the Sun, Moon, Ascendant and lunar nodes in
//! the zodiac and houses.

pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod location;
pub mod service;
pub mod time;

pub use chart::{ChartCalculator, ChartOptions, ChartResponse, ChartResult, Sign, ZodiacPlacement};
pub use ephemeris::{
    Body, EphemerisError, EphemerisProvider, GeoCoordinate, HouseCusps, HouseSystem, JulianDay,
    NodeConvention, SwissEphemerisAdapter,
};
pub use error::ChartError;
pub use location::{CoordinateCache, Geocoder, GeocodingStrategy, LocationResolver, NominatimGeocoder};
pub use service::{ChartRequest, NatalChartService};
pub use time::{BirthMoment, PolygonTimezoneLookup, TimeNormalizer, TimezoneLookup, ZoneSource};
