use crate::ephemeris::julian::JulianDay;
use crate::ephemeris::types::{Body, GeoCoordinate, HouseCusps, HouseSystem};
use thiserror::Error;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Invalid house system: {system}. Valid systems: {valid:?}")]
    InvalidHouseSystem { system: String, valid: Vec<String> },
    #[error("Invalid node convention: {0}")]
    InvalidNodeConvention(String),
    #[error("Failed to calculate position for {body} at {julian_day}: {message}")]
    CalculationFailed {
        body: String,
        julian_day: JulianDay,
        message: String,
    },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
}

/// Source of angular positions. Longitudes returned are already reduced to
/// `[0, 360)`.
pub trait EphemerisProvider: Send + Sync {
    fn longitude_of(&self, body: Body, jd: JulianDay) -> Result<f64, EphemerisError>;

    fn house_cusps(
        &self,
        jd: JulianDay,
        location: &GeoCoordinate,
        system: HouseSystem,
    ) -> Result<HouseCusps, EphemerisError>;
}
