pub mod adapter;
pub mod julian;
pub mod provider;
pub mod types;

pub use adapter::SwissEphemerisAdapter;
pub use julian::JulianDay;
pub use provider::{EphemerisError, EphemerisProvider};
pub use types::{normalize_degrees, Body, GeoCoordinate, HouseCusps, HouseSystem, NodeConvention};
