pub mod cache;
pub mod geocoder;
pub mod resolver;

pub use cache::{normalize_place, CacheError, CoordinateCache};
pub use geocoder::{GeocodeError, Geocoder, NominatimGeocoder};
pub use resolver::{GeocodingStrategy, LocationResolver};
