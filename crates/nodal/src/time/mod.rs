pub mod normalizer;
pub mod timezone;

pub use normalizer::{localize, parse_date, parse_time, BirthMoment, TimeNormalizer, ZoneSource};
pub use timezone::{PolygonTimezoneLookup, TimezoneLookup};
