use crate::ephemeris::GeoCoordinate;
use tzf_rs::DefaultFinder;

/// Resolves the IANA zone name in force at a coordinate.
pub trait TimezoneLookup: Send + Sync {
    /// `None` when the coordinate cannot be resolved to a zone.
    fn zone_name(&self, location: &GeoCoordinate) -> Option<String>;
}

/// Offline polygon lookup over the bundled timezone boundary data.
///
/// Building the finder decodes the boundary data, so construct it once at
/// startup and share it.
pub struct PolygonTimezoneLookup {
    finder: DefaultFinder,
}

impl PolygonTimezoneLookup {
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for PolygonTimezoneLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneLookup for PolygonTimezoneLookup {
    fn zone_name(&self, location: &GeoCoordinate) -> Option<String> {
        let name = self.finder.get_tz_name(location.lon(), location.lat());
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}
