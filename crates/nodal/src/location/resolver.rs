use crate::ephemeris::GeoCoordinate;
use crate::error::ChartError;
use crate::location::cache::CoordinateCache;
use crate::location::geocoder::Geocoder;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which sources the resolver may consult, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodingStrategy {
    /// Cache, then the remote geocoder on a miss
    #[default]
    CacheFirst,
    CacheOnly,
    RemoteOnly,
}

impl GeocodingStrategy {
    fn uses_cache(self) -> bool {
        !matches!(self, GeocodingStrategy::RemoteOnly)
    }

    fn uses_remote(self) -> bool {
        !matches!(self, GeocodingStrategy::CacheOnly)
    }
}

impl FromStr for GeocodingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cache_first" => Ok(GeocodingStrategy::CacheFirst),
            "cache_only" => Ok(GeocodingStrategy::CacheOnly),
            "remote_only" => Ok(GeocodingStrategy::RemoteOnly),
            other => Err(format!(
                "unknown geocoding strategy '{other}' (expected cache_first, cache_only or remote_only)"
            )),
        }
    }
}

impl fmt::Display for GeocodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GeocodingStrategy::CacheFirst => "cache_first",
            GeocodingStrategy::CacheOnly => "cache_only",
            GeocodingStrategy::RemoteOnly => "remote_only",
        })
    }
}

/// Resolves a free-text place to coordinates. Never returns a partial
/// result: either a valid coordinate or `LocationNotFound`.
pub struct LocationResolver {
    cache: Arc<CoordinateCache>,
    geocoder: Option<Arc<dyn Geocoder>>,
    strategy: GeocodingStrategy,
}

impl LocationResolver {
    pub fn new(
        cache: Arc<CoordinateCache>,
        geocoder: Option<Arc<dyn Geocoder>>,
        strategy: GeocodingStrategy,
    ) -> Self {
        Self {
            cache,
            geocoder,
            strategy,
        }
    }

    pub fn strategy(&self) -> GeocodingStrategy {
        self.strategy
    }

    pub async fn resolve(&self, place: &str) -> Result<GeoCoordinate, ChartError> {
        let place = place.trim();

        if self.strategy.uses_cache() {
            if let Some(coordinate) = self.cache.lookup(place) {
                debug!("Cache hit for '{}': {}", place, coordinate);
                return Ok(coordinate);
            }
            debug!("Cache miss for '{}'", place);
        }

        if !self.strategy.uses_remote() {
            return Err(ChartError::location_not_found(place));
        }

        let Some(geocoder) = &self.geocoder else {
            return Err(ChartError::LocationNotFound {
                place: place.to_string(),
                reason: Some("no geocoder configured".to_string()),
            });
        };

        match geocoder.geocode(place).await {
            Ok(Some(coordinate)) => {
                debug!("Geocoded '{}': {}", place, coordinate);
                Ok(coordinate)
            }
            Ok(None) => Err(ChartError::location_not_found(place)),
            Err(e) => {
                warn!("Geocoding error for '{}': {}", place, e);
                Err(ChartError::LocationNotFound {
                    place: place.to_string(),
                    reason: Some(e.to_string()),
                })
            }
        }
    }
}
