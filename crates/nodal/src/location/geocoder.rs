use crate::ephemeris::GeoCoordinate;
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "nodes_backend/1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unusable geocoder response: {0}")]
    Malformed(String),
}

/// Free-text place to coordinate lookup over the network.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the service answered but knows no such place.
    async fn geocode(&self, place: &str) -> Result<Option<GeoCoordinate>, GeocodeError>;
}

/// Nominatim (OpenStreetMap) search client. Every request is bounded by the
/// client timeout and is never retried.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn with_defaults() -> Result<Self, GeocodeError> {
        Self::new(NOMINATIM_ENDPOINT, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<GeoCoordinate>, GeocodeError> {
        let places: Vec<NominatimPlace> = self
            .client
            .get(&self.endpoint)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("Nominatim returned {} result(s) for '{}'", places.len(), place);
        first_coordinate(places)
    }
}

fn first_coordinate(places: Vec<NominatimPlace>) -> Result<Option<GeoCoordinate>, GeocodeError> {
    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };
    let lat: f64 = place
        .lat
        .trim()
        .parse()
        .map_err(|_| GeocodeError::Malformed(format!("latitude '{}'", place.lat)))?;
    let lon: f64 = place
        .lon
        .trim()
        .parse()
        .map_err(|_| GeocodeError::Malformed(format!("longitude '{}'", place.lon)))?;
    GeoCoordinate::new(lat, lon)
        .map(Some)
        .ok_or_else(|| GeocodeError::Malformed(format!("coordinates out of range ({lat}, {lon})")))
}
