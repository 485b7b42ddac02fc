#![allow(dead_code)]

use async_trait::async_trait;
use nodal::ephemeris::{Body, EphemerisError, EphemerisProvider, GeoCoordinate, HouseCusps, HouseSystem, JulianDay};
use nodal::location::{GeocodeError, Geocoder};
use nodal::time::TimezoneLookup;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Ephemeris returning canned values regardless of the instant.
#[derive(Debug, Clone)]
pub struct StubEphemeris {
    pub sun: f64,
    pub moon: f64,
    pub true_node: f64,
    pub mean_node: f64,
    pub cusps: Vec<f64>,
    pub ascendant: f64,
    pub fail_houses: bool,
}

impl StubEphemeris {
    /// Equal houses starting at `ascendant`.
    pub fn with_equal_houses(ascendant: f64) -> Self {
        Self {
            sun: 84.2,
            moon: 300.7,
            true_node: 312.4,
            mean_node: 313.9,
            cusps: (0..12).map(|i| (ascendant + 30.0 * i as f64).rem_euclid(360.0)).collect(),
            ascendant,
            fail_houses: false,
        }
    }
}

impl EphemerisProvider for StubEphemeris {
    fn longitude_of(&self, body: Body, _jd: JulianDay) -> Result<f64, EphemerisError> {
        Ok(match body {
            Body::Sun => self.sun,
            Body::Moon => self.moon,
            Body::TrueNode => self.true_node,
            Body::MeanNode => self.mean_node,
        })
    }

    fn house_cusps(
        &self,
        _jd: JulianDay,
        _location: &GeoCoordinate,
        system: HouseSystem,
    ) -> Result<HouseCusps, EphemerisError> {
        if self.fail_houses {
            return Err(EphemerisError::HouseCalculationFailed {
                message: "polar latitude".to_string(),
            });
        }
        Ok(HouseCusps {
            system,
            cusps: self.cusps.clone(),
            ascendant: self.ascendant,
            midheaven: (self.ascendant + 270.0).rem_euclid(360.0),
        })
    }
}

/// Geocoder that counts calls and answers from a fixed response.
pub struct CountingGeocoder {
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<String>>,
    pub answer: Option<GeoCoordinate>,
    pub fail: bool,
}

impl CountingGeocoder {
    pub fn answering(answer: Option<GeoCoordinate>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            answer,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::answering(None)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for CountingGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<GeoCoordinate>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(place.to_string());
        if self.fail {
            return Err(GeocodeError::Malformed("service unavailable".to_string()));
        }
        Ok(self.answer)
    }
}

/// Timezone lookup with a fixed answer.
pub struct FixedZone(pub Option<&'static str>);

impl TimezoneLookup for FixedZone {
    fn zone_name(&self, _location: &GeoCoordinate) -> Option<String> {
        self.0.map(str::to_string)
    }
}

pub fn london() -> GeoCoordinate {
    GeoCoordinate::new(51.5074, -0.1278).unwrap()
}
