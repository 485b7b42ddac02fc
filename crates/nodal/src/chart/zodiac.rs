//! Zodiac signs and placements.
//!
//! Every longitude is reduced onto the circle before a sign or degree is
//! taken from it, so any `L + 360k` yields the same placement as `L`.

use crate::ephemeris::normalize_degrees;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    /// Zodiac order, starting at 0 degrees Aries.
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    pub fn from_index(index: usize) -> Sign {
        Self::ALL[index % 12]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Sign {
        Sign::from_index(self.index() + 6)
    }

    pub fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Get sign index (0-11) and degree within sign (0 <= d < 30) from longitude
pub fn sign_and_degree(longitude: f64) -> (usize, f64) {
    let normalized = normalize_degrees(longitude);
    let degree = normalized % 30.0;
    // normalized - degree is an exact multiple of 30
    let index = ((normalized - degree) / 30.0).round() as usize % 12;
    (index, degree)
}

/// A body or point placed in the zodiac.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZodiacPlacement {
    /// Ecliptic longitude in `[0, 360)`
    pub longitude: f64,
    pub sign: Sign,
    pub degree_in_sign: f64,
    /// 1..=12, or `None` when the cusps did not allow an assignment
    pub house: Option<u8>,
}

impl ZodiacPlacement {
    pub fn from_longitude(longitude: f64) -> Self {
        let longitude = normalize_degrees(longitude);
        let (index, degree_in_sign) = sign_and_degree(longitude);
        Self {
            longitude,
            sign: Sign::from_index(index),
            degree_in_sign,
            house: None,
        }
    }

    pub fn with_house(mut self, house: Option<u8>) -> Self {
        self.house = house;
        self
    }

    /// The diametrically opposite point: opposite sign, same degree within
    /// sign, opposite house (undefined stays undefined).
    pub fn antipode(&self) -> Self {
        Self {
            longitude: normalize_degrees(self.longitude + 180.0),
            sign: self.sign.opposite(),
            degree_in_sign: self.degree_in_sign,
            house: self.house.map(opposite_house),
        }
    }
}

/// House across the chart: 1 <-> 7, 2 <-> 8, ... 6 <-> 12.
pub fn opposite_house(house: u8) -> u8 {
    ((house + 6 - 1) % 12) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_boundaries() {
        assert_eq!(ZodiacPlacement::from_longitude(0.0).sign, Sign::Aries);
        assert_eq!(ZodiacPlacement::from_longitude(29.999).sign, Sign::Aries);
        assert_eq!(ZodiacPlacement::from_longitude(30.0).sign, Sign::Taurus);
        assert_eq!(ZodiacPlacement::from_longitude(359.999).sign, Sign::Pisces);
        assert_eq!(ZodiacPlacement::from_longitude(-0.5).sign, Sign::Pisces);
    }

    #[test]
    fn test_sign_is_periodic() {
        for tenth in 0..3600 {
            let lon = tenth as f64 / 10.0 + 0.05;
            let base = ZodiacPlacement::from_longitude(lon).sign;
            for k in [-3i32, -1, 1, 2, 5] {
                let shifted = lon + 360.0 * k as f64;
                assert_eq!(ZodiacPlacement::from_longitude(shifted).sign, base, "lon {lon} k {k}");
            }
        }
    }

    #[test]
    fn test_degree_in_sign_range() {
        let samples = [0.0, 12.5, 29.9999999, 30.0, 180.25, 359.9999999, -1e-12, -720.3, 1e6];
        for lon in samples {
            let p = ZodiacPlacement::from_longitude(lon);
            assert!(p.degree_in_sign >= 0.0 && p.degree_in_sign < 30.0, "{lon} -> {}", p.degree_in_sign);
            assert!(p.longitude >= 0.0 && p.longitude < 360.0);
            let rebuilt = p.sign.index() as f64 * 30.0 + p.degree_in_sign;
            assert!((rebuilt - p.longitude).abs() < 1e-9);
        }
    }

    #[test]
    fn test_antipode_for_every_sign() {
        for index in 0..12 {
            let lon = index as f64 * 30.0 + 17.25;
            let north = ZodiacPlacement::from_longitude(lon).with_house(Some(3));
            let south = north.antipode();
            assert_eq!(south.sign.index(), (north.sign.index() + 6) % 12);
            assert_eq!(south.degree_in_sign, north.degree_in_sign);
            assert_eq!(south.house, Some(9));
        }
    }

    #[test]
    fn test_opposite_house() {
        let expected = [7, 8, 9, 10, 11, 12, 1, 2, 3, 4, 5, 6];
        for (house, want) in (1..=12u8).zip(expected) {
            assert_eq!(opposite_house(house), want);
        }
    }

    #[test]
    fn test_antipode_keeps_undefined_house() {
        let north = ZodiacPlacement::from_longitude(100.0);
        assert_eq!(north.antipode().house, None);
    }

    #[test]
    fn test_placement_json_keys_are_snake_case() {
        let json = serde_json::to_value(ZodiacPlacement::from_longitude(95.5).with_house(Some(4))).unwrap();
        assert_eq!(json["sign"], "Cancer");
        assert_eq!(json["degree_in_sign"], 5.5);
        assert_eq!(json["house"], 4);
        assert!(json.get("degreeInSign").is_none());
    }
}
