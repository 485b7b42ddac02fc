//! Julian Day (UT) conversion.
//!
//! The ephemeris takes time as a continuous day count. Conversion is done
//! here rather than through the ephemeris library so it can be checked
//! without ephemeris data files present.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;

/// Julian Day of the Unix epoch, 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Day of J2000.0, 2000-01-01T12:00:00Z.
pub const J2000_JD: f64 = 2_451_545.0;

/// A Julian Day number in Universal Time.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct JulianDay(pub f64);

impl JulianDay {
    /// Proleptic Gregorian calendar date plus decimal hours to Julian Day
    /// (Meeus, Astronomical Algorithms, ch. 7).
    pub fn from_calendar(year: i32, month: u32, day: u32, hour_decimal: f64) -> Self {
        let (y, m) = if month <= 2 {
            (year - 1, month + 12)
        } else {
            (year, month)
        };
        let a = (y as f64 / 100.0).floor();
        let b = 2.0 - a + (a / 4.0).floor();
        let jd = (365.25 * (y as f64 + 4716.0)).floor()
            + (30.6001 * (m as f64 + 1.0)).floor()
            + day as f64
            + b
            - 1524.5;
        JulianDay(jd + hour_decimal / 24.0)
    }

    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        let hour_decimal = dt.hour() as f64
            + dt.minute() as f64 / 60.0
            + dt.second() as f64 / 3600.0
            + dt.nanosecond() as f64 / 3.6e12;
        Self::from_calendar(dt.year(), dt.month(), dt.day(), hour_decimal)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for JulianDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JD {:.6}", self.0)
    }
}
