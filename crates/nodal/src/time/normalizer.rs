use crate::ephemeris::{GeoCoordinate, JulianDay};
use crate::error::ChartError;
use crate::time::timezone::TimezoneLookup;
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;

/// Where the zone used for localisation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSource {
    Resolved,
    /// Lookup failed and the birth time was read as UTC. Every computed
    /// position is shifted by the true local offset when this happens.
    UtcFallback,
}

/// A local birth date and time pinned to an absolute instant.
///
/// The UTC instant is always derived from the local reading and zone, never
/// set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthMoment {
    local: NaiveDateTime,
    timezone: Tz,
    zone_source: ZoneSource,
    utc: DateTime<Utc>,
}

impl BirthMoment {
    pub fn new(local: NaiveDateTime, timezone: Tz, zone_source: ZoneSource) -> Self {
        let utc = localize(local, timezone);
        Self {
            local,
            timezone,
            zone_source,
            utc,
        }
    }

    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn zone_source(&self) -> ZoneSource {
        self.zone_source
    }

    pub fn utc_instant(&self) -> DateTime<Utc> {
        self.utc
    }

    pub fn julian_day(&self) -> JulianDay {
        JulianDay::from_utc(self.utc)
    }
}

/// Turns a naive local birth reading into an absolute instant.
pub struct TimeNormalizer {
    lookup: Arc<dyn TimezoneLookup>,
}

impl TimeNormalizer {
    pub fn new(lookup: Arc<dyn TimezoneLookup>) -> Self {
        Self { lookup }
    }

    pub fn normalize(
        &self,
        local_date: &str,
        local_time: &str,
        location: &GeoCoordinate,
    ) -> Result<BirthMoment, ChartError> {
        let date = parse_date(local_date)?;
        let time = parse_time(local_time)?;
        let (timezone, zone_source) = self.resolve_zone(location);

        let moment = BirthMoment::new(date.and_time(time), timezone, zone_source);
        debug!(
            "{} {} in {} -> {}",
            local_date,
            local_time,
            timezone.name(),
            moment.utc_instant()
        );
        Ok(moment)
    }

    fn resolve_zone(&self, location: &GeoCoordinate) -> (Tz, ZoneSource) {
        match self.lookup.zone_name(location) {
            Some(name) => match name.parse::<Tz>() {
                Ok(tz) => (tz, ZoneSource::Resolved),
                Err(e) => {
                    warn!("Unknown timezone '{}' for {}: {}; falling back to UTC", name, location, e);
                    (Tz::UTC, ZoneSource::UtcFallback)
                }
            },
            None => {
                warn!("No timezone found for {}; falling back to UTC", location);
                (Tz::UTC, ZoneSource::UtcFallback)
            }
        }
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ChartError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ChartError::InvalidInputFormat {
        field: "date",
        value: value.to_string(),
        expected: "YYYY-MM-DD",
    })
}

/// Parse a 24-hour `HH:MM` or `HH:MM:SS` time.
pub fn parse_time(value: &str) -> Result<NaiveTime, ChartError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ChartError::InvalidInputFormat {
            field: "time",
            value: value.to_string(),
            expected: "HH:MM (24-hour)",
        })
}

/// Read `local` as wall-clock time in `tz` using the rules in force on that
/// date.
///
/// A reading that occurs twice (clocks going back) resolves to the earlier
/// instant. A reading skipped by clocks going forward is read with the
/// offset in force before the transition.
pub fn localize(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before = tz
                .offset_from_utc_datetime(&(local - Duration::hours(24)))
                .fix()
                .local_minus_utc();
            Utc.from_utc_datetime(&(local - Duration::seconds(before as i64)))
        }
    }
}
