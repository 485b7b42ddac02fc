//! Read-only place name to coordinate cache, consulted before any network
//! geocoding.
//!
//! Built once at startup from a city dataset (CSV with `city`, `admin_name`,
//! `country`, `lat`, `lng` and optional `population` columns) and shared
//! read-only afterwards.

use crate::ephemeris::GeoCoordinate;
use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref COMMA: Regex = Regex::new(r"\s*,\s*").unwrap();
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid city dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("City '{city}' has out-of-range coordinates ({lat}, {lon})")]
    InvalidCoordinate { city: String, lat: f64, lon: f64 },
}

/// Normalize a place description to `city, [state,] country` form for
/// matching: lowercase, diacritics stripped, whitespace collapsed, one
/// space after each comma, empty components dropped.
pub fn normalize_place(place: &str) -> String {
    let folded: String = place
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    let collapsed = WHITESPACE.replace_all(folded.trim(), " ");
    COMMA
        .split(&collapsed)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq)]
struct CacheEntry {
    coordinate: GeoCoordinate,
    population: u64,
}

#[derive(Debug, Deserialize)]
struct CityRow {
    city: String,
    #[serde(default)]
    admin_name: String,
    country: String,
    lat: f64,
    lng: f64,
    #[serde(default, deserialize_with = "lenient_population")]
    population: u64,
}

/// Blank or malformed population values count as zero.
fn lenient_population<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
        .map(|p| p as u64)
        .unwrap_or(0))
}

#[derive(Debug, Clone, Default)]
pub struct CoordinateCache {
    entries: BTreeMap<String, CacheEntry>,
}

impl CoordinateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from literal `("city, country", coordinate)` pairs.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, GeoCoordinate)>) -> Self {
        let mut cache = Self::new();
        for (place, coordinate) in entries {
            cache.insert(place, coordinate, 0);
        }
        cache
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        let reader = csv::Reader::from_path(path)?;
        let cache = Self::from_csv(reader)?;
        info!("Loaded {} place keys from {}", cache.len(), path.display());
        Ok(cache)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CacheError> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, CacheError> {
        let mut cache = Self::new();
        for row in reader.deserialize::<CityRow>() {
            let row = row?;
            let coordinate = GeoCoordinate::new(row.lat, row.lng).ok_or_else(|| {
                CacheError::InvalidCoordinate {
                    city: row.city.clone(),
                    lat: row.lat,
                    lon: row.lng,
                }
            })?;
            cache.insert(&format!("{}, {}", row.city, row.country), coordinate, row.population);
            if !row.admin_name.trim().is_empty() {
                cache.insert(
                    &format!("{}, {}, {}", row.city, row.admin_name, row.country),
                    coordinate,
                    row.population,
                );
            }
        }
        Ok(cache)
    }

    /// Duplicate keys keep the most populous place.
    fn insert(&mut self, place: &str, coordinate: GeoCoordinate, population: u64) {
        let key = normalize_place(place);
        if key.is_empty() {
            return;
        }
        let entry = CacheEntry {
            coordinate,
            population,
        };
        match self.entries.get(&key) {
            Some(existing) if existing.population >= population => {}
            _ => {
                self.entries.insert(key, entry);
            }
        }
    }

    /// Look a place up by normalized key.
    ///
    /// An exact key match wins. Otherwise any key that contains the query,
    /// or is contained in it, is a candidate; the most populous candidate is
    /// returned, ties going to the alphabetically first key. This permissive
    /// match can return the wrong city for ambiguous names ("York" also
    /// matches "New York").
    pub fn lookup(&self, place: &str) -> Option<GeoCoordinate> {
        let query = normalize_place(place);
        if query.is_empty() {
            return None;
        }
        if let Some(entry) = self.entries.get(&query) {
            return Some(entry.coordinate);
        }

        let mut best: Option<&CacheEntry> = None;
        for (key, entry) in &self.entries {
            if !(key.contains(&query) || query.contains(key.as_str())) {
                continue;
            }
            if best.map_or(true, |b| entry.population > b.population) {
                best = Some(entry);
            }
        }
        best.map(|entry| entry.coordinate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
