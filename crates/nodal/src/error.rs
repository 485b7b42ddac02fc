use crate::ephemeris::EphemerisError;
use thiserror::Error;

/// Failures that end a chart request. Chart computation is all-or-nothing:
/// any of these means no `ChartResult` was produced.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Could not geocode location: {place}{}", reason_suffix(.reason))]
    LocationNotFound {
        place: String,
        reason: Option<String>,
    },
    #[error("Invalid {field} '{value}': expected {expected}")]
    InvalidInputFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("Ephemeris computation failed: {0}")]
    EphemerisComputation(#[from] EphemerisError),
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(" ({r})"),
        None => String::new(),
    }
}

impl ChartError {
    pub fn location_not_found(place: impl Into<String>) -> Self {
        ChartError::LocationNotFound {
            place: place.into(),
            reason: None,
        }
    }
}
