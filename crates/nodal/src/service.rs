use crate::chart::{ChartCalculator, ChartResult};
use crate::error::ChartError;
use crate::location::LocationResolver;
use crate::time::{parse_date, parse_time, TimeNormalizer};
use log::info;
use serde::{Deserialize, Serialize};

fn default_time() -> String {
    "12:00".to_string()
}

/// One chart request as received from a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    /// `YYYY-MM-DD`
    pub date: String,
    /// 24-hour local `HH:MM`, noon when absent
    #[serde(default = "default_time")]
    pub time: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: String,
}

impl ChartRequest {
    /// `city, state, country`, or `city, country` without a state.
    pub fn full_location(&self) -> String {
        match self.state.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(state) => format!("{}, {}, {}", self.city, state, self.country),
            None => format!("{}, {}", self.city, self.country),
        }
    }
}

/// Place resolution, time normalization and chart computation for one
/// request, in that order. Built once at startup; shareable across tasks.
pub struct NatalChartService {
    resolver: LocationResolver,
    normalizer: TimeNormalizer,
    calculator: ChartCalculator,
}

impl NatalChartService {
    pub fn new(resolver: LocationResolver, normalizer: TimeNormalizer, calculator: ChartCalculator) -> Self {
        Self {
            resolver,
            normalizer,
            calculator,
        }
    }

    pub fn calculator(&self) -> &ChartCalculator {
        &self.calculator
    }

    pub async fn chart(&self, request: &ChartRequest) -> Result<ChartResult, ChartError> {
        // Reject malformed input before spending a network round trip on it.
        parse_date(&request.date)?;
        parse_time(&request.time)?;

        let place = request.full_location();
        let location = self.resolver.resolve(&place).await?;
        let moment = self.normalizer.normalize(&request.date, &request.time, &location)?;
        let chart = self.calculator.compute_chart(&moment, &location)?;

        info!(
            "Chart for '{}' at {} ({}): north node {} {:.2}",
            place,
            moment.utc_instant(),
            moment.timezone().name(),
            chart.north_node.sign,
            chart.north_node.degree_in_sign
        );
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_location() {
        let mut request = ChartRequest {
            date: "1990-06-15".to_string(),
            time: "14:30".to_string(),
            city: "Portland".to_string(),
            state: Some("Oregon".to_string()),
            country: "USA".to_string(),
        };
        assert_eq!(request.full_location(), "Portland, Oregon, USA");
        request.state = Some("  ".to_string());
        assert_eq!(request.full_location(), "Portland, USA");
        request.state = None;
        assert_eq!(request.full_location(), "Portland, USA");
    }

    #[test]
    fn test_request_time_defaults_to_noon() {
        let request: ChartRequest =
            serde_json::from_str(r#"{"date": "1990-06-15", "city": "London", "country": "UK"}"#).unwrap();
        assert_eq!(request.time, "12:00");
        assert_eq!(request.state, None);
    }
}
