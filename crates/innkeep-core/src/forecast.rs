//! Occupancy-forecast contract.
//!
//! The generator itself is an external collaborator (an AI model behind
//! someone else's API); this module owns only its input/output contract:
//! historical occupancy as a dated CSV-like text blob plus free-text
//! booking-trend notes in, a dated occupancy series plus an explanation out.
//!
//! The wire form of the series is a JSON array of `{date, occupancyRate}`
//! pairs. Generators are not fully trusted to honour that: a malformed or
//! unparsable blob decodes to an empty series, never an error.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point of a forecast series. `occupancy_rate` is a percentage in
/// `[0, 100]` per the generator's contract; this module does not clamp it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
  pub date: NaiveDate,
  #[serde(rename = "occupancyRate")]
  pub occupancy_rate: f64,
}

/// A forecast series with the generator's free-text reasoning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
  pub points:      Vec<ForecastPoint>,
  pub explanation: String,
}

/// Decode a generator's JSON series, tolerantly: anything that is not a
/// well-formed array of points yields an empty series.
pub fn parse_points(raw: &str) -> Vec<ForecastPoint> {
  serde_json::from_str(raw).unwrap_or_default()
}

/// An occupancy forecast generator.
///
/// `history` is the dated CSV-like occupancy blob, `notes` free-text
/// booking-trend context, `horizon_days` how far ahead to project.
pub trait OccupancyForecaster: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn forecast<'a>(
    &'a self,
    history: &'a str,
    notes: &'a str,
    horizon_days: u32,
  ) -> impl Future<Output = Result<Forecast, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::parse_points;

  #[test]
  fn parses_well_formed_series() {
    let raw = r#"[
      {"date": "2024-03-01", "occupancyRate": 72.5},
      {"date": "2024-03-02", "occupancyRate": 80.0}
    ]"#;
    let points = parse_points(raw);
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].occupancy_rate, 72.5);
    assert_eq!(points[1].date.to_string(), "2024-03-02");
  }

  #[test]
  fn malformed_blob_decodes_to_empty() {
    assert!(parse_points("the model apologises instead of answering").is_empty());
    assert!(parse_points("{\"date\": \"2024-03-01\"}").is_empty());
    assert!(parse_points("").is_empty());
  }

  #[test]
  fn array_with_bad_entry_decodes_to_empty() {
    // All-or-nothing: one bad element poisons the whole series.
    let raw = r#"[{"date": "2024-03-01", "occupancyRate": 72.5}, {"date": 4}]"#;
    assert!(parse_points(raw).is_empty());
  }
}
