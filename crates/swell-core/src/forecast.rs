//! Forecast request types shared by the pipeline, the interactive session and
//! the provider adapters.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// The sport a forecast is written for. Selects the provider's expert persona.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ForecastKind {
  #[default]
  Surf,
  Kitesurf,
}

/// How far ahead a forecast looks.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum LookoutWindow {
  #[default]
  #[serde(rename = "next_3_days")]
  #[strum(to_string = "next_3_days", serialize = "3days")]
  Next3Days,
  #[serde(rename = "next_week")]
  #[strum(to_string = "next_week", serialize = "week")]
  NextWeek,
}

impl LookoutWindow {
  /// The phrasing the forecast text provider expects for this window.
  pub fn phrase(self) -> &'static str {
    match self {
      Self::Next3Days => "next three days",
      Self::NextWeek => "coming week",
    }
  }

  /// Human label used by the UI toggles.
  pub fn label(self) -> &'static str {
    match self {
      Self::Next3Days => "Next 3 Days",
      Self::NextWeek => "Coming Week",
    }
  }
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// A single (kind, location, window) forecast request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
  pub kind:     ForecastKind,
  pub location: String,
  pub window:   LookoutWindow,
}

impl ForecastRequest {
  pub fn new(kind: ForecastKind, location: impl Into<String>, window: LookoutWindow) -> Self {
    Self { kind, location: location.into(), window }
  }
}

/// A follow-up question about a forecast that was already shown.
///
/// The provider keeps no conversational memory, so the full prior forecast
/// text travels with every follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpRequest {
  #[serde(flatten)]
  pub forecast:       ForecastRequest,
  pub prior_forecast: String,
  pub question:       String,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use super::*;

  #[test]
  fn window_phrases() {
    assert_eq!(LookoutWindow::Next3Days.phrase(), "next three days");
    assert_eq!(LookoutWindow::NextWeek.phrase(), "coming week");
  }

  #[test]
  fn window_parses_both_spellings() {
    assert_eq!(LookoutWindow::from_str("next_3_days").unwrap(), LookoutWindow::Next3Days);
    assert_eq!(LookoutWindow::from_str("3days").unwrap(), LookoutWindow::Next3Days);
    assert_eq!(LookoutWindow::from_str("NEXT_WEEK").unwrap(), LookoutWindow::NextWeek);
    assert!(LookoutWindow::from_str("fortnight").is_err());
  }

  #[test]
  fn kind_round_trips_through_json() {
    let json = serde_json::to_string(&ForecastKind::Kitesurf).unwrap();
    assert_eq!(json, "\"kitesurf\"");
    assert_eq!(ForecastKind::from_str("Surf").unwrap(), ForecastKind::Surf);
  }

  #[test]
  fn follow_up_request_flattens_forecast_fields() {
    let req = FollowUpRequest {
      forecast:       ForecastRequest::new(ForecastKind::Surf, "Bali", LookoutWindow::NextWeek),
      prior_forecast: "Monday: 4ft".into(),
      question:       "Best tide?".into(),
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["location"], "Bali");
    assert_eq!(value["window"], "next_week");
    assert_eq!(value["prior_forecast"], "Monday: 4ft");
  }
}
