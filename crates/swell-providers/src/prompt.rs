//! Persona prompts sent to the language model.
//!
//! Each forecast kind has its own expert persona. Prompts are rendered
//! against a caller-supplied "today" so the three-day window can name the
//! actual days it covers.

use chrono::Weekday;
use swell_core::forecast::{FollowUpRequest, ForecastKind, ForecastRequest, LookoutWindow};

fn weekday_name(day: Weekday) -> &'static str {
  match day {
    Weekday::Mon => "Monday",
    Weekday::Tue => "Tuesday",
    Weekday::Wed => "Wednesday",
    Weekday::Thu => "Thursday",
    Weekday::Fri => "Friday",
    Weekday::Sat => "Saturday",
    Weekday::Sun => "Sunday",
  }
}

/// `"Friday, Saturday, Sunday"` for a `today` of Friday.
pub fn next_three_days(today: Weekday) -> String {
  [today, today.succ(), today.succ().succ()]
    .map(weekday_name)
    .join(", ")
}

fn timeframe(window: LookoutWindow, today: Weekday) -> String {
  match window {
    LookoutWindow::Next3Days => format!("{} ({})", window.phrase(), next_three_days(today)),
    LookoutWindow::NextWeek => window.phrase().to_owned(),
  }
}

fn persona(kind: ForecastKind) -> &'static str {
  match kind {
    ForecastKind::Surf => "You are an expert surf report and forecaster.",
    ForecastKind::Kitesurf => "You are a kitesurfing wind analysis expert.",
  }
}

pub fn forecast_prompt(request: &ForecastRequest, today: Weekday) -> String {
  let persona = persona(request.kind);
  let location = &request.location;
  let when = timeframe(request.window, today);
  match request.kind {
    ForecastKind::Surf => format!(
      "{persona} Provide a detailed surf forecast for {location} for the {when}. Include details \
       on the swell size, wind direction, swell period and tides for each day. Give the user \
       advice on the best time to surf based on the forecast and your knowledge of the location."
    ),
    ForecastKind::Kitesurf => format!(
      "{persona} Give the user a summary of the conditions at {location} for the {when}. The \
       wind direction needs to be onshore or cross-shore for safety and wind above 15 knots is \
       good. Include details on the wind speed, wind gusts, wind direction, swell height and \
       tides for each day. Provide the best day and time to kitesurf. Add emojis to the report."
    ),
  }
}

pub fn follow_up_prompt(request: &FollowUpRequest, today: Weekday) -> String {
  let f = &request.forecast;
  let persona = persona(f.kind);
  let location = &f.location;
  let when = timeframe(f.window, today);
  let prior = &request.prior_forecast;
  let question = &request.question;
  let (sport, instructions) = match f.kind {
    ForecastKind::Surf => (
      "surf",
      "maintaining your role as a surfing expert and providing detailed information about \
       swell, wind and tides if relevant",
    ),
    ForecastKind::Kitesurf => (
      "kitesurfing",
      "maintaining your role as a kitesurfing expert and including relevant emojis",
    ),
  };
  format!(
    "{persona} Given the following {sport} forecast for {location} for the {when}:\n\n{prior}\n\n\
     Please answer the following follow-up question, {instructions}:\n{question}"
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn three_days_wrap_around_the_week() {
    assert_eq!(next_three_days(Weekday::Mon), "Monday, Tuesday, Wednesday");
    assert_eq!(next_three_days(Weekday::Sat), "Saturday, Sunday, Monday");
  }

  #[test]
  fn surf_prompt_names_location_and_days() {
    let req = ForecastRequest::new(ForecastKind::Surf, "Bali", LookoutWindow::Next3Days);
    let p = forecast_prompt(&req, Weekday::Fri);
    assert!(p.starts_with("You are an expert surf report and forecaster."));
    assert!(p.contains("for Bali for the next three days (Friday, Saturday, Sunday)"));
    assert!(p.contains("swell period"));
  }

  #[test]
  fn kitesurf_prompt_for_the_coming_week() {
    let req = ForecastRequest::new(ForecastKind::Kitesurf, "Tarifa", LookoutWindow::NextWeek);
    let p = forecast_prompt(&req, Weekday::Mon);
    assert!(p.starts_with("You are a kitesurfing wind analysis expert."));
    assert!(p.contains("at Tarifa for the coming week."));
    assert!(p.contains("15 knots"));
    assert!(!p.contains("Monday"));
  }

  #[test]
  fn follow_up_embeds_prior_forecast_and_question() {
    let req = FollowUpRequest {
      forecast:       ForecastRequest::new(ForecastKind::Surf, "Bali", LookoutWindow::NextWeek),
      prior_forecast: "Monday: 4ft offshore".into(),
      question:       "Is Tuesday better?".into(),
    };
    let p = follow_up_prompt(&req, Weekday::Mon);
    assert!(p.contains("following surf forecast for Bali for the coming week:"));
    assert!(p.contains("\n\nMonday: 4ft offshore\n\n"));
    assert!(p.ends_with("relevant:\nIs Tuesday better?"));
  }
}
