//! Recording provider doubles and fixtures for deterministic tests.
//!
//! Enabled inside this crate's tests and, for downstream crates, through the
//! `mock` feature.

use std::{
  collections::{HashSet, VecDeque},
  sync::Mutex,
};

use crate::{
  ProviderError,
  forecast::{FollowUpRequest, ForecastKind, ForecastRequest, LookoutWindow},
  provider::{ForecastProvider, Notification, NotificationProvider},
  subscription::{DeliveryDay, DeliveryTime, Frequency, NewSubscription},
};

/// A valid daily surf subscription for `a@b.com` covering `locations`.
pub fn subscription(locations: &[&str]) -> NewSubscription {
  NewSubscription {
    locations:     locations.iter().map(|l| l.to_string()).collect(),
    kind:          ForecastKind::Surf,
    frequency:     Frequency::Daily,
    window:        LookoutWindow::Next3Days,
    delivery_day:  DeliveryDay::Monday,
    delivery_time: DeliveryTime::default(),
    email:         "a@b.com".into(),
  }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
  m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ─── Forecast provider ───────────────────────────────────────────────────────

/// Answers every request with deterministic text and records what it saw.
///
/// Queued replies (see [`with_replies`](Self::with_replies)) are returned
/// first, in order; after that the canned text is generated from the request.
#[derive(Default)]
pub struct MockForecasts {
  failing:    HashSet<String>,
  replies:    Mutex<VecDeque<Result<String, ProviderError>>>,
  requests:   Mutex<Vec<ForecastRequest>>,
  follow_ups: Mutex<Vec<FollowUpRequest>>,
}

impl MockForecasts {
  pub fn new() -> Self { Self::default() }

  /// Fail every request whose location equals one of `locations`.
  pub fn failing_for(locations: &[&str]) -> Self {
    Self {
      failing: locations.iter().map(|l| l.to_string()).collect(),
      ..Self::default()
    }
  }

  pub fn with_replies(replies: Vec<Result<String, ProviderError>>) -> Self {
    Self { replies: Mutex::new(replies.into()), ..Self::default() }
  }

  /// The text a successful request for `request` yields when no reply is
  /// queued.
  pub fn text_for(request: &ForecastRequest) -> String {
    format!(
      "{} forecast for {} over the {}",
      request.kind,
      request.location,
      request.window.phrase()
    )
  }

  pub fn requests(&self) -> Vec<ForecastRequest> { lock(&self.requests).clone() }

  pub fn follow_ups(&self) -> Vec<FollowUpRequest> { lock(&self.follow_ups).clone() }

  fn respond(&self, request: &ForecastRequest, canned: String) -> Result<String, ProviderError> {
    if let Some(reply) = lock(&self.replies).pop_front() {
      return reply;
    }
    if self.failing.contains(&request.location) {
      return Err(ProviderError::Status {
        provider: "mock",
        status:   503,
        body:     format!("no data for {}", request.location),
      });
    }
    Ok(canned)
  }
}

impl ForecastProvider for MockForecasts {
  async fn forecast(&self, request: &ForecastRequest) -> Result<String, ProviderError> {
    lock(&self.requests).push(request.clone());
    self.respond(request, Self::text_for(request))
  }

  async fn follow_up(&self, request: &FollowUpRequest) -> Result<String, ProviderError> {
    lock(&self.follow_ups).push(request.clone());
    self.respond(&request.forecast, format!("answer to {:?}", request.question))
  }
}

// ─── Notification provider ───────────────────────────────────────────────────

/// Records every delivered notification; can be told to fail some of them.
#[derive(Default)]
pub struct MockNotifier {
  fail_containing: Option<String>,
  sent:            Mutex<Vec<Notification>>,
}

impl MockNotifier {
  pub fn new() -> Self { Self::default() }

  /// Fail any notification whose `forecast` variable contains `needle`.
  pub fn failing_when_forecast_contains(needle: &str) -> Self {
    Self { fail_containing: Some(needle.to_string()), ..Self::default() }
  }

  pub fn sent(&self) -> Vec<Notification> { lock(&self.sent).clone() }
}

impl NotificationProvider for MockNotifier {
  async fn send(&self, notification: &Notification) -> Result<(), ProviderError> {
    if let Some(needle) = &self.fail_containing {
      let hit = notification
        .variables
        .get("forecast")
        .and_then(|v| v.as_str())
        .is_some_and(|f| f.contains(needle.as_str()));
      if hit {
        return Err(ProviderError::Rejected {
          provider: "mock",
          message:  "template rendering failed".into(),
        });
      }
    }
    lock(&self.sent).push(notification.clone());
    Ok(())
  }
}
