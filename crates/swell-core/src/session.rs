//! Interactive forecast session: one ad-hoc forecast plus follow-ups.
//!
//! ```text
//! Idle ──begin_forecast──▶ Loading ──ok──▶ ShowingForecast ◀─┐
//!   ▲                         │                 │             │
//!   └─────────err─────────────┘          begin_follow_up      │ ok / err
//!                                               ▼             │
//!                                        LoadingFollowUp ─────┘
//! ```
//!
//! Calls are split into `begin_*` and `finish_*` so a UI can run the provider
//! call on another task and keep drawing while the session reports busy.
//! [`ForecastSession::submit`] and [`ForecastSession::ask`] drive both halves
//! in one go.

use thiserror::Error;
use tracing::warn;

use crate::{
  ProviderError,
  forecast::{FollowUpRequest, ForecastRequest},
  provider::ForecastProvider,
};

pub const FORECAST_FAILED: &str = "Error fetching forecast. Please try again.";
pub const FOLLOW_UP_FAILED: &str = "Error fetching response. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
  /// A provider call is already outstanding.
  #[error("a request is already in progress")]
  Busy,
  #[error("please enter a location")]
  EmptyLocation,
  #[error("please enter a question")]
  EmptyQuestion,
  /// Follow-ups need a forecast on screen.
  #[error("there is no forecast to ask about")]
  NoForecast,
}

// ─── State ───────────────────────────────────────────────────────────────────

/// A follow-up question together with the provider's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpAnswer {
  pub question: String,
  pub answer:   String,
}

/// The forecast currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownForecast {
  pub request:   ForecastRequest,
  pub text:      String,
  pub follow_up: Option<FollowUpAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
  #[default]
  Idle,
  Loading {
    request: ForecastRequest,
  },
  ShowingForecast(ShownForecast),
  LoadingFollowUp {
    shown:    ShownForecast,
    question: String,
  },
}

#[derive(Debug, Default)]
pub struct ForecastSession {
  state: SessionState,
  /// Short user-facing message from the last failed action.
  error: Option<String>,
}

impl ForecastSession {
  pub fn new() -> Self { Self::default() }

  pub fn state(&self) -> &SessionState { &self.state }

  pub fn error(&self) -> Option<&str> { self.error.as_deref() }

  /// True while a provider call is outstanding; the UI disables its submit
  /// controls.
  pub fn is_busy(&self) -> bool {
    matches!(self.state, SessionState::Loading { .. } | SessionState::LoadingFollowUp { .. })
  }

  /// The forecast on screen, if any (still shown while a follow-up loads).
  pub fn shown(&self) -> Option<&ShownForecast> {
    match &self.state {
      SessionState::ShowingForecast(shown) | SessionState::LoadingFollowUp { shown, .. } => {
        Some(shown)
      }
      _ => None,
    }
  }

  // ── Initial forecast ───────────────────────────────────────────────────

  /// Start a new forecast, discarding any forecast and follow-up on screen.
  ///
  /// Returns the request to hand to the provider.
  pub fn begin_forecast(&mut self, request: ForecastRequest) -> Result<ForecastRequest, SessionError> {
    if self.is_busy() {
      return Err(SessionError::Busy);
    }
    if request.location.trim().is_empty() {
      return Err(SessionError::EmptyLocation);
    }
    self.error = None;
    self.state = SessionState::Loading { request: request.clone() };
    Ok(request)
  }

  /// Apply the provider's answer to the pending forecast. Ignored unless a
  /// forecast is loading.
  pub fn finish_forecast(&mut self, result: Result<String, ProviderError>) {
    let state = std::mem::take(&mut self.state);
    let SessionState::Loading { request } = state else {
      self.state = state;
      return;
    };
    match result {
      Ok(text) => {
        self.state = SessionState::ShowingForecast(ShownForecast { request, text, follow_up: None });
      }
      Err(e) => {
        warn!(location = %request.location, error = %e, "forecast request failed");
        self.error = Some(FORECAST_FAILED.to_owned());
        self.state = SessionState::Idle;
      }
    }
  }

  // ── Follow-ups ─────────────────────────────────────────────────────────

  /// Start a follow-up question about the forecast on screen.
  pub fn begin_follow_up(&mut self, question: &str) -> Result<FollowUpRequest, SessionError> {
    if self.is_busy() {
      return Err(SessionError::Busy);
    }
    let question = question.trim();
    if question.is_empty() {
      return Err(SessionError::EmptyQuestion);
    }
    let SessionState::ShowingForecast(shown) = std::mem::take(&mut self.state) else {
      return Err(SessionError::NoForecast);
    };

    let request = FollowUpRequest {
      forecast:       shown.request.clone(),
      prior_forecast: shown.text.clone(),
      question:       question.to_owned(),
    };
    self.error = None;
    self.state = SessionState::LoadingFollowUp { shown, question: question.to_owned() };
    Ok(request)
  }

  /// Apply the provider's answer to the pending follow-up. A failure keeps the
  /// forecast on screen and drops any previous answer.
  pub fn finish_follow_up(&mut self, result: Result<String, ProviderError>) {
    let state = std::mem::take(&mut self.state);
    let SessionState::LoadingFollowUp { mut shown, question } = state else {
      self.state = state;
      return;
    };
    match result {
      Ok(answer) => shown.follow_up = Some(FollowUpAnswer { question, answer }),
      Err(e) => {
        warn!(location = %shown.request.location, error = %e, "follow-up request failed");
        self.error = Some(FOLLOW_UP_FAILED.to_owned());
        shown.follow_up = None;
      }
    }
    self.state = SessionState::ShowingForecast(shown);
  }

  // ── One-shot drivers ───────────────────────────────────────────────────

  pub async fn submit<P: ForecastProvider>(
    &mut self,
    provider: &P,
    request: ForecastRequest,
  ) -> Result<(), SessionError> {
    let request = self.begin_forecast(request)?;
    let result = provider.forecast(&request).await;
    self.finish_forecast(result);
    Ok(())
  }

  pub async fn ask<P: ForecastProvider>(&mut self, provider: &P, question: &str) -> Result<(), SessionError> {
    let request = self.begin_follow_up(question)?;
    let result = provider.follow_up(&request).await;
    self.finish_follow_up(result);
    Ok(())
  }
}
