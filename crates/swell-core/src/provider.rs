//! Narrow interfaces to the two external services.
//!
//! Both providers are opaque: the forecast provider turns a request into free
//! text, the notification provider delivers a templated message. Adapters
//! live in `swell-providers`; retries and timeouts are their business.

use std::{future::Future, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  ProviderError,
  forecast::{FollowUpRequest, ForecastRequest},
};

/// Template used for per-location forecast emails unless configured otherwise.
pub const FORECAST_TEMPLATE: &str = "forecast-email";

// ─── Forecast text ───────────────────────────────────────────────────────────

/// Produces descriptive forecast text for a location.
pub trait ForecastProvider: Send + Sync {
  /// Generate a forecast for `request`.
  fn forecast<'a>(
    &'a self,
    request: &'a ForecastRequest,
  ) -> impl Future<Output = Result<String, ProviderError>> + Send + 'a;

  /// Answer a question about a forecast that was already produced. The
  /// request carries the full prior forecast; the provider is stateless.
  fn follow_up<'a>(
    &'a self,
    request: &'a FollowUpRequest,
  ) -> impl Future<Output = Result<String, ProviderError>> + Send + 'a;
}

impl<T: ForecastProvider> ForecastProvider for Arc<T> {
  fn forecast<'a>(
    &'a self,
    request: &'a ForecastRequest,
  ) -> impl Future<Output = Result<String, ProviderError>> + Send + 'a {
    (**self).forecast(request)
  }

  fn follow_up<'a>(
    &'a self,
    request: &'a FollowUpRequest,
  ) -> impl Future<Output = Result<String, ProviderError>> + Send + 'a {
    (**self).follow_up(request)
  }
}

// ─── Notification delivery ───────────────────────────────────────────────────

/// A templated message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
  pub recipient:   String,
  pub template_id: String,
  pub variables:   Map<String, Value>,
}

impl Notification {
  /// The per-location forecast email. The recipient's address doubles as the
  /// `username` placeholder; there is no separate display name.
  pub fn forecast(
    template_id: impl Into<String>,
    recipient: impl Into<String>,
    forecast: impl Into<String>,
  ) -> Self {
    let recipient = recipient.into();
    let mut variables = Map::new();
    variables.insert("username".into(), Value::String(recipient.clone()));
    variables.insert("forecast".into(), Value::String(forecast.into()));
    Self { recipient, template_id: template_id.into(), variables }
  }
}

/// Delivers a [`Notification`].
pub trait NotificationProvider: Send + Sync {
  fn send<'a>(
    &'a self,
    notification: &'a Notification,
  ) -> impl Future<Output = Result<(), ProviderError>> + Send + 'a;
}

impl<T: NotificationProvider> NotificationProvider for Arc<T> {
  fn send<'a>(
    &'a self,
    notification: &'a Notification,
  ) -> impl Future<Output = Result<(), ProviderError>> + Send + 'a {
    (**self).send(notification)
  }
}
