//! The delivery pipeline: one forecast email per subscribed location.
//!
//! For each location, in order: fetch the forecast text, wrap it in the
//! forecast template, hand it to the notification provider, and record the
//! outcome. A failure for one location never stops the others. The pipeline
//! does not retry; that belongs to the provider adapters, and deciding what
//! to do with a partially failed run belongs to the caller.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, ProviderError, Result,
  forecast::ForecastRequest,
  provider::{FORECAST_TEMPLATE, ForecastProvider, Notification, NotificationProvider},
  subscription::Subscription,
};

/// Per-location result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
  pub location: String,
  pub success:  bool,
  /// Present when `success` is false.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error:    Option<String>,
}

impl DeliveryOutcome {
  fn delivered(location: &str) -> Self {
    Self { location: location.to_owned(), success: true, error: None }
  }

  /// The full error goes to the log only; the outcome carries its summary.
  fn failed(id: Uuid, location: &str, stage: Stage, err: &ProviderError) -> Self {
    warn!(subscription_id = %id, %location, %stage, error = %err, "forecast delivery failed");
    Self {
      location: location.to_owned(),
      success:  false,
      error:    Some(format!("{stage}: {}", err.summary())),
    }
  }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
  Forecast,
  Notification,
}

impl std::fmt::Display for Stage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Stage::Forecast => "forecast",
      Stage::Notification => "notification",
    })
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

pub struct DeliveryPipeline<F, N> {
  forecasts:   Arc<F>,
  notifier:    Arc<N>,
  template_id: String,
}

impl<F, N> DeliveryPipeline<F, N>
where
  F: ForecastProvider,
  N: NotificationProvider,
{
  pub fn new(forecasts: Arc<F>, notifier: Arc<N>) -> Self {
    Self { forecasts, notifier, template_id: FORECAST_TEMPLATE.to_owned() }
  }

  /// Use `template_id` instead of [`FORECAST_TEMPLATE`] for forecast emails.
  pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
    self.template_id = template_id.into();
    self
  }

  /// The forecast provider, shared with the interactive endpoints.
  pub fn forecasts(&self) -> &F { &self.forecasts }

  pub fn template_id(&self) -> &str { &self.template_id }

  /// Deliver one notification per location of `subscription`.
  ///
  /// Returns exactly one outcome per location, in location order. The only
  /// error is a validation failure for a subscription with no locations,
  /// which the store should never have accepted.
  pub async fn deliver(&self, subscription: &Subscription) -> Result<Vec<DeliveryOutcome>> {
    let id = subscription.subscription_id;
    let details = &subscription.details;

    if details.locations.is_empty() {
      return Err(Error::Validation(format!("subscription {id} has no locations")));
    }

    let mut outcomes = Vec::with_capacity(details.locations.len());
    for location in &details.locations {
      let outcome = self.deliver_location(subscription, location).await;
      if outcome.success {
        info!(subscription_id = %id, %location, "forecast delivered");
      }
      outcomes.push(outcome);
    }

    let failed = outcomes.iter().filter(|o| !o.success).count();
    info!(
      subscription_id = %id,
      delivered = outcomes.len() - failed,
      failed,
      "subscription delivery finished"
    );
    Ok(outcomes)
  }

  async fn deliver_location(&self, subscription: &Subscription, location: &str) -> DeliveryOutcome {
    let id = subscription.subscription_id;
    let details = &subscription.details;
    let request = ForecastRequest::new(details.kind, location, details.window);

    let text = match self.forecasts.forecast(&request).await {
      Ok(text) => text,
      Err(e) => return DeliveryOutcome::failed(id, location, Stage::Forecast, &e),
    };

    let notification = Notification::forecast(&self.template_id, &details.email, text);
    match self.notifier.send(&notification).await {
      Ok(()) => DeliveryOutcome::delivered(location),
      Err(e) => DeliveryOutcome::failed(id, location, Stage::Notification, &e),
    }
  }
}
