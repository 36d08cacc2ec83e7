//! Handlers for the ad-hoc forecast endpoints.
//!
//! Both return `{"text": "..."}` on success. The provider used here is the
//! one the delivery pipeline uses.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use swell_core::{
  forecast::{FollowUpRequest, ForecastRequest},
  provider::{ForecastProvider, NotificationProvider},
  store::SubscriptionStore,
};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastText {
  pub text: String,
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
  if value.trim().is_empty() {
    return Err(ApiError::Unprocessable(format!("{field} must not be empty")));
  }
  Ok(())
}

/// `POST /forecast`; body is a [`ForecastRequest`].
pub async fn forecast<S, F, N>(
  State(state): State<ApiState<S, F, N>>,
  Json(request): Json<ForecastRequest>,
) -> Result<Json<ForecastText>, ApiError>
where
  S: SubscriptionStore,
  F: ForecastProvider,
  N: NotificationProvider,
{
  require("location", &request.location)?;
  let text = state
    .pipeline
    .forecasts()
    .forecast(&request)
    .await
    .map_err(ApiError::Provider)?;
  Ok(Json(ForecastText { text }))
}

/// `POST /forecast/follow-up`; body is a [`FollowUpRequest`].
pub async fn follow_up<S, F, N>(
  State(state): State<ApiState<S, F, N>>,
  Json(request): Json<FollowUpRequest>,
) -> Result<Json<ForecastText>, ApiError>
where
  S: SubscriptionStore,
  F: ForecastProvider,
  N: NotificationProvider,
{
  require("location", &request.forecast.location)?;
  require("prior_forecast", &request.prior_forecast)?;
  require("question", &request.question)?;
  let text = state
    .pipeline
    .forecasts()
    .follow_up(&request)
    .await
    .map_err(ApiError::Provider)?;
  Ok(Json(ForecastText { text }))
}
