//! Handlers for `/subscriptions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/subscriptions` | Insertion order |
//! | `POST`   | `/subscriptions` | 201 with the stored record, 422 if invalid |
//! | `GET`    | `/subscriptions/{id}` | 404 if not found |
//! | `PUT`    | `/subscriptions/{id}` | Full replacement; 404 if not found |
//! | `DELETE` | `/subscriptions/{id}` | Always 204 |
//! | `POST`   | `/subscriptions/{id}/deliver` | Runs the delivery pipeline now |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use swell_core::{
  pipeline::DeliveryOutcome,
  provider::{ForecastProvider, NotificationProvider},
  store::SubscriptionStore,
  subscription::{NewSubscription, Subscription},
};
use tracing::info;
use uuid::Uuid;

use crate::{
  ApiState,
  error::{ApiError, store_err},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /subscriptions`
pub async fn list<S, F, N>(
  State(state): State<ApiState<S, F, N>>,
) -> Result<Json<Vec<Subscription>>, ApiError>
where
  S: SubscriptionStore,
  F: ForecastProvider,
  N: NotificationProvider,
{
  let subscriptions = state.store.list().await.map_err(store_err)?;
  Ok(Json(subscriptions))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /subscriptions`
pub async fn create<S, F, N>(
  State(state): State<ApiState<S, F, N>>,
  Json(body): Json<NewSubscription>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubscriptionStore,
  F: ForecastProvider,
  N: NotificationProvider,
{
  let subscription = state.store.add(body).await.map_err(store_err)?;
  info!(subscription_id = %subscription.subscription_id, "subscription created");
  Ok((StatusCode::CREATED, Json(subscription)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /subscriptions/{id}`
pub async fn get_one<S, F, N>(
  State(state): State<ApiState<S, F, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Subscription>, ApiError>
where
  S: SubscriptionStore,
  F: ForecastProvider,
  N: NotificationProvider,
{
  let subscription = state
    .store
    .get(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("subscription {id} not found")))?;
  Ok(Json(subscription))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /subscriptions/{id}`
pub async fn update<S, F, N>(
  State(state): State<ApiState<S, F, N>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewSubscription>,
) -> Result<Json<Subscription>, ApiError>
where
  S: SubscriptionStore,
  F: ForecastProvider,
  N: NotificationProvider,
{
  let subscription = state.store.update(id, body).await.map_err(store_err)?;
  info!(subscription_id = %id, "subscription updated");
  Ok(Json(subscription))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /subscriptions/{id}`; unknown ids are not an error.
pub async fn remove<S, F, N>(
  State(state): State<ApiState<S, F, N>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: SubscriptionStore,
  F: ForecastProvider,
  N: NotificationProvider,
{
  state.store.remove(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Deliver ──────────────────────────────────────────────────────────────────

/// `POST /subscriptions/{id}/deliver`
///
/// Responds 200 with one outcome per location even when some of them failed.
pub async fn deliver<S, F, N>(
  State(state): State<ApiState<S, F, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<DeliveryOutcome>>, ApiError>
where
  S: SubscriptionStore,
  F: ForecastProvider,
  N: NotificationProvider,
{
  let subscription = state
    .store
    .get(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("subscription {id} not found")))?;
  let outcomes = state.pipeline.deliver(&subscription).await?;
  Ok(Json(outcomes))
}
