//! JSON REST API for swell.
//!
//! Exposes axum [`Router`]s backed by any [`SubscriptionStore`] and a
//! [`DeliveryPipeline`]. Auth, TLS, and transport concerns are the caller's
//! responsibility; the subscription and forecast routes are built separately
//! so the caller can guard only the former.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", swell_api::api_router(state))
//! ```

pub mod error;
pub mod forecast;
pub mod subscriptions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use swell_core::{
  pipeline::DeliveryPipeline,
  provider::{ForecastProvider, NotificationProvider},
  store::SubscriptionStore,
};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S, F, N> {
  pub store:    Arc<S>,
  pub pipeline: Arc<DeliveryPipeline<F, N>>,
}

// Manual impl: a derive would demand `S: Clone` etc.
impl<S, F, N> Clone for ApiState<S, F, N> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), pipeline: self.pipeline.clone() }
  }
}

impl<S, F, N> ApiState<S, F, N> {
  pub fn new(store: Arc<S>, pipeline: Arc<DeliveryPipeline<F, N>>) -> Self {
    Self { store, pipeline }
  }
}

/// `/subscriptions` CRUD plus on-demand delivery.
pub fn subscriptions_router<S, F, N>(state: ApiState<S, F, N>) -> Router<()>
where
  S: SubscriptionStore + 'static,
  F: ForecastProvider + 'static,
  N: NotificationProvider + 'static,
{
  Router::new()
    .route(
      "/subscriptions",
      get(subscriptions::list::<S, F, N>).post(subscriptions::create::<S, F, N>),
    )
    .route(
      "/subscriptions/{id}",
      get(subscriptions::get_one::<S, F, N>)
        .put(subscriptions::update::<S, F, N>)
        .delete(subscriptions::remove::<S, F, N>),
    )
    .route("/subscriptions/{id}/deliver", post(subscriptions::deliver::<S, F, N>))
    .with_state(state)
}

/// Ad-hoc forecast and follow-up endpoints.
pub fn forecast_router<S, F, N>(state: ApiState<S, F, N>) -> Router<()>
where
  S: SubscriptionStore + 'static,
  F: ForecastProvider + 'static,
  N: NotificationProvider + 'static,
{
  Router::new()
    .route("/forecast", post(forecast::forecast::<S, F, N>))
    .route("/forecast/follow-up", post(forecast::follow_up::<S, F, N>))
    .with_state(state)
}

/// Both routers merged, without any authentication.
pub fn api_router<S, F, N>(state: ApiState<S, F, N>) -> Router<()>
where
  S: SubscriptionStore + 'static,
  F: ForecastProvider + 'static,
  N: NotificationProvider + 'static,
{
  subscriptions_router(state.clone()).merge(forecast_router(state))
}
