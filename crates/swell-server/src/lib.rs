//! HTTP server assembly for swell.
//!
//! Mounts the JSON API under `/api`, guards the subscription routes with
//! HTTP Basic auth, and traces every request.

pub mod auth;
pub mod config;

use std::sync::Arc;

use axum::{Router, middleware};
use swell_api::ApiState;
use swell_core::{
  provider::{ForecastProvider, NotificationProvider},
  store::SubscriptionStore,
};
use tower_http::trace::TraceLayer;

pub use auth::AuthConfig;
pub use config::{ServerConfig, StoreLocation};

/// Build the full application router.
pub fn router<S, F, N>(state: ApiState<S, F, N>, auth: Arc<AuthConfig>) -> Router
where
  S: SubscriptionStore + 'static,
  F: ForecastProvider + 'static,
  N: NotificationProvider + 'static,
{
  let subscriptions = swell_api::subscriptions_router(state.clone())
    .route_layer(middleware::from_fn_with_state(auth, auth::require_auth));
  let api = subscriptions.merge(swell_api::forecast_router(state));

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use rand_core::OsRng;
  use swell_core::{
    memory::MemoryStore,
    mock::{MockForecasts, MockNotifier},
    pipeline::DeliveryPipeline,
  };
  use tower::ServiceExt as _;

  use super::*;

  fn app(password: &str) -> Router {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();
    let auth = Arc::new(AuthConfig { username: "user".to_string(), password_hash: hash });

    let pipeline = Arc::new(DeliveryPipeline::new(
      Arc::new(MockForecasts::new()),
      Arc::new(MockNotifier::new()),
    ));
    router(ApiState::new(Arc::new(MemoryStore::new()), pipeline), auth)
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot_raw(
    app:     Router,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(req).await.unwrap()
  }

  #[tokio::test]
  async fn subscriptions_require_credentials() {
    let resp = oneshot_raw(app("secret"), "GET", "/api/subscriptions", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn wrong_password_is_rejected() {
    let auth = auth_header("user", "nope");
    let resp = oneshot_raw(
      app("secret"),
      "GET",
      "/api/subscriptions",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn authenticated_create_then_list() {
    let app = app("secret");
    let auth = auth_header("user", "secret");
    let body = r#"{"locations":["Bali"],"kind":"surf","window":"next_3_days","email":"a@b.com"}"#;

    let resp = oneshot_raw(
      app.clone(),
      "POST",
      "/api/subscriptions",
      vec![(header::AUTHORIZATION, auth.as_str()), (header::CONTENT_TYPE, "application/json")],
      body,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = oneshot_raw(
      app,
      "GET",
      "/api/subscriptions",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let list: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["locations"][0], "Bali");
  }

  #[tokio::test]
  async fn forecast_is_public() {
    let resp = oneshot_raw(
      app("secret"),
      "POST",
      "/api/forecast",
      vec![(header::CONTENT_TYPE, "application/json")],
      r#"{"kind":"surf","location":"Bali","window":"next_week"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn unknown_route_is_404() {
    let resp = oneshot_raw(app("secret"), "GET", "/api/nope", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
