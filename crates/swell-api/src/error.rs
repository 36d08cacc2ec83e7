//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use swell_core::ProviderError;
use thiserror::Error;
use tracing::{error, warn};

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// Well-formed JSON whose contents fail domain validation.
  #[error("invalid request: {0}")]
  Unprocessable(String),

  #[error(transparent)]
  Provider(ProviderError),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<swell_core::Error> for ApiError {
  fn from(e: swell_core::Error) -> Self {
    use swell_core::Error as E;
    match e {
      E::Validation(m) => Self::Unprocessable(m),
      E::NotFound(id) => Self::NotFound(format!("subscription {id} not found")),
      E::Provider(p) => Self::Provider(p),
      other @ (E::Configuration(_) | E::Store(_)) => Self::Internal(Box::new(other)),
    }
  }
}

/// Convert any store error into an [`ApiError`] by way of `swell_core::Error`.
pub(crate) fn store_err<E: Into<swell_core::Error>>(e: E) -> ApiError { ApiError::from(e.into()) }

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      // Upstream details stay in the log.
      ApiError::Provider(e) => {
        warn!(provider = e.provider(), error = %e, "provider call failed");
        (StatusCode::BAD_GATEWAY, format!("{} is unavailable, try again later", e.provider()))
      }
      ApiError::Internal(e) => {
        error!(error = %e, "internal error");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
