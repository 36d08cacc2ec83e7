//! Shared reqwest plumbing for the adapters.

use std::time::Duration;

use reqwest::{Client, Response};
use swell_core::ProviderError;
use tracing::debug;

pub(crate) fn build_client(timeout: Duration) -> swell_core::Result<Client> {
  Client::builder()
    .timeout(timeout)
    .build()
    .map_err(|e| swell_core::Error::Configuration(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn transport(provider: &'static str, err: reqwest::Error) -> ProviderError {
  ProviderError::Transport {
    provider,
    message: err.to_string(),
    transient: err.is_timeout() || err.is_connect(),
  }
}

/// Pass successful responses through; turn everything else into
/// [`ProviderError::Status`] carrying the response body.
pub(crate) async fn check_status(
  provider: &'static str,
  response: Response,
) -> Result<Response, ProviderError> {
  let status = response.status();
  debug!(provider, status = %status, "response received");
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().await.unwrap_or_default();
  Err(ProviderError::Status { provider, status: status.as_u16(), body })
}

pub(crate) fn invalid(provider: &'static str, message: impl Into<String>) -> ProviderError {
  ProviderError::InvalidResponse { provider, message: message.into() }
}
