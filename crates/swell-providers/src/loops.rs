//! Notification delivery through Loops transactional email.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use swell_core::{
  ProviderError,
  provider::{Notification, NotificationProvider},
};
use tracing::debug;

use crate::{
  http::{build_client, check_status, invalid, transport},
  retry::RetryPolicy,
};

const PROVIDER: &str = "loops";
pub const DEFAULT_BASE_URL: &str = "https://app.loops.so";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionalRequest<'a> {
  transactional_id: &'a str,
  email:            &'a str,
  data_variables:   &'a Map<String, Value>,
}

#[derive(Deserialize)]
struct TransactionalResponse {
  success: bool,
  #[serde(default)]
  message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoopsClient {
  client:   Client,
  api_key:  String,
  base_url: String,
  retry:    RetryPolicy,
}

impl LoopsClient {
  pub fn new(api_key: impl Into<String>, timeout: Duration) -> swell_core::Result<Self> {
    Ok(Self {
      client:   build_client(timeout)?,
      api_key:  api_key.into(),
      base_url: DEFAULT_BASE_URL.to_owned(),
      retry:    RetryPolicy::default(),
    })
  }

  pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
    self.base_url = url.into();
    self
  }

  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  async fn send_once(&self, notification: &Notification) -> Result<(), ProviderError> {
    let url = format!("{}/api/v1/transactional", self.base_url.trim_end_matches('/'));
    let body = TransactionalRequest {
      transactional_id: &notification.template_id,
      email:            &notification.recipient,
      data_variables:   &notification.variables,
    };

    let response = self
      .client
      .post(&url)
      .bearer_auth(&self.api_key)
      .json(&body)
      .send()
      .await
      .map_err(|e| transport(PROVIDER, e))?;
    let response = check_status(PROVIDER, response).await?;

    let parsed: TransactionalResponse = response
      .json()
      .await
      .map_err(|e| invalid(PROVIDER, format!("failed to parse response: {e}")))?;
    if !parsed.success {
      return Err(ProviderError::Rejected {
        provider: PROVIDER,
        message:  parsed.message.unwrap_or_else(|| "success: false".to_owned()),
      });
    }

    debug!(template_id = %notification.template_id, "transactional email accepted");
    Ok(())
  }
}

impl NotificationProvider for LoopsClient {
  async fn send(&self, notification: &Notification) -> Result<(), ProviderError> {
    self.retry.run(PROVIDER, || self.send_once(notification)).await
  }
}
