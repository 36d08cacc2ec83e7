//! Async HTTP client wrapping the swell JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use swell_core::{
  ProviderError,
  forecast::{FollowUpRequest, ForecastRequest},
  pipeline::DeliveryOutcome,
  provider::ForecastProvider,
  subscription::{NewSubscription, Subscription},
};
use uuid::Uuid;

const PROVIDER: &str = "swell";

/// Connection settings for the swell API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the swell JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Deserialize)]
struct ForecastText {
  text: String,
}

/// The server's `{"error": ...}` message, or the raw body.
async fn error_message(resp: Response) -> String {
  let body = resp.text().await.unwrap_or_default();
  serde_json::from_str::<ErrorBody>(&body)
    .map(|e| e.error)
    .unwrap_or(body)
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    // Forecast generation upstream can be slow; leave room for its retries.
    let client = Client::builder()
      .timeout(Duration::from_secs(180))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  async fn expect_json<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
      return Err(anyhow!("{what} → {status}: {}", error_message(resp).await));
    }
    resp.json().await.with_context(|| format!("deserialising {what} response"))
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  /// `GET /api/subscriptions`
  pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
    let resp = self
      .auth(self.client.get(self.url("/subscriptions")))
      .send()
      .await
      .context("GET /subscriptions failed")?;
    Self::expect_json(resp, "GET /subscriptions").await
  }

  /// `GET /api/subscriptions/{id}`
  pub async fn get_subscription(&self, id: Uuid) -> Result<Subscription> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/subscriptions/{id}"))))
      .send()
      .await
      .context("GET /subscriptions/{id} failed")?;
    Self::expect_json(resp, "GET /subscriptions/{id}").await
  }

  /// `POST /api/subscriptions`
  pub async fn create_subscription(&self, body: &NewSubscription) -> Result<Subscription> {
    let resp = self
      .auth(self.client.post(self.url("/subscriptions")))
      .json(body)
      .send()
      .await
      .context("POST /subscriptions failed")?;
    Self::expect_json(resp, "POST /subscriptions").await
  }

  /// `PUT /api/subscriptions/{id}`
  pub async fn update_subscription(&self, id: Uuid, body: &NewSubscription) -> Result<Subscription> {
    let resp = self
      .auth(self.client.put(self.url(&format!("/subscriptions/{id}"))))
      .json(body)
      .send()
      .await
      .context("PUT /subscriptions/{id} failed")?;
    Self::expect_json(resp, "PUT /subscriptions/{id}").await
  }

  /// `DELETE /api/subscriptions/{id}`
  pub async fn delete_subscription(&self, id: Uuid) -> Result<()> {
    let resp = self
      .auth(self.client.delete(self.url(&format!("/subscriptions/{id}"))))
      .send()
      .await
      .context("DELETE /subscriptions/{id} failed")?;
    let status = resp.status();
    if !status.is_success() {
      return Err(anyhow!("DELETE /subscriptions/{id} → {status}: {}", error_message(resp).await));
    }
    Ok(())
  }

  /// `POST /api/subscriptions/{id}/deliver`
  pub async fn deliver(&self, id: Uuid) -> Result<Vec<DeliveryOutcome>> {
    let resp = self
      .auth(self.client.post(self.url(&format!("/subscriptions/{id}/deliver"))))
      .send()
      .await
      .context("POST /subscriptions/{id}/deliver failed")?;
    Self::expect_json(resp, "POST /subscriptions/{id}/deliver").await
  }

  // ── Forecasts ─────────────────────────────────────────────────────────────

  async fn post_for_text<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ProviderError> {
    let resp = self
      .client
      .post(self.url(path))
      .json(body)
      .send()
      .await
      .map_err(|e| ProviderError::Transport {
        provider:  PROVIDER,
        message:   e.to_string(),
        transient: e.is_timeout() || e.is_connect(),
      })?;

    let status = resp.status();
    if !status.is_success() {
      return Err(ProviderError::Status {
        provider: PROVIDER,
        status:   status.as_u16(),
        body:     error_message(resp).await,
      });
    }

    let parsed: ForecastText = resp.json().await.map_err(|e| ProviderError::InvalidResponse {
      provider: PROVIDER,
      message:  e.to_string(),
    })?;
    Ok(parsed.text)
  }
}

/// The server's forecast endpoints stand in for the language model, so the
/// TUI can drive a `ForecastSession` against them directly.
impl ForecastProvider for ApiClient {
  async fn forecast(&self, request: &ForecastRequest) -> Result<String, ProviderError> {
    self.post_for_text("/forecast", request).await
  }

  async fn follow_up(&self, request: &FollowUpRequest) -> Result<String, ProviderError> {
    self.post_for_text("/forecast/follow-up", request).await
  }
}
