//! Forecast text from the OpenAI chat completions API.

use std::time::Duration;

use chrono::{Datelike as _, Local, Weekday};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use swell_core::{
  ProviderError,
  forecast::{FollowUpRequest, ForecastRequest},
  provider::ForecastProvider,
};
use tracing::debug;

use crate::{
  http::{build_client, check_status, invalid, transport},
  prompt::{follow_up_prompt, forecast_prompt},
  retry::RetryPolicy,
};

const PROVIDER: &str = "openai";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
  model:    &'a str,
  messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
  message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
  #[serde(default)]
  content: Option<String>,
}

// ─── Client ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OpenAiClient {
  client:   Client,
  api_key:  String,
  model:    String,
  base_url: String,
  retry:    RetryPolicy,
}

impl OpenAiClient {
  pub fn new(
    api_key: impl Into<String>,
    model: impl Into<String>,
    timeout: Duration,
  ) -> swell_core::Result<Self> {
    Ok(Self {
      client:   build_client(timeout)?,
      api_key:  api_key.into(),
      model:    model.into(),
      base_url: DEFAULT_BASE_URL.to_owned(),
      retry:    RetryPolicy::default(),
    })
  }

  /// Point at a compatible endpoint, e.g. a proxy or a test server.
  pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
    self.base_url = url.into();
    self
  }

  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  pub fn model(&self) -> &str { &self.model }

  fn today() -> Weekday { Local::now().weekday() }

  /// Send a single user message and return the first choice's content.
  async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
    self.retry.run(PROVIDER, || self.complete_once(prompt)).await
  }

  async fn complete_once(&self, prompt: &str) -> Result<String, ProviderError> {
    let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
    let body = ChatRequest {
      model:    &self.model,
      messages: [ChatMessage { role: "user", content: prompt }],
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

    let parsed: ChatResponse = response
      .json()
      .await
      .map_err(|e| invalid(PROVIDER, format!("failed to parse completion: {e}")))?;

    let text = parsed
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .filter(|t| !t.trim().is_empty())
      .ok_or_else(|| invalid(PROVIDER, "completion has no content"))?;

    debug!(model = %self.model, chars = text.len(), "completion received");
    Ok(text)
  }
}

impl ForecastProvider for OpenAiClient {
  async fn forecast(&self, request: &ForecastRequest) -> Result<String, ProviderError> {
    self.complete(&forecast_prompt(request, Self::today())).await
  }

  async fn follow_up(&self, request: &FollowUpRequest) -> Result<String, ProviderError> {
    self.complete(&follow_up_prompt(request, Self::today())).await
  }
}
