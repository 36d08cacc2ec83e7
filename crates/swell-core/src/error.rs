//! Error types for `swell-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A subscription field failed validation (empty locations, bad email, ...).
  #[error("invalid subscription: {0}")]
  Validation(String),

  #[error("subscription not found: {0}")]
  NotFound(Uuid),

  #[error("provider error: {0}")]
  Provider(#[from] ProviderError),

  /// Missing or unusable process-wide configuration. Fatal at startup.
  #[error("configuration error: {0}")]
  Configuration(String),

  /// Failure inside a storage backend that has no domain meaning.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Provider errors ─────────────────────────────────────────────────────────

/// A failure reported by (or while talking to) an external provider.
///
/// `provider` is a short static name such as `"openai"` or `"loops"`.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
  #[error("{provider} returned {status}: {body}")]
  Status {
    provider: &'static str,
    status:   u16,
    body:     String,
  },

  #[error("{provider} request failed: {message}")]
  Transport {
    provider: &'static str,
    message:  String,
    /// Timeouts and refused/reset connections.
    transient: bool,
  },

  #[error("{provider} returned an unusable response: {message}")]
  InvalidResponse {
    provider: &'static str,
    message:  String,
  },

  /// The provider answered successfully at the HTTP level but refused the
  /// request (e.g. `{"success": false}`).
  #[error("{provider} rejected the request: {message}")]
  Rejected {
    provider: &'static str,
    message:  String,
  },
}

impl ProviderError {
  /// Whether retrying the same request could plausibly succeed.
  pub fn is_transient(&self) -> bool {
    match self {
      Self::Status { status, .. } => {
        matches!(*status, 408 | 429) || (500..600).contains(status)
      }
      Self::Transport { transient, .. } => *transient,
      Self::InvalidResponse { .. } | Self::Rejected { .. } => false,
    }
  }

  /// A short description safe to show to users. Leaves out response
  /// bodies and messages, which can echo credentials.
  pub fn summary(&self) -> String {
    match self {
      Self::Status { provider, status, .. } => format!("{provider} returned {status}"),
      Self::Transport { provider, .. } => format!("{provider} request failed"),
      Self::InvalidResponse { provider, .. } => format!("{provider} returned an unusable response"),
      Self::Rejected { provider, .. } => format!("{provider} rejected the request"),
    }
  }

  pub fn provider(&self) -> &'static str {
    match self {
      Self::Status { provider, .. }
      | Self::Transport { provider, .. }
      | Self::InvalidResponse { provider, .. }
      | Self::Rejected { provider, .. } => provider,
    }
  }
}
