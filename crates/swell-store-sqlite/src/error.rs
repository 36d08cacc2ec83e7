//! Error type for `swell-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] swell_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column could not be turned back into its domain type.
  #[error("corrupt {column} column: {message}")]
  Decode {
    column:  &'static str,
    message: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for swell_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => swell_core::Error::Store(Box::new(other)),
    }
  }
}
