//! Runtime server configuration.
//!
//! Loaded from an optional TOML file layered under `SWELL_*` environment
//! variables, e.g. `SWELL_OPENAI_API_KEY`.

use std::path::{Path, PathBuf};

use argon2::PasswordHash;
use serde::Deserialize;
use swell_core::{Error, Result, provider::FORECAST_TEMPLATE};

use crate::auth::AuthConfig;

/// Where subscriptions are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
  Memory,
  Sqlite(PathBuf),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  /// `memory`, or the path of a SQLite database file.
  #[serde(default = "default_store")]
  pub store:                String,
  #[serde(default)]
  pub auth_username:        String,
  #[serde(default)]
  pub auth_password_hash:   String,
  #[serde(default)]
  pub openai_api_key:       String,
  #[serde(default = "default_openai_model")]
  pub openai_model:         String,
  pub openai_base_url:      Option<String>,
  #[serde(default)]
  pub loops_api_key:        String,
  pub loops_base_url:       Option<String>,
  #[serde(default = "default_forecast_template")]
  pub forecast_template:    String,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
  #[serde(default = "default_max_retries")]
  pub max_retries:          u32,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_store() -> String { "memory".to_owned() }
fn default_openai_model() -> String { swell_providers::openai::DEFAULT_MODEL.to_owned() }
fn default_forecast_template() -> String { FORECAST_TEMPLATE.to_owned() }
fn default_request_timeout_secs() -> u64 { 60 }
fn default_max_retries() -> u32 { 2 }

impl ServerConfig {
  /// Layer `file` (if it exists) under the process environment.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("SWELL"))
      .build()?
      .try_deserialize()
  }

  /// Reject configurations the server cannot run with. Called once at
  /// startup, before anything binds.
  pub fn validate(&self) -> Result<()> {
    let required = [
      ("auth_username", &self.auth_username),
      ("auth_password_hash", &self.auth_password_hash),
      ("openai_api_key", &self.openai_api_key),
      ("loops_api_key", &self.loops_api_key),
      ("forecast_template", &self.forecast_template),
    ];
    for (name, value) in required {
      if value.trim().is_empty() {
        return Err(Error::Configuration(format!("{name} is required")));
      }
    }
    PasswordHash::new(&self.auth_password_hash).map_err(|e| {
      Error::Configuration(format!("auth_password_hash is not an argon2 PHC string: {e}"))
    })?;
    if self.request_timeout_secs == 0 {
      return Err(Error::Configuration("request_timeout_secs must be positive".into()));
    }
    Ok(())
  }

  pub fn store_location(&self) -> StoreLocation {
    match self.store.trim() {
      "memory" | "" => StoreLocation::Memory,
      path => StoreLocation::Sqlite(expand_tilde(Path::new(path))),
    }
  }

  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  // Well-formed argon2id PHC string; never verified against.
  const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$\
                      1ZkmC7mlkIH/RpMHpedxAZTVXv+2T/3q2v3cEBT6Kxo";

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  fn complete() -> String {
    format!(
      r#"
        auth_username = "admin"
        auth_password_hash = "{HASH}"
        openai_api_key = "sk-test"
        loops_api_key = "loops-test"
      "#
    )
  }

  #[test]
  fn defaults_fill_optional_fields() {
    let cfg = parse(&complete());
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.openai_model, "gpt-3.5-turbo");
    assert_eq!(cfg.forecast_template, "forecast-email");
    assert_eq!(cfg.request_timeout_secs, 60);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.store_location(), StoreLocation::Memory);
    assert!(cfg.openai_base_url.is_none());
    cfg.validate().unwrap();
  }

  #[test]
  fn missing_openai_key_is_a_configuration_error() {
    let cfg = parse(&complete().replace(r#"openai_api_key = "sk-test""#, ""));
    match cfg.validate() {
      Err(Error::Configuration(m)) => assert!(m.contains("openai_api_key")),
      other => panic!("unexpected: {other:?}"),
    }
  }

  #[test]
  fn blank_loops_key_is_a_configuration_error() {
    let cfg = parse(&complete().replace("loops-test", "  "));
    assert!(matches!(cfg.validate(), Err(Error::Configuration(_))));
  }

  #[test]
  fn plaintext_password_is_rejected() {
    let cfg = parse(&complete().replace(HASH, "hunter2"));
    match cfg.validate() {
      Err(Error::Configuration(m)) => assert!(m.contains("auth_password_hash")),
      other => panic!("unexpected: {other:?}"),
    }
  }

  #[test]
  fn sqlite_store_path() {
    let cfg = parse(&format!("{}\nstore = \"/var/lib/swell/subs.db\"", complete()));
    assert_eq!(
      cfg.store_location(),
      StoreLocation::Sqlite(PathBuf::from("/var/lib/swell/subs.db"))
    );
  }
}
