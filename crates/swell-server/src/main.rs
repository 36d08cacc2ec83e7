//! swell-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `SWELL_*` environment variables, opens the configured subscription store,
//! and serves the JSON API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `auth_password_hash`:
//!
//! ```
//! cargo run -p swell-server -- --hash-password
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rand_core::OsRng;
use swell_api::ApiState;
use swell_core::{memory::MemoryStore, pipeline::DeliveryPipeline, store::SubscriptionStore};
use swell_providers::{LoopsClient, OpenAiClient, RetryPolicy};
use swell_server::{ServerConfig, StoreLocation};
use swell_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Swell forecast subscription server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;
  cfg.validate().context("invalid configuration")?;

  match cfg.store_location() {
    StoreLocation::Memory => {
      tracing::warn!("using in-memory store; subscriptions are lost on exit");
      serve(cfg, MemoryStore::new()).await
    }
    StoreLocation::Sqlite(path) => {
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      tracing::info!(path = %path.display(), "opened sqlite store");
      serve(cfg, store).await
    }
  }
}

async fn serve<S: SubscriptionStore + 'static>(cfg: ServerConfig, store: S) -> anyhow::Result<()> {
  let timeout = Duration::from_secs(cfg.request_timeout_secs);
  let retry = RetryPolicy::new(cfg.max_retries);

  let mut openai = OpenAiClient::new(&cfg.openai_api_key, &cfg.openai_model, timeout)
    .context("failed to build OpenAI client")?
    .with_retry(retry.clone());
  if let Some(url) = &cfg.openai_base_url {
    openai = openai.with_base_url(url);
  }

  let mut loops = LoopsClient::new(&cfg.loops_api_key, timeout)
    .context("failed to build Loops client")?
    .with_retry(retry);
  if let Some(url) = &cfg.loops_base_url {
    loops = loops.with_base_url(url);
  }

  let pipeline = DeliveryPipeline::new(Arc::new(openai), Arc::new(loops))
    .with_template(&cfg.forecast_template);
  let state = ApiState::new(Arc::new(store), Arc::new(pipeline));

  let app = swell_server::router(state, Arc::new(cfg.auth()));
  let address = cfg.address();

  tracing::info!(model = %cfg.openai_model, template = %cfg.forecast_template, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let password = line.trim_end_matches(['\n', '\r']).to_string();
  anyhow::ensure!(!password.is_empty(), "password must not be empty");
  Ok(password)
}
