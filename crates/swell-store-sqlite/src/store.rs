//! [`SqliteStore`]: the SQLite implementation of [`SubscriptionStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use swell_core::{
  store::SubscriptionStore,
  subscription::{NewSubscription, Subscription},
};

use crate::{
  Error, Result,
  encode::{COLUMNS, EncodedDetails, RawSubscription, decode_dt, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A subscription table backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The stored `created_at` for `id`, or `None` if no such row exists.
  async fn created_at(&self, id: Uuid) -> Result<Option<String>> {
    let id_str = encode_uuid(id);
    let created: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT created_at FROM subscriptions WHERE subscription_id = ?1",
              rusqlite::params![id_str],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(created)
  }

  /// Overwrite the details of row `id`, returning its `created_at`, or
  /// `None` if no row matched.
  pub(crate) async fn write_update(
    &self,
    id: Uuid,
    updated_at: chrono::DateTime<Utc>,
    enc: EncodedDetails,
  ) -> Result<Option<String>> {
    let id_str = encode_uuid(id);
    let updated_str = encode_dt(updated_at);
    let created: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "UPDATE subscriptions SET
                 updated_at = ?2, locations = ?3, kind = ?4, frequency = ?5,
                 lookout = ?6, delivery_day = ?7, delivery_time = ?8, email = ?9
               WHERE subscription_id = ?1
               RETURNING created_at",
              rusqlite::params![
                id_str,
                updated_str,
                enc.locations,
                enc.kind,
                enc.frequency,
                enc.lookout,
                enc.delivery_day,
                enc.delivery_time,
                enc.email,
              ],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(created)
  }
}

// ─── SubscriptionStore impl ──────────────────────────────────────────────────

impl SubscriptionStore for SqliteStore {
  type Error = Error;

  async fn add(&self, input: NewSubscription) -> Result<Subscription> {
    input.validate()?;
    let subscription = Subscription::create(input);

    let id_str = encode_uuid(subscription.subscription_id);
    let created_str = encode_dt(subscription.created_at);
    let updated_str = encode_dt(subscription.updated_at);
    let enc = EncodedDetails::new(&subscription.details)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subscriptions (
             subscription_id, created_at, updated_at, locations, kind,
             frequency, lookout, delivery_day, delivery_time, email
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            created_str,
            updated_str,
            enc.locations,
            enc.kind,
            enc.frequency,
            enc.lookout,
            enc.delivery_day,
            enc.delivery_time,
            enc.email,
          ],
        )?;
        Ok(())
      })
      .await?;

    debug!(subscription_id = %subscription.subscription_id, "subscription added");
    Ok(subscription)
  }

  async fn update(&self, id: Uuid, input: NewSubscription) -> Result<Subscription> {
    if self.created_at(id).await?.is_none() {
      return Err(swell_core::Error::NotFound(id).into());
    }
    input.validate()?;

    let updated_at = Utc::now();
    let enc = EncodedDetails::new(&input)?;
    // The row may have been removed since the check above.
    let created_str = self
      .write_update(id, updated_at, enc)
      .await?
      .ok_or(swell_core::Error::NotFound(id))?;

    debug!(subscription_id = %id, "subscription updated");
    Ok(Subscription {
      subscription_id: id,
      created_at: decode_dt("created_at", &created_str)?,
      updated_at,
      details: input,
    })
  }

  async fn remove(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM subscriptions WHERE subscription_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    debug!(subscription_id = %id, removed, "subscription removed");
    Ok(())
  }

  async fn list(&self) -> Result<Vec<Subscription>> {
    let raws: Vec<RawSubscription> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {COLUMNS} FROM subscriptions ORDER BY seq"))?;
        let rows = stmt
          .query_map([], RawSubscription::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubscription::into_subscription).collect()
  }

  async fn get(&self, id: Uuid) -> Result<Option<Subscription>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawSubscription> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM subscriptions WHERE subscription_id = ?1"),
              rusqlite::params![id_str],
              RawSubscription::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubscription::into_subscription).transpose()
  }
}
