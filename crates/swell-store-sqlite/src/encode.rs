//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, enumerations use their canonical
//! lowercase names, and the location list is a compact JSON array.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use swell_core::subscription::{NewSubscription, Subscription};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(column: &'static str, s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode { column, message: e.to_string() })
}

/// Parse any `FromStr` column (enumerations, `DeliveryTime`).
fn decode_parsed<T>(column: &'static str, s: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  s.parse()
    .map_err(|e: T::Err| Error::Decode { column, message: format!("{s:?}: {e}") })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values for an INSERT or UPDATE, already encoded.
pub struct EncodedDetails {
  pub locations:     String,
  pub kind:          String,
  pub frequency:     String,
  pub lookout:       String,
  pub delivery_day:  String,
  pub delivery_time: String,
  pub email:         String,
}

impl EncodedDetails {
  pub fn new(details: &NewSubscription) -> Result<Self> {
    Ok(Self {
      locations:     serde_json::to_string(&details.locations)?,
      kind:          details.kind.to_string(),
      frequency:     details.frequency.to_string(),
      lookout:       details.window.to_string(),
      delivery_day:  details.delivery_day.to_string(),
      delivery_time: details.delivery_time.to_string(),
      email:         details.email.clone(),
    })
  }
}

/// Column list matching [`RawSubscription::from_row`].
pub const COLUMNS: &str = "subscription_id, created_at, updated_at, locations, kind, \
                           frequency, lookout, delivery_day, delivery_time, email";

/// Raw strings read directly from a `subscriptions` row.
pub struct RawSubscription {
  pub subscription_id: String,
  pub created_at:      String,
  pub updated_at:      String,
  pub locations:       String,
  pub kind:            String,
  pub frequency:       String,
  pub lookout:         String,
  pub delivery_day:    String,
  pub delivery_time:   String,
  pub email:           String,
}

impl RawSubscription {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subscription_id: row.get(0)?,
      created_at:      row.get(1)?,
      updated_at:      row.get(2)?,
      locations:       row.get(3)?,
      kind:            row.get(4)?,
      frequency:       row.get(5)?,
      lookout:         row.get(6)?,
      delivery_day:    row.get(7)?,
      delivery_time:   row.get(8)?,
      email:           row.get(9)?,
    })
  }

  pub fn into_subscription(self) -> Result<Subscription> {
    Ok(Subscription {
      subscription_id: decode_uuid(&self.subscription_id)?,
      created_at:      decode_dt("created_at", &self.created_at)?,
      updated_at:      decode_dt("updated_at", &self.updated_at)?,
      details:         NewSubscription {
        locations:     serde_json::from_str(&self.locations)?,
        kind:          decode_parsed("kind", &self.kind)?,
        frequency:     decode_parsed("frequency", &self.frequency)?,
        window:        decode_parsed("lookout", &self.lookout)?,
        delivery_day:  decode_parsed("delivery_day", &self.delivery_day)?,
        delivery_time: decode_parsed("delivery_time", &self.delivery_time)?,
        email:         self.email,
      },
    })
  }
}
