//! Subscription: a standing request for recurring forecast emails.
//!
//! A subscription is exclusively owned by a [`SubscriptionStore`]; the
//! delivery pipeline only reads it.
//!
//! [`SubscriptionStore`]: crate::store::SubscriptionStore

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  Error, Result,
  forecast::{ForecastKind, LookoutWindow},
};

// ─── Schedule fields ─────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Frequency {
  #[default]
  Daily,
  Weekly,
}

/// Day of the week a weekly subscription is delivered on.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeliveryDay {
  #[default]
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

/// A 24-hour wall-clock time with minute precision, written `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeliveryTime {
  hour:   u8,
  minute: u8,
}

impl DeliveryTime {
  pub fn new(hour: u8, minute: u8) -> Result<Self> {
    if hour > 23 || minute > 59 {
      return Err(Error::Validation(format!(
        "delivery time {hour:02}:{minute:02} is out of range"
      )));
    }
    Ok(Self { hour, minute })
  }

  pub fn hour(self) -> u8 { self.hour }

  pub fn minute(self) -> u8 { self.minute }
}

impl Default for DeliveryTime {
  fn default() -> Self { Self { hour: 8, minute: 0 } }
}

impl fmt::Display for DeliveryTime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:02}:{:02}", self.hour, self.minute)
  }
}

impl FromStr for DeliveryTime {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::Validation(format!("delivery time {s:?} is not HH:MM"));
    let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if h.is_empty() || h.len() > 2 || m.len() != 2 || !digits(h) || !digits(m) {
      return Err(invalid());
    }
    let hour = h.parse().map_err(|_| invalid())?;
    let minute = m.parse().map_err(|_| invalid())?;
    Self::new(hour, minute)
  }
}

impl TryFrom<String> for DeliveryTime {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<DeliveryTime> for String {
  fn from(t: DeliveryTime) -> Self { t.to_string() }
}

// ─── Subscription ────────────────────────────────────────────────────────────

/// Every field of a subscription except its identity.
///
/// Used as the input to both `add` and `update`; an update replaces all of
/// these fields at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubscription {
  /// Ordered; duplicates are allowed. Must be non-empty.
  pub locations:     Vec<String>,
  pub kind:          ForecastKind,
  #[serde(default)]
  pub frequency:     Frequency,
  pub window:        LookoutWindow,
  /// Only meaningful when `frequency` is weekly.
  #[serde(default)]
  pub delivery_day:  DeliveryDay,
  #[serde(default)]
  pub delivery_time: DeliveryTime,
  pub email:         String,
}

impl NewSubscription {
  /// Check the invariants every stored subscription must satisfy.
  pub fn validate(&self) -> Result<()> {
    if self.locations.is_empty() {
      return Err(Error::Validation("at least one location is required".into()));
    }
    if let Some(i) = self.locations.iter().position(|l| l.trim().is_empty()) {
      return Err(Error::Validation(format!("location #{} is blank", i + 1)));
    }
    validate_email(&self.email)
  }
}

/// A stored subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
  pub subscription_id: Uuid,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  #[serde(flatten)]
  pub details:         NewSubscription,
}

impl Subscription {
  /// Build a fresh record with a newly generated identifier.
  pub fn create(details: NewSubscription) -> Self {
    let now = Utc::now();
    Self {
      subscription_id: Uuid::new_v4(),
      created_at: now,
      updated_at: now,
      details,
    }
  }
}

// ─── Email ───────────────────────────────────────────────────────────────────

/// Syntactic check only: one `@`, a non-empty local part, and a dotted domain
/// with no empty labels. No whitespace anywhere.
pub fn validate_email(email: &str) -> Result<()> {
  let invalid = || Error::Validation(format!("{email:?} is not a valid email address"));

  if email.is_empty() {
    return Err(Error::Validation("email is required".into()));
  }
  if email.chars().any(char::is_whitespace) {
    return Err(invalid());
  }
  let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
  if local.is_empty() || domain.contains('@') {
    return Err(invalid());
  }
  let labels: Vec<&str> = domain.split('.').collect();
  if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
    return Err(invalid());
  }
  Ok(())
}
