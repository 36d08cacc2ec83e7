//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use swell_core::{
  forecast::{ForecastKind, LookoutWindow},
  mock::subscription,
  store::SubscriptionStore,
  subscription::{DeliveryDay, Frequency},
};
use uuid::Uuid;

use crate::{Error, SqliteStore, encode::EncodedDetails};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Add / list ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get() {
  let s = store().await;
  let added = s.add(subscription(&["Bali"])).await.unwrap();

  let fetched = s.get(added.subscription_id).await.unwrap().unwrap();
  assert_eq!(fetched, added);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_preserves_insertion_order_and_fresh_ids() {
  let s = store().await;
  let a = s.add(subscription(&["Bali"])).await.unwrap();
  let b = s.add(subscription(&["Hawaii"])).await.unwrap();
  let c = s.add(subscription(&["Tarifa"])).await.unwrap();

  let ids: HashSet<_> = [a.subscription_id, b.subscription_id, c.subscription_id].into();
  assert_eq!(ids.len(), 3);

  let all = s.list().await.unwrap();
  assert_eq!(all, vec![a, b, c]);
}

#[tokio::test]
async fn all_fields_roundtrip() {
  let s = store().await;
  let mut input = subscription(&["Hawaii", "Maui", "Hawaii"]);
  input.kind = ForecastKind::Kitesurf;
  input.frequency = Frequency::Weekly;
  input.window = LookoutWindow::NextWeek;
  input.delivery_day = DeliveryDay::Friday;
  input.delivery_time = "18:00".parse().unwrap();
  input.email = "user2@example.com".into();

  let added = s.add(input.clone()).await.unwrap();
  let listed = s.list().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].subscription_id, added.subscription_id);
  assert_eq!(listed[0].details, input);
}

#[tokio::test]
async fn add_rejects_empty_locations() {
  let s = store().await;
  let err = s.add(subscription(&[])).await.unwrap_err();
  assert!(matches!(err, Error::Core(swell_core::Error::Validation(_))));
  assert!(s.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn add_rejects_invalid_email() {
  let s = store().await;
  let mut input = subscription(&["Bali"]);
  input.email = "user@localhost".into();
  assert!(matches!(
    s.add(input).await,
    Err(Error::Core(swell_core::Error::Validation(_)))
  ));
  assert!(s.list().await.unwrap().is_empty());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_fields_and_keeps_position() {
  let s = store().await;
  let first = s.add(subscription(&["Bali"])).await.unwrap();
  let second = s.add(subscription(&["Hawaii"])).await.unwrap();

  let mut replacement = subscription(&["Lombok"]);
  replacement.frequency = Frequency::Weekly;
  let updated = s
    .update(first.subscription_id, replacement.clone())
    .await
    .unwrap();
  assert_eq!(updated.subscription_id, first.subscription_id);
  assert_eq!(updated.created_at, first.created_at);
  assert!(updated.updated_at >= first.updated_at);

  let all = s.list().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].subscription_id, first.subscription_id);
  assert_eq!(all[0].details, replacement);
  assert_eq!(all[1], second);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
  let s = store().await;
  let existing = s.add(subscription(&["Bali"])).await.unwrap();
  let missing = Uuid::new_v4();

  let err = s.update(missing, subscription(&["Hawaii"])).await.unwrap_err();
  assert!(matches!(err, Error::Core(swell_core::Error::NotFound(id)) if id == missing));
  assert_eq!(s.list().await.unwrap(), vec![existing]);
}

#[tokio::test]
async fn update_write_reports_row_removed_after_check() {
  let s = store().await;
  let gone = s.add(subscription(&["Bali"])).await.unwrap();
  let kept = s.add(subscription(&["Hawaii"])).await.unwrap();
  s.remove(gone.subscription_id).await.unwrap();

  let enc = EncodedDetails::new(&subscription(&["Lombok"])).unwrap();
  let written = s
    .write_update(gone.subscription_id, chrono::Utc::now(), enc)
    .await
    .unwrap();
  assert!(written.is_none());
  assert_eq!(s.list().await.unwrap(), vec![kept.clone()]);

  let enc = EncodedDetails::new(&subscription(&["Lombok"])).unwrap();
  let created = s
    .write_update(kept.subscription_id, chrono::Utc::now(), enc)
    .await
    .unwrap();
  assert!(created.is_some());
}

#[tokio::test]
async fn update_with_invalid_fields_leaves_row_untouched() {
  let s = store().await;
  let existing = s.add(subscription(&["Bali"])).await.unwrap();

  let mut bad = subscription(&["Hawaii"]);
  bad.email = String::new();
  assert!(s.update(existing.subscription_id, bad).await.is_err());
  assert_eq!(s.list().await.unwrap(), vec![existing]);
}

// ─── Remove ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn remove_is_idempotent() {
  let s = store().await;
  let keep = s.add(subscription(&["Bali"])).await.unwrap();
  let gone = s.add(subscription(&["Hawaii"])).await.unwrap();

  s.remove(gone.subscription_id).await.unwrap();
  s.remove(gone.subscription_id).await.unwrap();
  s.remove(Uuid::new_v4()).await.unwrap();

  assert_eq!(s.list().await.unwrap(), vec![keep]);
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_subscriptions() {
  let path = std::env::temp_dir().join(format!("swell-test-{}.db", Uuid::new_v4()));

  let added = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.add(subscription(&["Bali"])).await.unwrap()
  };

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert_eq!(reopened.list().await.unwrap(), vec![added]);

  drop(reopened);
  let _ = std::fs::remove_file(&path);
}

#[test]
fn store_errors_convert_into_core_errors() {
  let not_found = Error::Core(swell_core::Error::NotFound(Uuid::nil()));
  assert!(matches!(swell_core::Error::from(not_found), swell_core::Error::NotFound(_)));

  let decode = Error::Decode { column: "kind", message: "bad".into() };
  assert!(matches!(swell_core::Error::from(decode), swell_core::Error::Store(_)));
}
