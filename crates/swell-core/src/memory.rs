//! [`MemoryStore`]: the in-process implementation of [`SubscriptionStore`].

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
  Error, Result,
  store::SubscriptionStore,
  subscription::{NewSubscription, Subscription},
};

/// A subscription table held in memory.
///
/// Cloning is cheap; clones share the same table.
#[derive(Clone, Default)]
pub struct MemoryStore {
  rows: Arc<RwLock<Vec<Subscription>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

impl SubscriptionStore for MemoryStore {
  type Error = Error;

  async fn add(&self, input: NewSubscription) -> Result<Subscription> {
    input.validate()?;
    let subscription = Subscription::create(input);
    self.rows.write().await.push(subscription.clone());
    Ok(subscription)
  }

  async fn update(&self, id: Uuid, input: NewSubscription) -> Result<Subscription> {
    let mut rows = self.rows.write().await;
    let row = rows
      .iter_mut()
      .find(|s| s.subscription_id == id)
      .ok_or(Error::NotFound(id))?;
    input.validate()?;
    row.details = input;
    row.updated_at = Utc::now();
    Ok(row.clone())
  }

  async fn remove(&self, id: Uuid) -> Result<()> {
    self.rows.write().await.retain(|s| s.subscription_id != id);
    Ok(())
  }

  async fn list(&self) -> Result<Vec<Subscription>> { Ok(self.rows.read().await.clone()) }

  async fn get(&self, id: Uuid) -> Result<Option<Subscription>> {
    Ok(
      self
        .rows
        .read()
        .await
        .iter()
        .find(|s| s.subscription_id == id)
        .cloned(),
    )
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;
  use crate::{forecast::ForecastKind, mock::subscription};

  #[tokio::test]
  async fn add_assigns_fresh_ids_and_lists_in_order() {
    let store = MemoryStore::new();
    let a = store.add(subscription(&["Bali"])).await.unwrap();
    let b = store.add(subscription(&["Hawaii"])).await.unwrap();
    let c = store.add(subscription(&["Tarifa"])).await.unwrap();

    let ids: HashSet<_> = [a.subscription_id, b.subscription_id, c.subscription_id].into();
    assert_eq!(ids.len(), 3);

    let listed: Vec<_> = store
      .list()
      .await
      .unwrap()
      .into_iter()
      .map(|s| s.subscription_id)
      .collect();
    assert_eq!(listed, vec![a.subscription_id, b.subscription_id, c.subscription_id]);
  }

  #[tokio::test]
  async fn add_rejects_empty_locations() {
    let store = MemoryStore::new();
    let result = store.add(subscription(&[])).await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(store.list().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn add_rejects_invalid_email() {
    let store = MemoryStore::new();
    let mut input = subscription(&["Bali"]);
    input.email = "not-an-email".into();
    assert!(matches!(store.add(input).await, Err(Error::Validation(_))));
    assert!(store.list().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn update_replaces_fields_under_original_id() {
    let store = MemoryStore::new();
    let original = store.add(subscription(&["Bali"])).await.unwrap();

    let mut replacement = subscription(&["Hawaii", "Maui"]);
    replacement.kind = ForecastKind::Kitesurf;
    let updated = store
      .update(original.subscription_id, replacement.clone())
      .await
      .unwrap();

    assert_eq!(updated.subscription_id, original.subscription_id);
    assert_eq!(updated.created_at, original.created_at);
    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].subscription_id, original.subscription_id);
    assert_eq!(listed[0].details, replacement);
  }

  #[tokio::test]
  async fn update_unknown_id_is_not_found_and_leaves_store_alone() {
    let store = MemoryStore::new();
    let existing = store.add(subscription(&["Bali"])).await.unwrap();
    let missing = Uuid::new_v4();

    let result = store.update(missing, subscription(&["Hawaii"])).await;
    assert!(matches!(result, Err(Error::NotFound(id)) if id == missing));
    assert_eq!(store.list().await.unwrap(), vec![existing]);
  }

  #[tokio::test]
  async fn update_validates_like_add() {
    let store = MemoryStore::new();
    let existing = store.add(subscription(&["Bali"])).await.unwrap();
    let result = store.update(existing.subscription_id, subscription(&[])).await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(store.list().await.unwrap(), vec![existing]);
  }

  #[tokio::test]
  async fn remove_is_idempotent() {
    let store = MemoryStore::new();
    let keep = store.add(subscription(&["Bali"])).await.unwrap();
    let gone = store.add(subscription(&["Hawaii"])).await.unwrap();

    store.remove(gone.subscription_id).await.unwrap();
    store.remove(gone.subscription_id).await.unwrap();
    store.remove(Uuid::new_v4()).await.unwrap();

    assert_eq!(store.list().await.unwrap(), vec![keep]);
    assert!(store.get(gone.subscription_id).await.unwrap().is_none());
  }
}
