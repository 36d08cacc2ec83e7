//! The `SubscriptionStore` trait.
//!
//! The trait is implemented by storage backends ([`MemoryStore`] here, and
//! `swell-store-sqlite`). Higher layers (`swell-api`, `swell-server`) depend
//! on this abstraction, not on any concrete backend.
//!
//! [`MemoryStore`]: crate::memory::MemoryStore

use std::future::Future;

use uuid::Uuid;

use crate::subscription::{NewSubscription, Subscription};

/// Abstraction over a subscription table.
///
/// Single writer at a time is enough; this is not a hot path. All methods
/// return `Send` futures so the trait can be used from axum handlers.
pub trait SubscriptionStore: Send + Sync {
  /// Backend error. Must convert into the core [`Error`](crate::Error) so
  /// callers can tell validation and not-found failures apart from backend
  /// faults.
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  /// Validate `input`, assign a fresh identifier and persist it.
  fn add(
    &self,
    input: NewSubscription,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;

  /// Replace every field of subscription `id` except its identifier.
  ///
  /// Fails with not-found (leaving the store untouched) if `id` is absent;
  /// otherwise validates exactly as [`add`](Self::add) does.
  fn update(
    &self,
    id: Uuid,
    input: NewSubscription,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;

  /// Delete subscription `id`. Succeeds even if `id` is unknown.
  fn remove(&self, id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All subscriptions in insertion order.
  fn list(&self) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send + '_;

  /// Retrieve a subscription by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Subscription>, Self::Error>> + Send + '_;
}
