//! Core types and trait definitions for the Swell forecast assistant.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Provider adapters, storage backends and the API all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod forecast;
pub mod memory;
pub mod pipeline;
pub mod provider;
pub mod session;
pub mod store;
pub mod subscription;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{Error, ProviderError, Result};
