//! # doctry client
//!
//! Try-semantics convenience layer over a cloud document store client.
//!
//! This crate provides:
//! - Resource locators built from (database, collection, document) id
//!   triples or accepted as opaque paths
//! - An opaque document model with typed serde access at the edges
//! - The [`DocumentStore`] trait marking the external client boundary
//! - [`TryStore`], which wraps a store with try-style CRUD: expected
//!   not-found and already-exists failures become [`TryOutcome`]
//!   variants instead of errors
//! - An optimistic-concurrency replace built on eTag conditional writes
//!
//! ## Key invariants
//!
//! - Every operation is a single-shot pass-through: no retries,
//!   timeouts, or cancellation in this layer
//! - Only 404, 409, and 412 are ever interpreted; everything else
//!   propagates with its original status
//! - A version conflict (412) on a locking replace is surfaced as a
//!   typed error, never absorbed
//! - Suppressed paths emit `tracing` events at trace level

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod link;
mod ops;
mod outcome;
mod store;

pub use document::{Document, Etag};
pub use error::{ClientError, ClientResult, LockConflictError, LockError};
pub use link::{CollectionLink, DocumentLink};
pub use ops::TryStore;
pub use outcome::TryOutcome;
pub use store::{DocumentStore, RequestOptions, StatusCode, StoreError, StoreResult};
