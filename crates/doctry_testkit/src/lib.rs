//! # doctry testkit
//!
//! Test utilities for doctry.
//!
//! This crate provides:
//! - [`InMemoryStore`], a full-fidelity in-memory `DocumentStore` with
//!   real 404/409/412 and eTag/If-Match semantics
//! - A call journal and single-shot error injection for boundary tests
//! - Payload fixtures shared across workspace tests

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
mod store;

pub use fixtures::{numbered_documents, user_document};
pub use store::InMemoryStore;
