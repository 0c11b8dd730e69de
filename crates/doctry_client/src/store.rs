//! The external document-store client boundary.
//!
//! Everything this layer does is a single-shot call through the
//! [`DocumentStore`] trait. Failure signaling uses the store's
//! HTTP-status-coded error; this layer only ever inspects the status,
//! never the message.

use crate::document::{Document, Etag};
use crate::link::{CollectionLink, DocumentLink};
use std::fmt;
use thiserror::Error;

/// Result type for raw store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// An HTTP status code as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 400 Bad Request.
    pub const BAD_REQUEST: Self = Self(400);
    /// 404 Not Found.
    pub const NOT_FOUND: Self = Self(404);
    /// 409 Conflict.
    pub const CONFLICT: Self = Self(409);
    /// 412 Precondition Failed.
    pub const PRECONDITION_FAILED: Self = Self(412);
    /// 500 Internal Server Error.
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);

    /// Wraps a raw status code.
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the raw status code.
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true for 404 Not Found.
    pub const fn is_not_found(self) -> bool {
        self.0 == Self::NOT_FOUND.0
    }

    /// Returns true for 409 Conflict.
    pub const fn is_conflict(self) -> bool {
        self.0 == Self::CONFLICT.0
    }

    /// Returns true for 412 Precondition Failed.
    pub const fn is_precondition_failed(self) -> bool {
        self.0 == Self::PRECONDITION_FAILED.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A failure reported by the store, coded with an HTTP status.
#[derive(Debug, Error)]
#[error("store request failed with status {status}: {message}")]
pub struct StoreError {
    status: StatusCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Creates a store error with the given status and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches an underlying cause.
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a 404 Not Found error for a document link.
    pub fn not_found(link: &DocumentLink) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("document {link} not found"))
    }

    /// Creates a 409 Conflict error for a document id.
    pub fn conflict(id: &str) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            format!("document with id {id} already exists"),
        )
    }

    /// Creates a 412 Precondition Failed error for a document link.
    pub fn precondition_failed(link: &DocumentLink) -> Self {
        Self::new(
            StatusCode::PRECONDITION_FAILED,
            format!("precondition on document {link} was not met"),
        )
    }

    /// Creates a 400 Bad Request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true for 404 Not Found.
    pub fn is_not_found(&self) -> bool {
        self.status.is_not_found()
    }

    /// Returns true for 409 Conflict.
    pub fn is_conflict(&self) -> bool {
        self.status.is_conflict()
    }

    /// Returns true for 412 Precondition Failed.
    pub fn is_precondition_failed(&self) -> bool {
        self.status.is_precondition_failed()
    }
}

/// Per-request options passed through to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Conditional-write precondition: proceed only if the store's
    /// current eTag equals this value.
    pub if_match: Option<Etag>,
    /// When set, the store must not assign ids; a create without a
    /// caller-supplied id is rejected with 400.
    pub disable_automatic_id_generation: bool,
}

impl RequestOptions {
    /// Creates empty options: unconditional, automatic ids enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the If-Match precondition.
    pub fn if_match(mut self, etag: Etag) -> Self {
        self.if_match = Some(etag);
        self
    }

    /// Disables automatic id generation.
    pub fn disable_automatic_id_generation(mut self) -> Self {
        self.disable_automatic_id_generation = true;
        self
    }
}

/// The external document-store client surface.
///
/// Implementations own connection management, retries, serialization,
/// and everything else below the call boundary; this layer only awaits
/// completion and inspects the resulting status. All calls are
/// single-shot.
#[allow(async_fn_in_trait)]
pub trait DocumentStore: Send + Sync {
    /// Reads the document at `link`. Fails with 404 if absent.
    async fn read_document(
        &self,
        link: &DocumentLink,
        options: &RequestOptions,
    ) -> StoreResult<Document>;

    /// Creates `document` in `collection`. Fails with 409 if a document
    /// with the same id already exists.
    async fn create_document(
        &self,
        collection: &CollectionLink,
        document: Document,
        options: &RequestOptions,
    ) -> StoreResult<Document>;

    /// Replaces the document at `link` with `document`'s payload.
    /// Fails with 404 if absent, 412 if an If-Match precondition is not
    /// met.
    async fn replace_document(
        &self,
        link: &DocumentLink,
        document: Document,
        options: &RequestOptions,
    ) -> StoreResult<Document>;

    /// Deletes the document at `link`. Fails with 404 if absent, 412 if
    /// an If-Match precondition is not met.
    async fn delete_document(
        &self,
        link: &DocumentLink,
        options: &RequestOptions,
    ) -> StoreResult<()>;

    /// Creates `document` in `collection`, or overwrites it if a
    /// document with the same id already exists.
    async fn upsert_document(
        &self,
        collection: &CollectionLink,
        document: Document,
        options: &RequestOptions,
    ) -> StoreResult<Document>;
}
