//! Error types for the convenience layer.

use crate::document::{Document, Etag};
use crate::link::DocumentLink;
use crate::store::StoreError;
use serde_json::Value;
use thiserror::Error;

/// Result type for convenience-layer operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the convenience layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A store failure this layer does not interpret, passed through
    /// unchanged with its original status.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A conditional replace found the document modified concurrently.
    #[error(transparent)]
    LockConflict(Box<LockConflictError>),

    /// A lock operation was invoked without the context it needs.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// A typed payload failed to serialize or deserialize.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl From<LockConflictError> for ClientError {
    fn from(err: LockConflictError) -> Self {
        Self::LockConflict(Box::new(err))
    }
}

/// An optimistic-lock conflict: the store's current eTag did not match
/// the token the caller supplied.
///
/// Carries the document link, the supplied (not the stored) token, and
/// the caller's view of the document at the time of the failed write:
/// exactly one of `document` and `payload` is populated, whichever
/// representation was available.
#[derive(Debug, Error)]
#[error("document {link} was modified concurrently (expected etag {expected_etag})")]
pub struct LockConflictError {
    link: DocumentLink,
    expected_etag: Etag,
    document: Option<Document>,
    payload: Option<Value>,
    #[source]
    source: StoreError,
}

impl LockConflictError {
    /// Builds a conflict error from a full document and the failing
    /// store error.
    ///
    /// `link` is passed separately because a draft document may not
    /// carry a self link.
    pub fn from_document(
        link: DocumentLink,
        expected_etag: Etag,
        document: Document,
        source: StoreError,
    ) -> Self {
        Self {
            link,
            expected_etag,
            document: Some(document),
            payload: None,
            source,
        }
    }

    /// Builds a conflict error from a raw payload and the failing store
    /// error.
    pub fn from_payload(
        link: DocumentLink,
        expected_etag: Etag,
        payload: Value,
        source: StoreError,
    ) -> Self {
        Self {
            link,
            expected_etag,
            document: None,
            payload: Some(payload),
            source,
        }
    }

    /// Returns the link of the conflicting document.
    pub fn link(&self) -> &DocumentLink {
        &self.link
    }

    /// Returns the eTag the caller believed was current.
    pub fn expected_etag(&self) -> &Etag {
        &self.expected_etag
    }

    /// Returns the full document, when the caller had one.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Returns the raw payload, when no full document was available.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}

/// A plain optimistic-lock error with message and cause chaining only.
///
/// Raised when a lock operation is invoked on a document that lacks the
/// required context, such as a missing self link or missing eTag.
#[derive(Debug, Error)]
#[error("optimistic lock error: {message}")]
pub struct LockError {
    message: String,
    #[source]
    source: Option<StoreError>,
}

impl LockError {
    /// Creates a lock error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying store error.
    pub fn with_source(mut self, source: StoreError) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StatusCode;
    use serde_json::json;
    use std::error::Error;

    fn precondition_err() -> StoreError {
        StoreError::precondition_failed(&DocumentLink::new("db", "coll", "x"))
    }

    #[test]
    fn conflict_from_document_populates_document_only() {
        let link = DocumentLink::new("db", "coll", "x");
        let doc = Document::new("x", json!({"n": 1}));
        let err =
            LockConflictError::from_document(link.clone(), Etag::new("v1"), doc, precondition_err());

        assert_eq!(err.link(), &link);
        assert_eq!(err.expected_etag().as_str(), "v1");
        assert!(err.document().is_some());
        assert!(err.payload().is_none());
    }

    #[test]
    fn conflict_from_payload_populates_payload_only() {
        let link = DocumentLink::new("db", "coll", "x");
        let err = LockConflictError::from_payload(
            link,
            Etag::new("v1"),
            json!({"n": 1}),
            precondition_err(),
        );

        assert!(err.document().is_none());
        assert_eq!(err.payload(), Some(&json!({"n": 1})));
    }

    #[test]
    fn conflict_chains_to_store_error() {
        let err = LockConflictError::from_payload(
            DocumentLink::new("db", "coll", "x"),
            Etag::new("v1"),
            json!({}),
            precondition_err(),
        );
        let source = err.source().expect("store error cause");
        assert!(source.to_string().contains("412"));
    }

    #[test]
    fn client_error_display() {
        let err: ClientError = LockError::new("document carries no etag").into();
        assert!(err.to_string().contains("no etag"));

        let err: ClientError = StoreError::new(StatusCode::new(503), "unavailable").into();
        assert!(err.to_string().contains("503"));
    }
}
