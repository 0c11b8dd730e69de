//! Document payload model.
//!
//! The layer treats payloads as opaque JSON; it never inspects or
//! rewrites body fields. Typed access goes through serde at the edges.

use crate::link::DocumentLink;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An opaque version stamp of a stored document.
///
/// The store assigns a fresh value on every successful write. Equality
/// is the only meaningful operation; the content is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Etag(String);

impl Etag {
    /// Wraps a raw eTag string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw eTag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Etag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Etag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A document as written to or read from the store.
///
/// An id of `None` means "let the store assign one" (rejected when
/// automatic id generation is disabled). The eTag and self link are
/// stamped by the store on every returned document and are absent on
/// locally constructed drafts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: Option<String>,
    etag: Option<Etag>,
    self_link: Option<DocumentLink>,
    body: Value,
}

impl Document {
    /// Creates a document with a caller-supplied id.
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: Some(id.into()),
            etag: None,
            self_link: None,
            body,
        }
    }

    /// Creates a document without an id, for automatic id generation.
    pub fn draft(body: Value) -> Self {
        Self {
            id: None,
            etag: None,
            self_link: None,
            body,
        }
    }

    /// Creates a document from a serializable value with a caller-supplied id.
    pub fn from_typed<T: Serialize>(
        id: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(id, serde_json::to_value(value)?))
    }

    /// Creates an id-less document from a serializable value.
    pub fn draft_typed<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::draft(serde_json::to_value(value)?))
    }

    /// Deserializes the body into a typed value.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.body.clone())
    }

    /// Returns the document id, if assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the document's current eTag, if known.
    pub fn etag(&self) -> Option<&Etag> {
        self.etag.as_ref()
    }

    /// Returns the store-assigned self link, if known.
    pub fn self_link(&self) -> Option<&DocumentLink> {
        self.self_link.as_ref()
    }

    /// Returns the opaque payload.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Consumes the document, returning the payload.
    pub fn into_body(self) -> Value {
        self.body
    }

    /// Returns a copy with the given id assigned.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns a copy with the given eTag stamped.
    ///
    /// Intended for store implementations building responses.
    pub fn with_etag(mut self, etag: Etag) -> Self {
        self.etag = Some(etag);
        self
    }

    /// Returns a copy with the given self link stamped.
    ///
    /// Intended for store implementations building responses.
    pub fn with_self_link(mut self, link: DocumentLink) -> Self {
        self.self_link = Some(link);
        self
    }
}
