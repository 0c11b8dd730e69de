//! Resource locators for databases, collections, and documents.
//!
//! The store addresses a document either by a composite
//! (database-id, collection-id, document-id) triple or by an opaque
//! resource path. The composite form is normalized into the path form
//! at construction time; everything downstream works with paths only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A locator for a collection within a database.
///
/// Canonical form: `dbs/{database}/colls/{collection}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionLink {
    path: String,
}

impl CollectionLink {
    /// Creates a collection link from a (database-id, collection-id) pair.
    ///
    /// Ids must not contain `/`.
    pub fn new(database_id: impl AsRef<str>, collection_id: impl AsRef<str>) -> Self {
        Self {
            path: format!(
                "dbs/{}/colls/{}",
                database_id.as_ref(),
                collection_id.as_ref()
            ),
        }
    }

    /// Accepts an already-formed resource path as-is.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the resource path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the link of a document within this collection.
    pub fn document(&self, document_id: impl AsRef<str>) -> DocumentLink {
        DocumentLink {
            path: format!("{}/docs/{}", self.path, document_id.as_ref()),
        }
    }
}

impl fmt::Display for CollectionLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A locator for a single document.
///
/// Canonical form: `dbs/{database}/colls/{collection}/docs/{document}`.
/// An opaque path accepted via [`DocumentLink::from_path`] is passed to
/// the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentLink {
    path: String,
}

impl DocumentLink {
    /// Creates a document link from the composite id triple.
    ///
    /// Ids must not contain `/`.
    pub fn new(
        database_id: impl AsRef<str>,
        collection_id: impl AsRef<str>,
        document_id: impl AsRef<str>,
    ) -> Self {
        CollectionLink::new(database_id, collection_id).document(document_id)
    }

    /// Accepts an already-formed resource path as-is.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the resource path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the trailing document id when the path follows the
    /// canonical `…/docs/{id}` shape.
    pub fn document_id(&self) -> Option<&str> {
        let (prefix, id) = self.path.rsplit_once("/docs/")?;
        if prefix.is_empty() || id.is_empty() || id.contains('/') {
            return None;
        }
        Some(id)
    }

    /// Returns the link of the collection holding this document, when
    /// the path follows the canonical shape.
    pub fn collection(&self) -> Option<CollectionLink> {
        let (prefix, _) = self.path.rsplit_once("/docs/")?;
        if prefix.is_empty() {
            return None;
        }
        Some(CollectionLink {
            path: prefix.to_string(),
        })
    }
}

impl fmt::Display for DocumentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn composite_triple_normalizes_to_path() {
        let link = DocumentLink::new("shop", "orders", "42");
        assert_eq!(link.path(), "dbs/shop/colls/orders/docs/42");
    }

    #[test]
    fn collection_document_round_trip() {
        let coll = CollectionLink::new("shop", "orders");
        let link = coll.document("42");
        assert_eq!(link.document_id(), Some("42"));
        assert_eq!(link.collection(), Some(coll));
    }

    #[test]
    fn opaque_path_is_kept_verbatim() {
        let link = DocumentLink::from_path("dbs/x/colls/y/docs/z");
        assert_eq!(link, DocumentLink::new("x", "y", "z"));

        let odd = DocumentLink::from_path("some/other/shape");
        assert_eq!(odd.path(), "some/other/shape");
        assert_eq!(odd.document_id(), None);
        assert_eq!(odd.collection(), None);
    }

    #[test]
    fn serde_round_trip_as_plain_string() {
        let link = DocumentLink::new("a", "b", "c");
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(json, "\"dbs/a/colls/b/docs/c\"");
        let back: DocumentLink = serde_json::from_str(&json).unwrap();
        assert_eq!(back, link);
    }

    proptest! {
        #[test]
        fn document_id_survives_normalization(
            db in "[A-Za-z0-9_-]{1,16}",
            coll in "[A-Za-z0-9_-]{1,16}",
            doc in "[A-Za-z0-9_-]{1,16}",
        ) {
            let link = DocumentLink::new(&db, &coll, &doc);
            prop_assert_eq!(link.document_id(), Some(doc.as_str()));
            prop_assert_eq!(
                link.collection(),
                Some(CollectionLink::new(&db, &coll))
            );
        }
    }
}
