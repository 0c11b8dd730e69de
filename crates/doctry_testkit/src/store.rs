//! In-memory document store with real conditional-write semantics.

use doctry_client::{
    CollectionLink, Document, DocumentLink, DocumentStore, Etag, RequestOptions, StoreError,
    StoreResult,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use uuid::Uuid;

/// An in-memory [`DocumentStore`] for tests.
///
/// Behaves like the real store at the boundary this layer cares about:
/// 404 on missing documents, 409 on duplicate creates, 412 on If-Match
/// mismatches, a fresh eTag on every successful write, automatic uuid
/// id assignment unless disabled, and self link plus eTag stamped on
/// every returned document.
///
/// Every call is appended to an ordered journal so tests can assert
/// sequential single-shot behavior, and a single error can be queued to
/// fail the next call regardless of its arguments.
#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<String, Document>>,
    journal: Mutex<Vec<String>>,
    injected: Mutex<Option<StoreError>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Returns true if a document exists at `link`.
    pub fn contains(&self, link: &DocumentLink) -> bool {
        self.documents.read().contains_key(link.path())
    }

    /// Returns the current eTag of the document at `link`, if present.
    pub fn etag_of(&self, link: &DocumentLink) -> Option<Etag> {
        self.documents
            .read()
            .get(link.path())
            .and_then(|doc| doc.etag().cloned())
    }

    /// Returns the ordered journal of calls made so far.
    pub fn calls(&self) -> Vec<String> {
        self.journal.lock().clone()
    }

    /// Returns the number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.journal.lock().len()
    }

    /// Clears the call journal.
    pub fn clear_calls(&self) {
        self.journal.lock().clear();
    }

    /// Queues an error to be returned by the next call, whatever it is.
    pub fn inject_error(&self, error: StoreError) {
        *self.injected.lock() = Some(error);
    }

    fn record(&self, op: &str, path: &str) -> StoreResult<()> {
        self.journal.lock().push(format!("{op} {path}"));
        match self.injected.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fresh_etag() -> Etag {
        Etag::new(Uuid::new_v4().to_string())
    }

    fn resolve_id(document: &Document, options: &RequestOptions) -> StoreResult<String> {
        match document.id() {
            Some(id) => Ok(id.to_string()),
            None if options.disable_automatic_id_generation => Err(StoreError::bad_request(
                "automatic id generation is disabled and the document has no id",
            )),
            None => Ok(Uuid::new_v4().to_string()),
        }
    }

    fn check_if_match(
        stored: &Document,
        link: &DocumentLink,
        options: &RequestOptions,
    ) -> StoreResult<()> {
        if let Some(expected) = &options.if_match {
            if stored.etag() != Some(expected) {
                return Err(StoreError::precondition_failed(link));
            }
        }
        Ok(())
    }

    fn stamp(document: Document, id: &str, link: &DocumentLink) -> Document {
        document
            .with_id(id)
            .with_etag(Self::fresh_etag())
            .with_self_link(link.clone())
    }
}

impl DocumentStore for InMemoryStore {
    async fn read_document(
        &self,
        link: &DocumentLink,
        _options: &RequestOptions,
    ) -> StoreResult<Document> {
        self.record("read", link.path())?;
        self.documents
            .read()
            .get(link.path())
            .cloned()
            .ok_or_else(|| StoreError::not_found(link))
    }

    async fn create_document(
        &self,
        collection: &CollectionLink,
        document: Document,
        options: &RequestOptions,
    ) -> StoreResult<Document> {
        self.record("create", collection.path())?;
        let id = Self::resolve_id(&document, options)?;
        let link = collection.document(&id);

        let mut documents = self.documents.write();
        if documents.contains_key(link.path()) {
            return Err(StoreError::conflict(&id));
        }

        let stored = Self::stamp(document, &id, &link);
        documents.insert(link.path().to_string(), stored.clone());
        Ok(stored)
    }

    async fn replace_document(
        &self,
        link: &DocumentLink,
        document: Document,
        options: &RequestOptions,
    ) -> StoreResult<Document> {
        self.record("replace", link.path())?;

        let mut documents = self.documents.write();
        let existing = documents
            .get(link.path())
            .ok_or_else(|| StoreError::not_found(link))?;
        Self::check_if_match(existing, link, options)?;

        // A replace keeps the stored identity; only the payload moves.
        let id = existing.id().unwrap_or_default().to_string();
        let stored = Self::stamp(document, &id, link);
        documents.insert(link.path().to_string(), stored.clone());
        Ok(stored)
    }

    async fn delete_document(
        &self,
        link: &DocumentLink,
        options: &RequestOptions,
    ) -> StoreResult<()> {
        self.record("delete", link.path())?;

        let mut documents = self.documents.write();
        let existing = documents
            .get(link.path())
            .ok_or_else(|| StoreError::not_found(link))?;
        Self::check_if_match(existing, link, options)?;

        documents.remove(link.path());
        Ok(())
    }

    async fn upsert_document(
        &self,
        collection: &CollectionLink,
        document: Document,
        options: &RequestOptions,
    ) -> StoreResult<Document> {
        self.record("upsert", collection.path())?;
        let id = Self::resolve_id(&document, options)?;
        let link = collection.document(&id);

        let mut documents = self.documents.write();
        if let Some(existing) = documents.get(link.path()) {
            Self::check_if_match(existing, &link, options)?;
        }

        let stored = Self::stamp(document, &id, &link);
        documents.insert(link.path().to_string(), stored.clone());
        Ok(stored)
    }
}
