//! The convenience layer: try-style CRUD and the optimistic-lock
//! replace.
//!
//! Every method is a single pass-through to the wrapped
//! [`DocumentStore`], translating the store's expected-failure statuses
//! into [`TryOutcome`] variants. Unexpected failures propagate
//! unchanged. No retries, timeouts, or cancellation happen here.

use crate::document::{Document, Etag};
use crate::error::{ClientError, ClientResult, LockConflictError, LockError};
use crate::link::{CollectionLink, DocumentLink};
use crate::outcome::TryOutcome;
use crate::store::{DocumentStore, RequestOptions};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

/// A document store wrapped with try semantics.
///
/// Holds no state of its own beyond the wrapped client; all suspension
/// happens inside the delegated store call.
pub struct TryStore<S> {
    store: S,
}

impl<S: DocumentStore> TryStore<S> {
    /// Wraps a store client.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the wrapped client.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the wrapper, returning the wrapped client.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Reads the document at `link`.
    ///
    /// Returns [`TryOutcome::NotFound`] instead of failing when the
    /// store reports 404. Any other failure propagates unchanged.
    pub async fn try_read(&self, link: &DocumentLink) -> ClientResult<TryOutcome<Document>> {
        match self
            .store
            .read_document(link, &RequestOptions::default())
            .await
        {
            Ok(document) => Ok(TryOutcome::Found(document)),
            Err(err) if err.is_not_found() => {
                trace!(link = %link, "read absorbed: document not found");
                Ok(TryOutcome::NotFound)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Reads the document at `link` and deserializes its payload.
    pub async fn try_read_typed<T: DeserializeOwned>(
        &self,
        link: &DocumentLink,
    ) -> ClientResult<TryOutcome<T>> {
        match self.try_read(link).await? {
            TryOutcome::Found(document) => Ok(TryOutcome::Found(document.to_typed()?)),
            TryOutcome::NotFound => Ok(TryOutcome::NotFound),
            TryOutcome::Conflict => Ok(TryOutcome::Conflict),
        }
    }

    /// Creates `document` in `collection`.
    ///
    /// Returns [`TryOutcome::Conflict`] instead of failing when a
    /// document with the same id already exists; the store is left
    /// unchanged in that case. Any other failure propagates unchanged.
    pub async fn try_create(
        &self,
        collection: &CollectionLink,
        document: Document,
    ) -> ClientResult<TryOutcome<Document>> {
        self.try_create_with(collection, document, &RequestOptions::default())
            .await
    }

    /// Creates `document` in `collection` with explicit request
    /// options, e.g. to disable automatic id generation.
    pub async fn try_create_with(
        &self,
        collection: &CollectionLink,
        document: Document,
        options: &RequestOptions,
    ) -> ClientResult<TryOutcome<Document>> {
        match self
            .store
            .create_document(collection, document, options)
            .await
        {
            Ok(document) => Ok(TryOutcome::Found(document)),
            Err(err) if err.is_conflict() => {
                trace!(collection = %collection, "create absorbed: document already exists");
                Ok(TryOutcome::Conflict)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes the document at `link`.
    ///
    /// Returns [`TryOutcome::NotFound`] instead of failing when the
    /// store reports 404. Any other failure propagates unchanged.
    pub async fn try_delete(&self, link: &DocumentLink) -> ClientResult<TryOutcome<()>> {
        match self
            .store
            .delete_document(link, &RequestOptions::default())
            .await
        {
            Ok(()) => Ok(TryOutcome::Found(())),
            Err(err) if err.is_not_found() => {
                trace!(link = %link, "delete absorbed: document not found");
                Ok(TryOutcome::NotFound)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces the document at `link` with `document`'s payload.
    ///
    /// Returns [`TryOutcome::NotFound`] instead of failing when the
    /// store reports 404. Any other failure propagates unchanged.
    pub async fn try_replace(
        &self,
        link: &DocumentLink,
        document: Document,
    ) -> ClientResult<TryOutcome<Document>> {
        self.replace_inner(link, document, &RequestOptions::default())
            .await
    }

    /// Replaces a previously read document in place, addressed by its
    /// store-assigned self link.
    pub async fn try_replace_document(
        &self,
        document: &Document,
    ) -> ClientResult<TryOutcome<Document>> {
        let link = self_link_of(document)?;
        self.replace_inner(&link, document.clone(), &RequestOptions::default())
            .await
    }

    /// Replaces `document` only if the store's current eTag equals
    /// `expected_etag`.
    ///
    /// The document is addressed by its store-assigned self link. On a
    /// version mismatch (412) this fails with
    /// [`ClientError::LockConflict`] carrying the supplied token and
    /// the document; that conflict is an actionable condition, never
    /// absorbed. A missing document still surfaces as
    /// [`TryOutcome::NotFound`]. Single attempt; refetch-and-retry is
    /// the caller's decision.
    pub async fn replace_with_lock(
        &self,
        document: &Document,
        expected_etag: &Etag,
    ) -> ClientResult<TryOutcome<Document>> {
        let link = self_link_of(document)?;
        let options = RequestOptions::new().if_match(expected_etag.clone());
        match self.replace_inner(&link, document.clone(), &options).await {
            Err(ClientError::Store(err)) if err.is_precondition_failed() => {
                Err(LockConflictError::from_document(
                    link,
                    expected_etag.clone(),
                    document.clone(),
                    err,
                )
                .into())
            }
            other => other,
        }
    }

    /// Replaces `document` using its own eTag as the expected token.
    ///
    /// Fails with [`ClientError::Lock`] if the document carries no
    /// eTag, i.e. it was never read from the store.
    pub async fn replace_with_current_lock(
        &self,
        document: &Document,
    ) -> ClientResult<TryOutcome<Document>> {
        let expected = document
            .etag()
            .cloned()
            .ok_or_else(|| LockError::new("document carries no eTag to lock on"))?;
        self.replace_with_lock(document, &expected).await
    }

    /// Replaces the document at `link` with a raw payload only if the
    /// store's current eTag equals `expected_etag`.
    ///
    /// The conflict error carries the payload as an opaque object since
    /// no full document was available.
    pub async fn replace_with_lock_at(
        &self,
        link: &DocumentLink,
        payload: Value,
        expected_etag: &Etag,
    ) -> ClientResult<TryOutcome<Document>> {
        let mut request = Document::draft(payload.clone());
        if let Some(id) = link.document_id() {
            request = request.with_id(id);
        }

        let options = RequestOptions::new().if_match(expected_etag.clone());
        match self.replace_inner(link, request, &options).await {
            Err(ClientError::Store(err)) if err.is_precondition_failed() => {
                Err(LockConflictError::from_payload(
                    link.clone(),
                    expected_etag.clone(),
                    payload,
                    err,
                )
                .into())
            }
            other => other,
        }
    }

    /// Writes `document` to `collection`, creating it if absent or
    /// overwriting it if present.
    ///
    /// Upsert has no natural not-found or conflict case to absorb, so
    /// the resulting document is always returned.
    pub async fn upsert(
        &self,
        collection: &CollectionLink,
        document: Document,
    ) -> ClientResult<Document> {
        Ok(self
            .store
            .upsert_document(collection, document, &RequestOptions::default())
            .await?)
    }

    /// Upserts each document against `collection`, strictly in input
    /// order, returning the responses in the same order.
    ///
    /// One round trip per item; a server-side batch procedure is far
    /// cheaper for large inputs. The first failure aborts the loop and
    /// propagates.
    pub async fn upsert_each(
        &self,
        collection: &CollectionLink,
        documents: Vec<Document>,
    ) -> ClientResult<Vec<Document>> {
        let mut responses = Vec::with_capacity(documents.len());
        for document in documents {
            responses.push(self.upsert(collection, document).await?);
        }
        Ok(responses)
    }

    async fn replace_inner(
        &self,
        link: &DocumentLink,
        document: Document,
        options: &RequestOptions,
    ) -> ClientResult<TryOutcome<Document>> {
        match self.store.replace_document(link, document, options).await {
            Ok(document) => Ok(TryOutcome::Found(document)),
            Err(err) if err.is_not_found() => {
                trace!(link = %link, "replace absorbed: document not found");
                Ok(TryOutcome::NotFound)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn self_link_of(document: &Document) -> Result<DocumentLink, LockError> {
    document
        .self_link()
        .cloned()
        .ok_or_else(|| LockError::new("document carries no self link; read it from the store first"))
}

// The `TryStore` tests live in `tests/ops.rs`: they exercise the
// testkit's `InMemoryStore`, and `doctry_testkit` depends back on this
// crate, so in the dev-dependency cycle the in-crate test build is a
// distinct compilation whose `DocumentStore` the testkit does not
// implement.
