use async_trait::async_trait;

use crate::{AggregateId, DocumentQuery, DocumentRecord, EventRecord, PersonId, Result, Version};

/// Core trait for document store implementations.
///
/// A document store persists aggregate snapshots with optimistic
/// concurrency and records the domain events emitted by each save for
/// downstream projections. All implementations must be thread-safe.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Retrieves a document by its identity.
    async fn find_by_id(&self, document_id: AggregateId) -> Result<Option<DocumentRecord>>;

    /// Returns the current version of a document, or None if it does not exist.
    async fn get_version(&self, document_id: AggregateId) -> Result<Option<Version>>;

    /// Saves a document snapshot together with the events the mutation emitted.
    ///
    /// `expected` is the version the caller read before mutating
    /// ([`Version::initial`] for a new document). The save fails with
    /// [`StoreError::ConcurrencyConflict`](crate::StoreError::ConcurrencyConflict)
    /// if the stored version no longer matches; the caller must reload and
    /// reapply. On success the record and all events are persisted
    /// atomically and the new version is returned.
    async fn save(
        &self,
        record: DocumentRecord,
        expected: Version,
        events: Vec<EventRecord>,
    ) -> Result<Version>;

    /// Retrieves documents owned by a testator in a given status.
    async fn find_by_owner_and_status(
        &self,
        owner: PersonId,
        status: &str,
    ) -> Result<Vec<DocumentRecord>>;

    /// Retrieves all documents in a given status.
    async fn find_by_status(&self, status: &str) -> Result<Vec<DocumentRecord>>;

    /// Retrieves documents on which a person is nominated as executor.
    async fn find_by_nominated_executor(&self, executor: PersonId)
    -> Result<Vec<DocumentRecord>>;

    /// Retrieves documents matching a filter/paginate query.
    async fn search(&self, query: DocumentQuery) -> Result<Vec<DocumentRecord>>;

    /// Retrieves all recorded events for a document, in emission order.
    async fn events_for_document(&self, document_id: AggregateId) -> Result<Vec<EventRecord>>;

    /// Retrieves all events with a sequence strictly greater than `sequence`.
    ///
    /// Projections use this to catch up from their last checkpoint.
    async fn events_since(&self, sequence: u64) -> Result<Vec<EventRecord>>;

    /// Retrieves events by type, in emission order.
    async fn events_by_type(&self, event_type: &str) -> Result<Vec<EventRecord>>;

    /// Begins a transaction spanning multiple documents.
    ///
    /// Needed for the rare operation that must commit changes to two
    /// documents atomically (e.g. superseding one will while activating
    /// another): both saves apply, or neither does.
    async fn begin_transaction(&self) -> Result<Box<dyn DocumentTransaction>>;
}

/// A transaction over one or more documents.
///
/// Reads taken through [`find_for_update`](Self::find_for_update) are
/// version-checked again at commit time (the lock-for-update hint), so a
/// document read inside the transaction cannot have been changed by
/// another caller when the transaction commits.
#[async_trait]
pub trait DocumentTransaction: Send {
    /// Retrieves a document and registers its version for commit-time validation.
    async fn find_for_update(
        &mut self,
        document_id: AggregateId,
    ) -> Result<Option<DocumentRecord>>;

    /// Stages a save to be applied at commit.
    fn stage(&mut self, record: DocumentRecord, expected: Version, events: Vec<EventRecord>);

    /// Atomically applies all staged saves.
    ///
    /// Fails with a concurrency conflict (and applies nothing) if any
    /// staged or read-locked document has moved past its expected version.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discards all staged saves.
    async fn rollback(self: Box<Self>) -> Result<()>;
}
