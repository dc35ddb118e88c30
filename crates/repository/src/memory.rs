use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    AggregateId, DocumentQuery, DocumentRecord, EventRecord, PersonId, Result, StoreError,
    Version,
    store::{DocumentStore, DocumentTransaction},
};

#[derive(Default)]
struct Inner {
    documents: HashMap<AggregateId, DocumentRecord>,
    events: Vec<EventRecord>,
    next_sequence: u64,
}

impl Inner {
    fn current_version(&self, document_id: AggregateId) -> Version {
        self.documents
            .get(&document_id)
            .map(|r| r.version)
            .unwrap_or(Version::initial())
    }

    fn apply_save(
        &mut self,
        mut record: DocumentRecord,
        expected: Version,
        events: Vec<EventRecord>,
    ) -> Result<Version> {
        let current = self.current_version(record.document_id);
        if current != expected {
            return Err(StoreError::ConcurrencyConflict {
                document_id: record.document_id,
                expected,
                actual: current,
            });
        }

        let new_version = expected.next();
        record.version = new_version;
        record.updated_at = Utc::now();

        for mut event in events {
            self.next_sequence += 1;
            event.sequence = self.next_sequence;
            event.version = new_version;
            self.events.push(event);
        }

        self.documents.insert(record.document_id, record);
        Ok(new_version)
    }
}

/// In-memory document store for testing and the reference implementation
/// of the repository contract.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of recorded events.
    pub async fn event_count(&self) -> usize {
        self.inner.read().await.events.len()
    }

    /// Returns the total number of stored documents.
    pub async fn document_count(&self) -> usize {
        self.inner.read().await.documents.len()
    }

    /// Clears all documents and events.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.documents.clear();
        inner.events.clear();
        inner.next_sequence = 0;
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_by_id(&self, document_id: AggregateId) -> Result<Option<DocumentRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.documents.get(&document_id).cloned())
    }

    async fn get_version(&self, document_id: AggregateId) -> Result<Option<Version>> {
        let inner = self.inner.read().await;
        Ok(inner.documents.get(&document_id).map(|r| r.version))
    }

    async fn save(
        &self,
        record: DocumentRecord,
        expected: Version,
        events: Vec<EventRecord>,
    ) -> Result<Version> {
        let mut inner = self.inner.write().await;
        inner.apply_save(record, expected, events)
    }

    async fn find_by_owner_and_status(
        &self,
        owner: PersonId,
        status: &str,
    ) -> Result<Vec<DocumentRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .values()
            .filter(|r| r.owner == Some(owner) && r.status == status)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: &str) -> Result<Vec<DocumentRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    async fn find_by_nominated_executor(
        &self,
        executor: PersonId,
    ) -> Result<Vec<DocumentRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .values()
            .filter(|r| r.nominated_executors.contains(&executor))
            .cloned()
            .collect())
    }

    async fn search(&self, query: DocumentQuery) -> Result<Vec<DocumentRecord>> {
        let inner = self.inner.read().await;
        let mut results: Vec<_> = inner
            .documents
            .values()
            .filter(|r| {
                if let Some(owner) = query.owner {
                    if r.owner != Some(owner) {
                        return false;
                    }
                }
                if let Some(ref statuses) = query.statuses {
                    if !statuses.contains(&r.status) {
                        return false;
                    }
                }
                if let Some(executor) = query.nominated_executor {
                    if !r.nominated_executors.contains(&executor) {
                        return false;
                    }
                }
                if let Some(after) = query.updated_after {
                    if r.updated_at < after {
                        return false;
                    }
                }
                if let Some(before) = query.updated_before {
                    if r.updated_at > before {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        results.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));

        let offset = query.offset.unwrap_or(0);
        let results: Vec<_> = results.into_iter().skip(offset).collect();

        let results = if let Some(limit) = query.limit {
            results.into_iter().take(limit).collect()
        } else {
            results
        };

        Ok(results)
    }

    async fn events_for_document(&self, document_id: AggregateId) -> Result<Vec<EventRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .events
            .iter()
            .filter(|e| e.document_id == document_id)
            .cloned()
            .collect())
    }

    async fn events_since(&self, sequence: u64) -> Result<Vec<EventRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .events
            .iter()
            .filter(|e| e.sequence > sequence)
            .cloned()
            .collect())
    }

    async fn events_by_type(&self, event_type: &str) -> Result<Vec<EventRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .events
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect())
    }

    async fn begin_transaction(&self) -> Result<Box<dyn DocumentTransaction>> {
        Ok(Box::new(InMemoryTransaction {
            inner: Arc::clone(&self.inner),
            staged: Vec::new(),
            read_versions: Vec::new(),
            open: true,
        }))
    }
}

/// Transaction over the in-memory store.
///
/// Saves are buffered and applied under a single write lock at commit.
/// Versions read through `find_for_update` are re-validated before any
/// staged save is applied.
struct InMemoryTransaction {
    inner: Arc<RwLock<Inner>>,
    staged: Vec<(DocumentRecord, Version, Vec<EventRecord>)>,
    read_versions: Vec<(AggregateId, Version)>,
    open: bool,
}

#[async_trait]
impl DocumentTransaction for InMemoryTransaction {
    async fn find_for_update(
        &mut self,
        document_id: AggregateId,
    ) -> Result<Option<DocumentRecord>> {
        if !self.open {
            return Err(StoreError::TransactionClosed);
        }
        let inner = self.inner.read().await;
        let record = inner.documents.get(&document_id).cloned();
        let version = record
            .as_ref()
            .map(|r| r.version)
            .unwrap_or(Version::initial());
        self.read_versions.push((document_id, version));
        Ok(record)
    }

    fn stage(&mut self, record: DocumentRecord, expected: Version, events: Vec<EventRecord>) {
        self.staged.push((record, expected, events));
    }

    async fn commit(mut self: Box<Self>) -> Result<()> {
        if !self.open {
            return Err(StoreError::TransactionClosed);
        }
        self.open = false;

        let mut inner = self.inner.write().await;

        // Validate every read lock and staged expectation before touching state.
        for (document_id, read_version) in &self.read_versions {
            let current = inner.current_version(*document_id);
            if current != *read_version {
                return Err(StoreError::ConcurrencyConflict {
                    document_id: *document_id,
                    expected: *read_version,
                    actual: current,
                });
            }
        }
        for (record, expected, _) in &self.staged {
            let current = inner.current_version(record.document_id);
            if current != *expected {
                return Err(StoreError::ConcurrencyConflict {
                    document_id: record.document_id,
                    expected: *expected,
                    actual: current,
                });
            }
        }

        for (record, expected, events) in self.staged.drain(..) {
            inner.apply_save(record, expected, events)?;
        }

        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        if !self.open {
            return Err(StoreError::TransactionClosed);
        }
        self.open = false;
        self.staged.clear();
        Ok(())
    }
}
