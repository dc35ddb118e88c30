//! Repository layer for the testament registry.
//!
//! The core domain talks to persistence exclusively through the
//! [`DocumentStore`] trait: load-by-id, save-with-version-check,
//! specialized finders, and transactions for the rare cross-aggregate
//! operation. Aggregates are persisted as state snapshots; the domain
//! events recorded alongside each save feed downstream projections and
//! are never replayed into aggregate state.

pub mod error;
pub mod event;
pub mod memory;
pub mod query;
pub mod record;
pub mod store;

pub use common::{AggregateId, PersonId};
pub use error::{Result, StoreError};
pub use event::{EventId, EventRecord, Version};
pub use memory::InMemoryDocumentStore;
pub use query::DocumentQuery;
pub use record::DocumentRecord;
pub use store::{DocumentStore, DocumentTransaction};
