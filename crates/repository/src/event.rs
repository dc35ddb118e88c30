use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AggregateId;

/// Unique identifier for a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version number for a document, used for optimistic concurrency control.
///
/// Versions start at 1 for the first save and increment by 1 for each
/// subsequent save of the document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the initial version (0) for a document that has never been saved.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the first version (1) for the first save.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// A domain event recorded alongside a document save.
///
/// Event records carry the aggregate identity, a type tag, the document
/// version at emission, and a small primitive payload. They exist for
/// downstream projections and notifications only. Document state is
/// persisted as a snapshot and never reconstructed from these records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// Global insertion order assigned by the store. Zero until stored.
    pub sequence: u64,

    /// The type of the event (e.g. "WillCreated", "WitnessSigned").
    pub event_type: String,

    /// The document this event belongs to.
    pub document_id: AggregateId,

    /// The type of aggregate (e.g. "Will").
    pub aggregate_type: String,

    /// The version of the document after the save that emitted this event.
    pub version: Version,

    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,

    /// The event payload as JSON.
    pub payload: serde_json::Value,

    /// Additional metadata (actor, correlation id).
    pub metadata: HashMap<String, serde_json::Value>,
}

impl EventRecord {
    /// Creates a new event record for a document.
    pub fn new(
        document_id: AggregateId,
        aggregate_type: impl Into<String>,
        event_type: impl Into<String>,
        version: Version,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            sequence: 0,
            event_type: event_type.into(),
            document_id,
            aggregate_type: aggregate_type.into(),
            version,
            recorded_at: Utc::now(),
            payload,
            metadata: HashMap::new(),
        }
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
