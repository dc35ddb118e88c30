use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AggregateId, PersonId, Version};

/// A persisted snapshot of a document aggregate.
///
/// The aggregate state is stored as opaque JSON; the remaining fields are
/// the index columns the specialized finders need. The domain layer
/// extracts them when it builds a record for saving, so the store never
/// has to understand the aggregate's internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// The document's identity.
    pub document_id: AggregateId,

    /// The type of aggregate (e.g. "Will").
    pub aggregate_type: String,

    /// The testator who owns the document.
    pub owner: Option<PersonId>,

    /// Current lifecycle status tag (e.g. "Active").
    pub status: String,

    /// Registered persons nominated as executors on this document.
    pub nominated_executors: Vec<PersonId>,

    /// Version after the save that produced this record.
    pub version: Version,

    /// When the record was last saved.
    pub updated_at: DateTime<Utc>,

    /// The serialized aggregate state.
    pub state: serde_json::Value,
}

impl DocumentRecord {
    /// Creates a record from a serializable aggregate state.
    pub fn from_state<T: Serialize>(
        document_id: AggregateId,
        aggregate_type: impl Into<String>,
        owner: Option<PersonId>,
        status: impl Into<String>,
        nominated_executors: Vec<PersonId>,
        version: Version,
        state: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            document_id,
            aggregate_type: aggregate_type.into(),
            owner,
            status: status.into(),
            nominated_executors,
            version,
            updated_at: Utc::now(),
            state: serde_json::to_value(state)?,
        })
    }

    /// Deserializes the stored state into a concrete aggregate type.
    pub fn into_state<T: for<'de> Deserialize<'de>>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.state)
    }

    /// Deserializes the stored state without consuming the record.
    pub fn to_state<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.state.clone())
    }
}
