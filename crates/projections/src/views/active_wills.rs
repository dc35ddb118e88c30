//! Summary view of every will still in play.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{AggregateId, PersonId};
use domain::{WillEvent, WillStatus};
use repository::EventRecord;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::projection::Projection;

/// One row of the active-wills view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveWillSummary {
    pub will_id: AggregateId,
    pub testator_id: PersonId,
    pub testator_name: String,
    pub status: WillStatus,
    pub witness_count: usize,
    pub bequest_count: usize,
    pub codicil_count: usize,
    pub updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    rows: HashMap<AggregateId, ActiveWillSummary>,
    position: u64,
}

/// Tracks every non-terminal will with a handful of counters the
/// dashboard needs. Terminal documents (executed, superseded) drop out
/// of the view.
#[derive(Default)]
pub struct ActiveWillsProjection {
    inner: Arc<RwLock<Inner>>,
}

impl ActiveWillsProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The summary for one will, if it is still in play.
    pub async fn get(&self, will_id: AggregateId) -> Option<ActiveWillSummary> {
        self.inner.read().await.rows.get(&will_id).cloned()
    }

    /// All wills currently in a given status.
    pub async fn by_status(&self, status: WillStatus) -> Vec<ActiveWillSummary> {
        self.inner
            .read()
            .await
            .rows
            .values()
            .filter(|row| row.status == status)
            .cloned()
            .collect()
    }

    /// All wills belonging to a testator.
    pub async fn for_testator(&self, testator_id: PersonId) -> Vec<ActiveWillSummary> {
        self.inner
            .read()
            .await
            .rows
            .values()
            .filter(|row| row.testator_id == testator_id)
            .cloned()
            .collect()
    }

    /// Number of wills in the view.
    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.rows.is_empty()
    }
}

#[async_trait]
impl Projection for ActiveWillsProjection {
    fn name(&self) -> &'static str {
        "active_wills"
    }

    async fn apply(&self, record: &EventRecord) -> Result<()> {
        let event: WillEvent = serde_json::from_value(record.payload.clone())?;
        let mut inner = self.inner.write().await;

        match &event {
            WillEvent::WillCreated {
                will_id,
                testator_id,
                testator_name,
                ..
            } => {
                inner.rows.insert(
                    *will_id,
                    ActiveWillSummary {
                        will_id: *will_id,
                        testator_id: *testator_id,
                        testator_name: testator_name.clone(),
                        status: WillStatus::Draft,
                        witness_count: 0,
                        bequest_count: 0,
                        codicil_count: 0,
                        updated_at: record.recorded_at,
                    },
                );
            }
            WillEvent::WitnessAdded { will_id, .. } => {
                if let Some(row) = inner.rows.get_mut(will_id) {
                    row.witness_count += 1;
                    row.updated_at = record.recorded_at;
                }
            }
            WillEvent::WitnessRejected { will_id, .. } => {
                if let Some(row) = inner.rows.get_mut(will_id) {
                    row.witness_count = row.witness_count.saturating_sub(1);
                    row.updated_at = record.recorded_at;
                }
            }
            WillEvent::BequestAdded { will_id, .. } => {
                if let Some(row) = inner.rows.get_mut(will_id) {
                    row.bequest_count += 1;
                    row.updated_at = record.recorded_at;
                }
            }
            WillEvent::BequestRevoked { will_id, .. } => {
                if let Some(row) = inner.rows.get_mut(will_id) {
                    row.bequest_count = row.bequest_count.saturating_sub(1);
                    row.updated_at = record.recorded_at;
                }
            }
            WillEvent::CodicilAdded { will_id, .. } => {
                if let Some(row) = inner.rows.get_mut(will_id) {
                    row.codicil_count += 1;
                    row.updated_at = record.recorded_at;
                }
            }
            other => {
                if let Some(status) = other.status_after() {
                    let will_id = other.will_id();
                    if status.is_terminal() {
                        inner.rows.remove(&will_id);
                    } else if let Some(row) = inner.rows.get_mut(&will_id) {
                        row.status = status;
                        row.updated_at = record.recorded_at;
                    }
                }
            }
        }

        inner.position = record.sequence;
        Ok(())
    }

    async fn position(&self) -> u64 {
        self.inner.read().await.position
    }

    async fn reset(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.rows.clear();
        inner.position = 0;
        Ok(())
    }
}
