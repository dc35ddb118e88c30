//! Contest-risk register built from disinheritance events.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::AggregateId;
use domain::services::{RiskLevel, RiskScorer};
use domain::{DisinheritanceId, DisinheritanceReason, DisinheritanceSeverity, WillEvent};
use repository::EventRecord;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::projection::Projection;

/// One scored exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub will_id: AggregateId,
    pub disinheritance_id: DisinheritanceId,
    pub excluded_name: String,
    pub reason: DisinheritanceReason,
    pub severity: DisinheritanceSeverity,
    pub risk_points: u32,
    pub risk_level: RiskLevel,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<DisinheritanceId, RiskEntry>,
    position: u64,
}

/// Caches contest-risk scores for every exclusion in the registry, so
/// review queues can be sorted without rehydrating aggregates. Entries
/// for a will disappear when the document reaches a terminal status.
#[derive(Default)]
pub struct DisinheritanceRiskProjection {
    inner: Arc<RwLock<Inner>>,
}

impl DisinheritanceRiskProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// All scored exclusions for one will.
    pub async fn for_will(&self, will_id: AggregateId) -> Vec<RiskEntry> {
        self.inner
            .read()
            .await
            .entries
            .values()
            .filter(|entry| entry.will_id == will_id)
            .cloned()
            .collect()
    }

    /// Every exclusion at or above a risk level, worst first.
    pub async fn at_or_above(&self, level: RiskLevel) -> Vec<RiskEntry> {
        let mut entries: Vec<_> = self
            .inner
            .read()
            .await
            .entries
            .values()
            .filter(|entry| entry.risk_level >= level)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.risk_points.cmp(&a.risk_points));
        entries
    }

    /// The worst risk level on a will, if it has exclusions.
    pub async fn worst_for_will(&self, will_id: AggregateId) -> Option<RiskLevel> {
        self.inner
            .read()
            .await
            .entries
            .values()
            .filter(|entry| entry.will_id == will_id)
            .map(|entry| entry.risk_level)
            .max()
    }
}

#[async_trait]
impl Projection for DisinheritanceRiskProjection {
    fn name(&self) -> &'static str {
        "disinheritance_risk"
    }

    async fn apply(&self, record: &EventRecord) -> Result<()> {
        let event: WillEvent = serde_json::from_value(record.payload.clone())?;
        let mut inner = self.inner.write().await;

        match &event {
            WillEvent::DisinheritanceAdded {
                will_id,
                disinheritance_id,
                excluded,
                relationship,
                reason,
                severity,
            } => {
                let points = RiskScorer::points_for(*relationship, *reason, *severity);
                inner.entries.insert(
                    *disinheritance_id,
                    RiskEntry {
                        will_id: *will_id,
                        disinheritance_id: *disinheritance_id,
                        excluded_name: excluded.display_name().to_string(),
                        reason: *reason,
                        severity: *severity,
                        risk_points: points,
                        risk_level: RiskScorer::level_for(points),
                        recorded_at: record.recorded_at,
                    },
                );
            }
            other => {
                if other.status_after().is_some_and(|s| s.is_terminal()) {
                    let will_id = other.will_id();
                    inner.entries.retain(|_, entry| entry.will_id != will_id);
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
        inner.entries.clear();
        inner.position = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use domain::{PartyRef, Relationship};

    use super::*;

    fn record_for(event: &WillEvent, sequence: u64) -> EventRecord {
        let mut record = EventRecord::new(
            event.will_id(),
            "Will",
            event.event_type(),
            repository::Version::new(sequence as i64),
            serde_json::to_value(event).unwrap(),
        );
        record.sequence = sequence;
        record
    }

    fn exclusion(
        will_id: AggregateId,
        name: &str,
        relationship: Relationship,
        reason: DisinheritanceReason,
        severity: DisinheritanceSeverity,
    ) -> WillEvent {
        WillEvent::DisinheritanceAdded {
            will_id,
            disinheritance_id: DisinheritanceId::new(),
            excluded: PartyRef::external(name, None),
            relationship,
            reason,
            severity,
        }
    }

    #[tokio::test]
    async fn scores_exclusions_from_the_event_alone() {
        let view = DisinheritanceRiskProjection::new();
        let will_id = AggregateId::new();

        view.apply(&record_for(
            &exclusion(
                will_id,
                "Estranged Child",
                Relationship::Child,
                DisinheritanceReason::Estrangement,
                DisinheritanceSeverity::Complete,
            ),
            1,
        ))
        .await
        .unwrap();

        let entries = view.for_will(will_id).await;
        assert_eq!(entries.len(), 1);
        // child (30) + estrangement (15) + complete (30)
        assert_eq!(entries[0].risk_points, 75);
        assert_eq!(entries[0].risk_level, RiskLevel::Severe);
        assert_eq!(view.worst_for_will(will_id).await, Some(RiskLevel::Severe));
    }

    #[tokio::test]
    async fn review_queue_is_sorted_worst_first() {
        let view = DisinheritanceRiskProjection::new();
        let will_id = AggregateId::new();

        view.apply(&record_for(
            &exclusion(
                will_id,
                "Outsider",
                Relationship::Other,
                DisinheritanceReason::CourtOrder,
                DisinheritanceSeverity::Partial,
            ),
            1,
        ))
        .await
        .unwrap();
        view.apply(&record_for(
            &exclusion(
                will_id,
                "Spouse",
                Relationship::Spouse,
                DisinheritanceReason::PersonalReasons,
                DisinheritanceSeverity::Complete,
            ),
            2,
        ))
        .await
        .unwrap();
        view.apply(&record_for(
            &exclusion(
                will_id,
                "Sibling",
                Relationship::Sibling,
                DisinheritanceReason::Estrangement,
                DisinheritanceSeverity::Conditional,
            ),
            3,
        ))
        .await
        .unwrap();

        let queue = view.at_or_above(RiskLevel::Moderate).await;
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].excluded_name, "Spouse");
        assert_eq!(queue[0].risk_level, RiskLevel::Extreme);
        assert_eq!(queue[1].excluded_name, "Sibling");
    }

    #[tokio::test]
    async fn entries_drop_when_the_will_terminates() {
        let view = DisinheritanceRiskProjection::new();
        let will_id = AggregateId::new();

        view.apply(&record_for(
            &exclusion(
                will_id,
                "Estranged Child",
                Relationship::Child,
                DisinheritanceReason::Estrangement,
                DisinheritanceSeverity::Complete,
            ),
            1,
        ))
        .await
        .unwrap();
        view.apply(&record_for(
            &WillEvent::WillExecuted {
                will_id,
                executed_at: Utc::now(),
            },
            2,
        ))
        .await
        .unwrap();

        assert!(view.for_will(will_id).await.is_empty());
        assert_eq!(view.position().await, 2);
    }
}
