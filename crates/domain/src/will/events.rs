//! Domain events emitted by the will aggregate.
//!
//! Events describe what happened; they are published for projections and
//! notification and are never replayed to rebuild aggregate state. The
//! document record itself is the source of truth.

use chrono::{DateTime, Utc};
use common::{AggregateId, PersonId};
use serde::{Deserialize, Serialize};

use super::bequest::{BequestId, ShareSpec};
use super::codicil::{AmendmentKind, CodicilId};
use super::disinheritance::{DisinheritanceId, DisinheritanceReason, DisinheritanceSeverity};
use super::executor::{ExecutorId, ExecutorTier, NominationStatus};
use super::state::WillStatus;
use super::values::{DocumentType, PartyRef, Relationship};
use super::witness::WitnessId;

/// Everything that can happen to a will.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WillEvent {
    WillCreated {
        will_id: AggregateId,
        testator_id: PersonId,
        testator_name: String,
        document_type: DocumentType,
    },
    CapacityDeclared {
        will_id: AggregateId,
        assessed_by: String,
        of_sound_mind: bool,
        declared_at: DateTime<Utc>,
    },
    ClauseUpdated {
        will_id: AggregateId,
        clause: String,
    },
    WitnessAdded {
        will_id: AggregateId,
        witness_id: WitnessId,
        name: String,
        relationship: Relationship,
    },
    WitnessSigned {
        will_id: AggregateId,
        witness_id: WitnessId,
        name: String,
        signed_at: DateTime<Utc>,
    },
    WitnessVerified {
        will_id: AggregateId,
        witness_id: WitnessId,
        name: String,
    },
    WitnessRejected {
        will_id: AggregateId,
        witness_id: WitnessId,
        name: String,
        reason: String,
    },
    ExecutorAdded {
        will_id: AggregateId,
        executor_id: ExecutorId,
        name: String,
        tier: ExecutorTier,
    },
    ExecutorNotified {
        will_id: AggregateId,
        executor_id: ExecutorId,
        name: String,
    },
    ExecutorResponded {
        will_id: AggregateId,
        executor_id: ExecutorId,
        name: String,
        status: NominationStatus,
    },
    ExecutorRemoved {
        will_id: AggregateId,
        executor_id: ExecutorId,
        name: String,
    },
    BequestAdded {
        will_id: AggregateId,
        bequest_id: BequestId,
        beneficiary: PartyRef,
        share: ShareSpec,
    },
    BequestRevoked {
        will_id: AggregateId,
        bequest_id: BequestId,
        beneficiary: PartyRef,
    },
    CodicilAdded {
        will_id: AggregateId,
        codicil_id: CodicilId,
        sequence: u32,
        amendment: AmendmentKind,
        summary: String,
    },
    CodicilWitnessSigned {
        will_id: AggregateId,
        codicil_id: CodicilId,
        witness_name: String,
        attested: bool,
    },
    DisinheritanceAdded {
        will_id: AggregateId,
        disinheritance_id: DisinheritanceId,
        excluded: PartyRef,
        relationship: Relationship,
        reason: DisinheritanceReason,
        severity: DisinheritanceSeverity,
    },
    AttestationRequested {
        will_id: AggregateId,
        witness_count: usize,
    },
    WillAttested {
        will_id: AggregateId,
        executed_at: DateTime<Utc>,
        location: String,
        witness_count: usize,
    },
    WillActivated {
        will_id: AggregateId,
        activated_at: DateTime<Utc>,
    },
    WillContested {
        will_id: AggregateId,
        contested_by: String,
        grounds: String,
    },
    ContestResolved {
        will_id: AggregateId,
        upheld: bool,
        resolution: String,
    },
    ProbateOpened {
        will_id: AggregateId,
        court_reference: String,
        opened_at: DateTime<Utc>,
    },
    WillExecuted {
        will_id: AggregateId,
        executed_at: DateTime<Utc>,
    },
    WillRevoked {
        will_id: AggregateId,
        reason: String,
        revoked_by: Option<PersonId>,
    },
    WillSuperseded {
        will_id: AggregateId,
        superseded_by: AggregateId,
    },
    WillReopened {
        will_id: AggregateId,
    },
}

impl WillEvent {
    /// The event name used for store indexing and projection dispatch.
    pub fn event_type(&self) -> &'static str {
        match self {
            WillEvent::WillCreated { .. } => "WillCreated",
            WillEvent::CapacityDeclared { .. } => "CapacityDeclared",
            WillEvent::ClauseUpdated { .. } => "ClauseUpdated",
            WillEvent::WitnessAdded { .. } => "WitnessAdded",
            WillEvent::WitnessSigned { .. } => "WitnessSigned",
            WillEvent::WitnessVerified { .. } => "WitnessVerified",
            WillEvent::WitnessRejected { .. } => "WitnessRejected",
            WillEvent::ExecutorAdded { .. } => "ExecutorAdded",
            WillEvent::ExecutorNotified { .. } => "ExecutorNotified",
            WillEvent::ExecutorResponded { .. } => "ExecutorResponded",
            WillEvent::ExecutorRemoved { .. } => "ExecutorRemoved",
            WillEvent::BequestAdded { .. } => "BequestAdded",
            WillEvent::BequestRevoked { .. } => "BequestRevoked",
            WillEvent::CodicilAdded { .. } => "CodicilAdded",
            WillEvent::CodicilWitnessSigned { .. } => "CodicilWitnessSigned",
            WillEvent::DisinheritanceAdded { .. } => "DisinheritanceAdded",
            WillEvent::AttestationRequested { .. } => "AttestationRequested",
            WillEvent::WillAttested { .. } => "WillAttested",
            WillEvent::WillActivated { .. } => "WillActivated",
            WillEvent::WillContested { .. } => "WillContested",
            WillEvent::ContestResolved { .. } => "ContestResolved",
            WillEvent::ProbateOpened { .. } => "ProbateOpened",
            WillEvent::WillExecuted { .. } => "WillExecuted",
            WillEvent::WillRevoked { .. } => "WillRevoked",
            WillEvent::WillSuperseded { .. } => "WillSuperseded",
            WillEvent::WillReopened { .. } => "WillReopened",
        }
    }

    /// The will the event belongs to.
    pub fn will_id(&self) -> AggregateId {
        match self {
            WillEvent::WillCreated { will_id, .. }
            | WillEvent::CapacityDeclared { will_id, .. }
            | WillEvent::ClauseUpdated { will_id, .. }
            | WillEvent::WitnessAdded { will_id, .. }
            | WillEvent::WitnessSigned { will_id, .. }
            | WillEvent::WitnessVerified { will_id, .. }
            | WillEvent::WitnessRejected { will_id, .. }
            | WillEvent::ExecutorAdded { will_id, .. }
            | WillEvent::ExecutorNotified { will_id, .. }
            | WillEvent::ExecutorResponded { will_id, .. }
            | WillEvent::ExecutorRemoved { will_id, .. }
            | WillEvent::BequestAdded { will_id, .. }
            | WillEvent::BequestRevoked { will_id, .. }
            | WillEvent::CodicilAdded { will_id, .. }
            | WillEvent::CodicilWitnessSigned { will_id, .. }
            | WillEvent::DisinheritanceAdded { will_id, .. }
            | WillEvent::AttestationRequested { will_id, .. }
            | WillEvent::WillAttested { will_id, .. }
            | WillEvent::WillActivated { will_id, .. }
            | WillEvent::WillContested { will_id, .. }
            | WillEvent::ContestResolved { will_id, .. }
            | WillEvent::ProbateOpened { will_id, .. }
            | WillEvent::WillExecuted { will_id, .. }
            | WillEvent::WillRevoked { will_id, .. }
            | WillEvent::WillSuperseded { will_id, .. }
            | WillEvent::WillReopened { will_id } => *will_id,
        }
    }

    /// The lifecycle status implied by the event, when it changes one.
    pub fn status_after(&self) -> Option<WillStatus> {
        match self {
            WillEvent::WillCreated { .. } => Some(WillStatus::Draft),
            WillEvent::AttestationRequested { .. } => Some(WillStatus::PendingAttestation),
            WillEvent::WillAttested { .. } => Some(WillStatus::Attested),
            WillEvent::WillActivated { .. } => Some(WillStatus::Active),
            WillEvent::WillContested { .. } => Some(WillStatus::Contested),
            WillEvent::ContestResolved { upheld, .. } => Some(if *upheld {
                WillStatus::Active
            } else {
                WillStatus::InProbate
            }),
            WillEvent::ProbateOpened { .. } => Some(WillStatus::InProbate),
            WillEvent::WillExecuted { .. } => Some(WillStatus::Executed),
            WillEvent::WillRevoked { .. } => Some(WillStatus::Revoked),
            WillEvent::WillSuperseded { .. } => Some(WillStatus::Superseded),
            WillEvent::WillReopened { .. } => Some(WillStatus::Draft),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_is_tagged() {
        let event = WillEvent::WillCreated {
            will_id: AggregateId::new(),
            testator_id: PersonId::new(),
            testator_name: "Ada Lovelace".to_string(),
            document_type: DocumentType::Standard,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "WillCreated");
        assert_eq!(json["data"]["testator_name"], "Ada Lovelace");

        let back: WillEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn event_type_matches_variant() {
        let will_id = AggregateId::new();
        let event = WillEvent::WillRevoked {
            will_id,
            reason: "changed circumstances".to_string(),
            revoked_by: None,
        };
        assert_eq!(event.event_type(), "WillRevoked");
        assert_eq!(event.will_id(), will_id);
        assert_eq!(event.status_after(), Some(WillStatus::Revoked));
    }

    #[test]
    fn contest_resolution_status() {
        let will_id = AggregateId::new();
        let upheld = WillEvent::ContestResolved {
            will_id,
            upheld: true,
            resolution: "claim dismissed".to_string(),
        };
        assert_eq!(upheld.status_after(), Some(WillStatus::Active));

        let referred = WillEvent::ContestResolved {
            will_id,
            upheld: false,
            resolution: "referred to probate".to_string(),
        };
        assert_eq!(referred.status_after(), Some(WillStatus::InProbate));
    }
}
