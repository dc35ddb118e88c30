//! Command envelopes for will operations.
//!
//! Every command carries the acting party, the target document, and an
//! optional correlation ID that flows into stored event metadata.

use common::{AggregateId, PersonId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bequest::ShareSpec;
use super::codicil::AmendmentKind;
use super::disinheritance::{DisinheritanceReason, DisinheritanceSeverity};
use super::executor::{ExecutorPowers, ExecutorTier};
use super::values::{
    CapacityDeclaration, DocumentType, LegalDeclarations, PartyRef, Relationship, SignatureRecord,
};
use super::witness::EligibilitySnapshot;

/// A command addressed to one will.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope<P> {
    /// Who issued the command.
    pub actor_id: PersonId,

    /// The document the command targets.
    pub will_id: AggregateId,

    /// Caller-supplied correlation ID, carried into event metadata.
    pub correlation_id: Option<Uuid>,

    /// The command itself.
    pub payload: P,
}

impl<P> CommandEnvelope<P> {
    /// Wraps a payload with a fresh correlation ID.
    pub fn new(actor_id: PersonId, will_id: AggregateId, payload: P) -> Self {
        Self {
            actor_id,
            will_id,
            correlation_id: Some(Uuid::new_v4()),
            payload,
        }
    }

    /// Sets an explicit correlation ID.
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// Creates a new will in draft for the acting testator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWill {
    pub testator_name: String,
    pub document_type: DocumentType,
}

/// Records the testator's capacity assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclareCapacity {
    pub declaration: CapacityDeclaration,
}

/// Updates the funeral wishes clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFuneralWishes {
    pub wishes: String,
}

/// Adds a witness to the ceremony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddWitness {
    pub party: PartyRef,
    pub relationship: Relationship,
    pub age: Option<u8>,
    pub eligibility: Option<EligibilitySnapshot>,
}

/// Records a witness signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordWitnessSignature {
    pub witness_id: super::witness::WitnessId,
    pub declarations: LegalDeclarations,
    pub signature: SignatureRecord,
}

/// Nominates an executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddExecutor {
    pub party: PartyRef,
    pub relationship: Relationship,
    pub tier: ExecutorTier,
    pub powers: ExecutorPowers,
}

/// Records a bequest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBequest {
    pub beneficiary: PartyRef,
    pub relationship: Relationship,
    pub share: ShareSpec,
    pub conditions: Vec<String>,
}

/// Attaches a codicil.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCodicil {
    pub amendment: AmendmentKind,
    pub referenced_clauses: Vec<String>,
    pub summary: String,
}

/// Records an explicit exclusion from the estate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDisinheritance {
    pub excluded: PartyRef,
    pub relationship: Relationship,
    pub reason: DisinheritanceReason,
    pub justification: String,
    pub severity: DisinheritanceSeverity,
    pub evidence_refs: Vec<String>,
    pub alternative_provision: Option<String>,
    pub personal_statement: Option<String>,
}

/// Completes the signing ceremony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestWill {
    pub location: String,
}

/// Records a challenge to the document's validity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestWill {
    pub contested_by: String,
    pub grounds: String,
}

/// Resolves a pending contest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveContest {
    pub upheld: bool,
    pub resolution: String,
}

/// Opens probate proceedings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenProbate {
    pub court_reference: String,
}

/// Revokes the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeWill {
    pub reason: String,
}
