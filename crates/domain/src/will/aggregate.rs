//! The will aggregate root.
//!
//! All invariants that span child entities are enforced here: a mutation
//! method validates against current state, mutates in place, and records
//! exactly one event describing what happened. Recorded events are
//! drained by the service layer for publication; they are never replayed
//! to rebuild state.

use chrono::{DateTime, Duration, Utc};
use common::{AggregateId, PersonId};
use repository::Version;
use serde::{Deserialize, Serialize};

use super::bequest::{Bequest, BequestId, ShareSpec};
use super::codicil::{AmendmentKind, Codicil, CodicilId};
use super::disinheritance::{DisinheritanceId, DisinheritanceRecord};
use super::executor::{ExecutorId, ExecutorNomination, ExecutorPowers, ExecutorTier};
use super::events::WillEvent;
use super::state::WillStatus;
use super::values::{
    CapacityDeclaration, DocumentType, ExecutionRecord, LegalDeclarations, PartyRef, Relationship,
    RevocationRecord, SignatureRecord, Testator,
};
use super::witness::{
    AttestationStatus, EligibilitySnapshot, Witness, WitnessId, MINIMUM_WITNESS_AGE,
};
use super::WillError;

/// Maximum span, in minutes, between the earliest and latest witness
/// signature for the ceremony to count as one sitting.
pub const SIGNING_WINDOW_MINUTES: i64 = 30;

/// A testamentary document with its full lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Will {
    /// Identity; set on creation.
    id: Option<AggregateId>,

    /// Optimistic concurrency version of the persisted record.
    version: Version,

    /// The person making the will.
    testator: Option<Testator>,

    /// Lifecycle status.
    status: WillStatus,

    /// Statutory form of the document.
    document_type: DocumentType,

    /// Capacity assessment, once declared.
    capacity: Option<CapacityDeclaration>,

    /// The signing ceremony record, once attested.
    execution: Option<ExecutionRecord>,

    /// Funeral and burial wishes.
    funeral_wishes: Option<String>,

    /// Revocation record, when revoked.
    revocation: Option<RevocationRecord>,

    /// The will this one was superseded by, when superseded.
    superseded_by: Option<AggregateId>,

    witnesses: Vec<Witness>,
    executors: Vec<ExecutorNomination>,
    bequests: Vec<Bequest>,
    codicils: Vec<Codicil>,
    disinheritances: Vec<DisinheritanceRecord>,

    /// When the document was created.
    created_at: Option<DateTime<Utc>>,

    /// Events recorded since the last save. Not persisted.
    #[serde(skip)]
    pending_events: Vec<WillEvent>,
}

impl Will {
    // ------------------------------------------------------------------
    // Creation and lifecycle
    // ------------------------------------------------------------------

    /// Creates the document in `Draft`.
    pub fn create(
        &mut self,
        will_id: AggregateId,
        testator: Testator,
        document_type: DocumentType,
    ) -> Result<(), WillError> {
        if self.id.is_some() {
            return Err(WillError::AlreadyCreated);
        }
        self.id = Some(will_id);
        self.status = WillStatus::Draft;
        self.document_type = document_type;
        self.created_at = Some(Utc::now());

        let event = WillEvent::WillCreated {
            will_id,
            testator_id: testator.person_id,
            testator_name: testator.full_name.clone(),
            document_type,
        };
        self.testator = Some(testator);
        self.record(event);
        Ok(())
    }

    /// Records the testator's capacity assessment. Draft only.
    pub fn declare_capacity(
        &mut self,
        declaration: CapacityDeclaration,
    ) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.require_mutable("declare capacity")?;

        let event = WillEvent::CapacityDeclared {
            will_id,
            assessed_by: declaration.assessed_by.clone(),
            of_sound_mind: declaration.of_sound_mind,
            declared_at: declaration.declared_at,
        };
        self.capacity = Some(declaration);
        self.record(event);
        Ok(())
    }

    /// Updates the funeral wishes clause. Draft only.
    pub fn set_funeral_wishes(&mut self, wishes: impl Into<String>) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.require_mutable("update funeral wishes")?;

        self.funeral_wishes = Some(wishes.into());
        self.record(WillEvent::ClauseUpdated {
            will_id,
            clause: "funeral_wishes".to_string(),
        });
        Ok(())
    }

    /// Submits the document for its signing ceremony.
    ///
    /// Enough witnesses for the document type must already be listed.
    pub fn submit_for_attestation(&mut self) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.transition_to(WillStatus::PendingAttestation)?;

        let listed = self.listed_witness_count();
        let required = self.document_type.minimum_witnesses();
        if listed < required {
            return Err(WillError::InsufficientWitnesses {
                required,
                actual: listed,
            });
        }

        self.status = WillStatus::PendingAttestation;
        self.record(WillEvent::AttestationRequested {
            will_id,
            witness_count: listed,
        });
        Ok(())
    }

    /// Returns a pending document to draft for further editing.
    pub fn return_to_draft(&mut self) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.transition_to(WillStatus::Draft)?;
        self.status = WillStatus::Draft;
        self.record(WillEvent::WillReopened { will_id });
        Ok(())
    }

    /// Completes the signing ceremony.
    ///
    /// The witness quorum must have signed, and all counted signatures
    /// must fall within one sitting.
    pub fn attest(&mut self, location: impl Into<String>) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.transition_to(WillStatus::Attested)?;

        let signed = self.quorum_witness_count();
        let required = self.document_type.minimum_witnesses();
        if signed < required {
            return Err(WillError::InsufficientWitnesses {
                required,
                actual: signed,
            });
        }
        self.check_signature_window()?;

        let executed_at = Utc::now();
        let location = location.into();
        self.execution = Some(ExecutionRecord {
            executed_at,
            location: location.clone(),
            witness_count: signed,
        });
        for bequest in &mut self.bequests {
            bequest.activate();
        }
        self.status = WillStatus::Attested;
        self.record(WillEvent::WillAttested {
            will_id,
            executed_at,
            location,
            witness_count: signed,
        });
        Ok(())
    }

    /// Brings the attested document into legal effect.
    ///
    /// Requires a sound-mind capacity declaration, at least one effective
    /// bequest including a residuary disposition, every quorum witness
    /// free of legal impediments, and at least one standing executor
    /// nomination.
    pub fn activate(&mut self) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.transition_to(WillStatus::Active)?;

        match &self.capacity {
            Some(declaration) if declaration.of_sound_mind => {}
            _ => return Err(WillError::CapacityNotConfirmed),
        }
        if !self.bequests.iter().any(Bequest::is_effective) {
            return Err(WillError::NoEffectiveBeneficiary);
        }
        if !self
            .bequests
            .iter()
            .any(|b| b.is_effective() && b.share.is_residuary())
        {
            return Err(WillError::NoResiduaryDisposition);
        }
        self.check_quorum_eligibility()?;
        if !self.executors.iter().any(ExecutorNomination::is_active) {
            return Err(WillError::NoEligibleExecutor);
        }

        self.status = WillStatus::Active;
        self.record(WillEvent::WillActivated {
            will_id,
            activated_at: Utc::now(),
        });
        Ok(())
    }

    /// Records a challenge to the document's validity.
    pub fn contest(
        &mut self,
        contested_by: impl Into<String>,
        grounds: impl Into<String>,
    ) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.transition_to(WillStatus::Contested)?;
        self.status = WillStatus::Contested;
        self.record(WillEvent::WillContested {
            will_id,
            contested_by: contested_by.into(),
            grounds: grounds.into(),
        });
        Ok(())
    }

    /// Resolves a contest: upheld documents return to `Active`, failed
    /// ones are referred to probate.
    pub fn resolve_contest(
        &mut self,
        upheld: bool,
        resolution: impl Into<String>,
    ) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        let target = if upheld {
            WillStatus::Active
        } else {
            WillStatus::InProbate
        };
        self.transition_to(target)?;
        self.status = target;
        self.record(WillEvent::ContestResolved {
            will_id,
            upheld,
            resolution: resolution.into(),
        });
        Ok(())
    }

    /// Opens probate proceedings.
    pub fn open_probate(&mut self, court_reference: impl Into<String>) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.transition_to(WillStatus::InProbate)?;
        self.status = WillStatus::InProbate;
        self.record(WillEvent::ProbateOpened {
            will_id,
            court_reference: court_reference.into(),
            opened_at: Utc::now(),
        });
        Ok(())
    }

    /// Records that the estate has been fully distributed. Terminal.
    pub fn execute(&mut self) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.transition_to(WillStatus::Executed)?;
        self.status = WillStatus::Executed;
        self.record(WillEvent::WillExecuted {
            will_id,
            executed_at: Utc::now(),
        });
        Ok(())
    }

    /// Revokes the document at the testator's direction.
    pub fn revoke(
        &mut self,
        reason: impl Into<String>,
        revoked_by: Option<PersonId>,
    ) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.transition_to(WillStatus::Revoked)?;

        let reason = reason.into();
        self.revocation = Some(RevocationRecord {
            revoked_at: Utc::now(),
            reason: reason.clone(),
            revoked_by,
        });
        self.status = WillStatus::Revoked;
        self.record(WillEvent::WillRevoked {
            will_id,
            reason,
            revoked_by,
        });
        Ok(())
    }

    /// Reopens a revoked document as a draft. A fresh signing ceremony is
    /// required, so the previous execution record and witness signatures
    /// are discarded.
    pub fn reopen_as_draft(&mut self) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.transition_to(WillStatus::Draft)?;

        self.execution = None;
        self.revocation = None;
        for witness in &mut self.witnesses {
            if witness.status != AttestationStatus::Rejected {
                witness.status = AttestationStatus::Pending;
                witness.signature = None;
                witness.declarations = LegalDeclarations::default();
            }
        }
        self.status = WillStatus::Draft;
        self.record(WillEvent::WillReopened { will_id });
        Ok(())
    }

    /// Marks the document as replaced by a later will. Terminal.
    pub fn supersede(&mut self, superseded_by: AggregateId) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.transition_to(WillStatus::Superseded)?;
        self.superseded_by = Some(superseded_by);
        self.status = WillStatus::Superseded;
        self.record(WillEvent::WillSuperseded {
            will_id,
            superseded_by,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Witnesses
    // ------------------------------------------------------------------

    /// Adds a witness. Allowed while drafting or pending attestation.
    ///
    /// A witness may not be a beneficiary, may not be the testator's
    /// spouse, and may not already be listed.
    pub fn add_witness(
        &mut self,
        party: PartyRef,
        relationship: Relationship,
        age: Option<u8>,
        eligibility: Option<EligibilitySnapshot>,
    ) -> Result<WitnessId, WillError> {
        let will_id = self.require_created()?;
        if !matches!(
            self.status,
            WillStatus::Draft | WillStatus::PendingAttestation
        ) {
            return Err(WillError::DocumentImmutable {
                status: self.status,
                action: "add witness".to_string(),
            });
        }

        if relationship == Relationship::Spouse {
            return Err(WillError::WitnessIsSpouse {
                name: party.display_name().to_string(),
            });
        }
        if self
            .witnesses
            .iter()
            .any(|w| w.status != AttestationStatus::Rejected && w.party.same_person(&party))
        {
            return Err(WillError::DuplicateWitness {
                name: party.display_name().to_string(),
            });
        }
        if self.is_effective_beneficiary(&party) {
            return Err(WillError::WitnessIsBeneficiary {
                name: party.display_name().to_string(),
            });
        }

        let mut witness = Witness::new(party, relationship, age);
        witness.eligibility = eligibility;
        let witness_id = witness.witness_id;
        self.record(WillEvent::WitnessAdded {
            will_id,
            witness_id,
            name: witness.party.display_name().to_string(),
            relationship,
        });
        self.witnesses.push(witness);
        Ok(witness_id)
    }

    /// Records a witness signature during the ceremony.
    pub fn record_witness_signature(
        &mut self,
        witness_id: WitnessId,
        declarations: LegalDeclarations,
        signature: SignatureRecord,
    ) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        if !self.status.allows_witness_signing() {
            return Err(WillError::DocumentImmutable {
                status: self.status,
                action: "record witness signature".to_string(),
            });
        }

        let signed_at = signature.signed_at;
        let witness = self.find_witness_mut(witness_id)?;
        witness.sign(declarations, signature)?;
        let name = witness.party.display_name().to_string();
        self.record(WillEvent::WitnessSigned {
            will_id,
            witness_id,
            name,
            signed_at,
        });
        Ok(())
    }

    /// Marks a witness signature as verified by the registrar.
    pub fn verify_witness(&mut self, witness_id: WitnessId) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        let witness = self.find_witness_mut(witness_id)?;
        witness.verify()?;
        let name = witness.party.display_name().to_string();
        self.record(WillEvent::WitnessVerified {
            will_id,
            witness_id,
            name,
        });
        Ok(())
    }

    /// Strikes a witness from the ceremony.
    pub fn reject_witness(
        &mut self,
        witness_id: WitnessId,
        reason: impl Into<String>,
    ) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        let reason = reason.into();
        let witness = self.find_witness_mut(witness_id)?;
        witness.reject(reason.clone())?;
        let name = witness.party.display_name().to_string();
        self.record(WillEvent::WitnessRejected {
            will_id,
            witness_id,
            name,
            reason,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Executors
    // ------------------------------------------------------------------

    /// Nominates an executor. Draft only.
    ///
    /// At most one standing primary executor, and no person may hold two
    /// standing nominations.
    pub fn add_executor(
        &mut self,
        party: PartyRef,
        relationship: Relationship,
        tier: ExecutorTier,
        powers: ExecutorPowers,
    ) -> Result<ExecutorId, WillError> {
        let will_id = self.require_created()?;
        self.require_mutable("nominate executor")?;

        if self
            .executors
            .iter()
            .any(|e| e.is_active() && e.party.same_person(&party))
        {
            return Err(WillError::DuplicateNominee {
                name: party.display_name().to_string(),
            });
        }
        if tier == ExecutorTier::Primary
            && self
                .executors
                .iter()
                .any(|e| e.is_active() && e.tier == ExecutorTier::Primary)
        {
            return Err(WillError::DuplicatePrimaryExecutor);
        }

        let nomination = ExecutorNomination::new(party, relationship, tier, powers);
        let executor_id = nomination.executor_id;
        self.record(WillEvent::ExecutorAdded {
            will_id,
            executor_id,
            name: nomination.party.display_name().to_string(),
            tier,
        });
        self.executors.push(nomination);
        Ok(executor_id)
    }

    /// Records that a nominee was notified of the nomination.
    pub fn mark_executor_notified(&mut self, executor_id: ExecutorId) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        let nomination = self.find_executor_mut(executor_id)?;
        nomination.mark_notified()?;
        let name = nomination.party.display_name().to_string();
        self.record(WillEvent::ExecutorNotified {
            will_id,
            executor_id,
            name,
        });
        Ok(())
    }

    /// Records the nominee's acceptance or declination.
    pub fn record_executor_response(
        &mut self,
        executor_id: ExecutorId,
        accepted: bool,
        decline_reason: Option<String>,
    ) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        let nomination = self.find_executor_mut(executor_id)?;
        nomination.record_response(accepted, decline_reason)?;
        let name = nomination.party.display_name().to_string();
        let status = nomination.status;
        self.record(WillEvent::ExecutorResponded {
            will_id,
            executor_id,
            name,
            status,
        });
        Ok(())
    }

    /// Removes an executor nomination. Draft only.
    pub fn remove_executor(&mut self, executor_id: ExecutorId) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.require_mutable("remove executor")?;
        let nomination = self.find_executor_mut(executor_id)?;
        nomination.remove()?;
        let name = nomination.party.display_name().to_string();
        self.record(WillEvent::ExecutorRemoved {
            will_id,
            executor_id,
            name,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Bequests
    // ------------------------------------------------------------------

    /// Records a bequest. Draft only.
    ///
    /// Invariants checked, in order: the beneficiary is not completely
    /// disinherited, is not a listed witness, percentage shares stay
    /// within the whole, each specific asset is given away once, and the
    /// residuary rules hold.
    pub fn add_bequest(
        &mut self,
        beneficiary: PartyRef,
        relationship: Relationship,
        share: ShareSpec,
        conditions: Vec<String>,
    ) -> Result<BequestId, WillError> {
        let will_id = self.require_created()?;
        self.require_mutable("add bequest")?;

        if self
            .disinheritances
            .iter()
            .any(|d| d.is_complete() && d.excluded.same_person(&beneficiary))
        {
            return Err(WillError::BeneficiaryIsDisinherited {
                name: beneficiary.display_name().to_string(),
            });
        }
        if self
            .witnesses
            .iter()
            .any(|w| w.status != AttestationStatus::Rejected && w.party.same_person(&beneficiary))
        {
            return Err(WillError::WitnessIsBeneficiary {
                name: beneficiary.display_name().to_string(),
            });
        }

        match &share {
            ShareSpec::Percentage { percent } => {
                let attempted = self.effective_percentage_total() + u32::from(percent.value());
                if attempted > 100 {
                    return Err(WillError::AllocationExceedsWhole { attempted });
                }
            }
            ShareSpec::SpecificAsset { asset_id, .. } => {
                if self.bequests.iter().any(|b| {
                    b.is_effective() && b.share.asset_id() == Some(asset_id.as_str())
                }) {
                    return Err(WillError::AssetAlreadyAssigned {
                        asset_id: asset_id.clone(),
                    });
                }
            }
            ShareSpec::Residuary { percent } => match percent {
                None => {
                    if self.bequests.iter().any(|b| {
                        b.is_effective()
                            && matches!(b.share, ShareSpec::Residuary { percent: None })
                    }) {
                        return Err(WillError::DuplicateResiduary);
                    }
                }
                Some(p) => {
                    let existing: u32 = self
                        .bequests
                        .iter()
                        .filter(|b| b.is_effective())
                        .filter_map(|b| match &b.share {
                            ShareSpec::Residuary { percent: Some(p) } => {
                                Some(u32::from(p.value()))
                            }
                            _ => None,
                        })
                        .sum();
                    if existing + u32::from(p.value()) > 100 {
                        return Err(WillError::ResiduaryShareOverflow);
                    }
                }
            },
        }

        let bequest = Bequest::new(beneficiary, relationship, share, conditions);
        let bequest_id = bequest.bequest_id;
        self.record(WillEvent::BequestAdded {
            will_id,
            bequest_id,
            beneficiary: bequest.beneficiary.clone(),
            share: bequest.share.clone(),
        });
        self.bequests.push(bequest);
        Ok(bequest_id)
    }

    /// Strikes a bequest. Draft only; attested documents are amended
    /// through codicils.
    pub fn revoke_bequest(&mut self, bequest_id: BequestId) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        self.require_mutable("revoke bequest")?;
        let bequest = self
            .bequests
            .iter_mut()
            .find(|b| b.bequest_id == bequest_id)
            .ok_or(WillError::BequestNotFound { bequest_id })?;
        bequest.revoke()?;
        let beneficiary = bequest.beneficiary.clone();
        self.record(WillEvent::BequestRevoked {
            will_id,
            bequest_id,
            beneficiary,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Codicils
    // ------------------------------------------------------------------

    /// Attaches a codicil. Allowed only once the document is past its
    /// signing ceremony and before its life is over.
    pub fn add_codicil(
        &mut self,
        amendment: AmendmentKind,
        referenced_clauses: Vec<String>,
        summary: impl Into<String>,
    ) -> Result<CodicilId, WillError> {
        let will_id = self.require_created()?;
        if !self.status.allows_amendment() {
            return Err(WillError::CodicilNotAllowed {
                status: self.status,
            });
        }

        let sequence = self.codicils.len() as u32 + 1;
        let codicil = Codicil::new(sequence, amendment, referenced_clauses, summary);
        let codicil_id = codicil.codicil_id;
        self.record(WillEvent::CodicilAdded {
            will_id,
            codicil_id,
            sequence,
            amendment,
            summary: codicil.summary.clone(),
        });
        self.codicils.push(codicil);
        Ok(codicil_id)
    }

    /// Adds a witness to a codicil.
    pub fn add_codicil_witness(
        &mut self,
        codicil_id: CodicilId,
        party: PartyRef,
    ) -> Result<(), WillError> {
        self.require_created()?;
        let codicil = self.find_codicil_mut(codicil_id)?;
        codicil.add_witness(party)
    }

    /// Records a witness signature on a codicil.
    pub fn record_codicil_signature(
        &mut self,
        codicil_id: CodicilId,
        party: &PartyRef,
    ) -> Result<(), WillError> {
        let will_id = self.require_created()?;
        let codicil = self.find_codicil_mut(codicil_id)?;
        codicil.record_signature(party)?;
        let attested = codicil.is_attested();
        self.record(WillEvent::CodicilWitnessSigned {
            will_id,
            codicil_id,
            witness_name: party.display_name().to_string(),
            attested,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Disinheritance
    // ------------------------------------------------------------------

    /// Records an explicit exclusion. Draft only.
    ///
    /// A complete exclusion of a person who holds an effective bequest is
    /// contradictory and rejected.
    pub fn add_disinheritance(
        &mut self,
        record: DisinheritanceRecord,
    ) -> Result<DisinheritanceId, WillError> {
        let will_id = self.require_created()?;
        self.require_mutable("add disinheritance")?;

        if record.is_complete() && self.is_effective_beneficiary(&record.excluded) {
            return Err(WillError::ExcludedPersonIsBeneficiary {
                name: record.excluded.display_name().to_string(),
            });
        }

        let disinheritance_id = record.disinheritance_id;
        self.record(WillEvent::DisinheritanceAdded {
            will_id,
            disinheritance_id,
            excluded: record.excluded.clone(),
            relationship: record.relationship,
            reason: record.reason,
            severity: record.severity,
        });
        self.disinheritances.push(record);
        Ok(disinheritance_id)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn id(&self) -> Option<AggregateId> {
        self.id
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn testator(&self) -> Option<&Testator> {
        self.testator.as_ref()
    }

    pub fn status(&self) -> WillStatus {
        self.status
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn capacity(&self) -> Option<&CapacityDeclaration> {
        self.capacity.as_ref()
    }

    pub fn execution(&self) -> Option<&ExecutionRecord> {
        self.execution.as_ref()
    }

    pub fn funeral_wishes(&self) -> Option<&str> {
        self.funeral_wishes.as_deref()
    }

    pub fn revocation(&self) -> Option<&RevocationRecord> {
        self.revocation.as_ref()
    }

    pub fn superseded_by(&self) -> Option<AggregateId> {
        self.superseded_by
    }

    pub fn witnesses(&self) -> &[Witness] {
        &self.witnesses
    }

    pub fn executors(&self) -> &[ExecutorNomination] {
        &self.executors
    }

    pub fn bequests(&self) -> &[Bequest] {
        &self.bequests
    }

    pub fn codicils(&self) -> &[Codicil] {
        &self.codicils
    }

    pub fn disinheritances(&self) -> &[DisinheritanceRecord] {
        &self.disinheritances
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Witnesses still part of the ceremony (not rejected).
    pub fn listed_witness_count(&self) -> usize {
        self.witnesses
            .iter()
            .filter(|w| w.status != AttestationStatus::Rejected)
            .count()
    }

    /// Witnesses counting toward the attestation quorum.
    pub fn quorum_witness_count(&self) -> usize {
        self.witnesses
            .iter()
            .filter(|w| w.counts_toward_quorum())
            .count()
    }

    /// Sum of effective fixed-percentage shares.
    pub fn effective_percentage_total(&self) -> u32 {
        self.bequests
            .iter()
            .filter(|b| b.is_effective())
            .filter_map(|b| b.share.percentage())
            .map(|p| u32::from(p.value()))
            .sum()
    }

    /// Returns true if any effective residuary disposition exists.
    pub fn has_residuary_disposition(&self) -> bool {
        self.bequests
            .iter()
            .any(|b| b.is_effective() && b.share.is_residuary())
    }

    /// Returns true if the party holds an effective bequest.
    pub fn is_effective_beneficiary(&self, party: &PartyRef) -> bool {
        self.bequests
            .iter()
            .any(|b| b.is_effective() && b.beneficiary.same_person(party))
    }

    /// Registered person IDs of standing executor nominees, for indexing.
    pub fn nominated_executor_ids(&self) -> Vec<PersonId> {
        self.executors
            .iter()
            .filter(|e| e.is_active())
            .filter_map(|e| e.party.person_id())
            .collect()
    }

    /// Drains the events recorded since the last save.
    pub fn take_events(&mut self) -> Vec<WillEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Events recorded and not yet drained.
    pub fn pending_events(&self) -> &[WillEvent] {
        &self.pending_events
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn record(&mut self, event: WillEvent) {
        self.pending_events.push(event);
    }

    fn require_created(&self) -> Result<AggregateId, WillError> {
        self.id.ok_or(WillError::NotYetCreated)
    }

    fn require_mutable(&self, action: &str) -> Result<(), WillError> {
        if !self.status.is_mutable() {
            return Err(WillError::DocumentImmutable {
                status: self.status,
                action: action.to_string(),
            });
        }
        Ok(())
    }

    fn transition_to(&self, to: WillStatus) -> Result<(), WillError> {
        if !self.status.can_transition(to) {
            return Err(WillError::InvalidStatusTransition {
                from: self.status,
                to,
            });
        }
        Ok(())
    }

    fn check_signature_window(&self) -> Result<(), WillError> {
        let timestamps: Vec<DateTime<Utc>> = self
            .witnesses
            .iter()
            .filter(|w| w.counts_toward_quorum())
            .filter_map(|w| w.signature.as_ref().map(|s| s.signed_at))
            .collect();

        if let (Some(first), Some(last)) = (timestamps.iter().min(), timestamps.iter().max()) {
            let spread = *last - *first;
            if spread > Duration::minutes(SIGNING_WINDOW_MINUTES) {
                return Err(WillError::SignaturesNotSimultaneous {
                    spread_minutes: spread.num_minutes(),
                    window_minutes: SIGNING_WINDOW_MINUTES,
                });
            }
        }
        Ok(())
    }

    /// Legal impediments that strike a quorum witness: under age, lacking
    /// capacity, married to the testator, or taking under the will.
    fn check_quorum_eligibility(&self) -> Result<(), WillError> {
        for witness in self.witnesses.iter().filter(|w| w.counts_toward_quorum()) {
            let name = witness.party.display_name().to_string();
            if let Some(age) = witness.age {
                if age < MINIMUM_WITNESS_AGE {
                    return Err(WillError::IneligibleWitness {
                        name,
                        reason: format!(
                            "aged {age}, below the minimum of {MINIMUM_WITNESS_AGE}"
                        ),
                    });
                }
            }
            if !witness.has_capacity {
                return Err(WillError::IneligibleWitness {
                    name,
                    reason: "lacks the capacity to attest".to_string(),
                });
            }
            if witness.relationship == Relationship::Spouse {
                return Err(WillError::IneligibleWitness {
                    name,
                    reason: "is the testator's spouse".to_string(),
                });
            }
            if self.is_effective_beneficiary(&witness.party) {
                return Err(WillError::IneligibleWitness {
                    name,
                    reason: "receives a bequest under this will".to_string(),
                });
            }
        }
        Ok(())
    }

    fn find_witness_mut(&mut self, witness_id: WitnessId) -> Result<&mut Witness, WillError> {
        self.witnesses
            .iter_mut()
            .find(|w| w.witness_id == witness_id)
            .ok_or(WillError::WitnessNotFound { witness_id })
    }

    fn find_executor_mut(
        &mut self,
        executor_id: ExecutorId,
    ) -> Result<&mut ExecutorNomination, WillError> {
        self.executors
            .iter_mut()
            .find(|e| e.executor_id == executor_id)
            .ok_or(WillError::ExecutorNotFound { executor_id })
    }

    fn find_codicil_mut(&mut self, codicil_id: CodicilId) -> Result<&mut Codicil, WillError> {
        self.codicils
            .iter_mut()
            .find(|c| c.codicil_id == codicil_id)
            .ok_or(WillError::CodicilNotFound { codicil_id })
    }
}

#[cfg(test)]
mod tests {
    use super::super::disinheritance::{DisinheritanceReason, DisinheritanceSeverity};
    use super::super::values::{Percentage, SignatureKind};
    use super::*;

    fn testator() -> Testator {
        Testator::new(PersonId::new(), "Ada Lovelace")
    }

    fn draft_will() -> Will {
        let mut will = Will::default();
        will.create(AggregateId::new(), testator(), DocumentType::Standard)
            .unwrap();
        will
    }

    fn add_standard_witnesses(will: &mut Will) -> Vec<WitnessId> {
        vec![
            will.add_witness(
                PartyRef::external("Grace Hopper", None),
                Relationship::Other,
                Some(45),
                None,
            )
            .unwrap(),
            will.add_witness(
                PartyRef::external("Alan Turing", None),
                Relationship::Other,
                Some(41),
                None,
            )
            .unwrap(),
        ]
    }

    fn sign_all(will: &mut Will, ids: &[WitnessId]) {
        for id in ids {
            will.record_witness_signature(
                *id,
                LegalDeclarations::all(),
                SignatureRecord::new(SignatureKind::Wet, None),
            )
            .unwrap();
        }
    }

    /// Drafts, witnesses, signs, and attests a standard will.
    fn attested_will() -> Will {
        let mut will = draft_will();
        will.declare_capacity(CapacityDeclaration::new("Dr. Smith", true, None))
            .unwrap();
        will.add_bequest(
            PartyRef::external("Beneficiary One", None),
            Relationship::Child,
            ShareSpec::Residuary { percent: None },
            vec![],
        )
        .unwrap();
        will.add_executor(
            PartyRef::external("Marie Curie", None),
            Relationship::Other,
            ExecutorTier::Primary,
            ExecutorPowers::standard(),
        )
        .unwrap();
        let ids = add_standard_witnesses(&mut will);
        will.submit_for_attestation().unwrap();
        sign_all(&mut will, &ids);
        will.attest("Registry office").unwrap();
        will
    }

    #[test]
    fn create_only_once() {
        let mut will = draft_will();
        assert!(matches!(
            will.create(AggregateId::new(), testator(), DocumentType::Standard),
            Err(WillError::AlreadyCreated)
        ));
    }

    #[test]
    fn operations_require_creation() {
        let mut will = Will::default();
        assert!(matches!(
            will.set_funeral_wishes("cremation"),
            Err(WillError::NotYetCreated)
        ));
    }

    #[test]
    fn submission_requires_witness_quorum() {
        let mut will = draft_will();
        let err = will.submit_for_attestation().unwrap_err();
        assert!(matches!(
            err,
            WillError::InsufficientWitnesses {
                required: 2,
                actual: 0
            }
        ));
        assert_eq!(will.status(), WillStatus::Draft);
    }

    #[test]
    fn holographic_will_needs_no_witnesses() {
        let mut will = Will::default();
        will.create(AggregateId::new(), testator(), DocumentType::Holographic)
            .unwrap();
        will.submit_for_attestation().unwrap();
        will.attest("Home study").unwrap();
        assert_eq!(will.status(), WillStatus::Attested);
    }

    #[test]
    fn attestation_requires_signatures_not_just_listings() {
        let mut will = draft_will();
        add_standard_witnesses(&mut will);
        will.submit_for_attestation().unwrap();

        let err = will.attest("Registry office").unwrap_err();
        assert!(matches!(
            err,
            WillError::InsufficientWitnesses {
                required: 2,
                actual: 0
            }
        ));
    }

    #[test]
    fn signatures_outside_window_fail_attestation() {
        let mut will = draft_will();
        let ids = add_standard_witnesses(&mut will);
        will.submit_for_attestation().unwrap();

        let early = Utc::now() - Duration::hours(2);
        will.record_witness_signature(
            ids[0],
            LegalDeclarations::all(),
            SignatureRecord::at(SignatureKind::Wet, early, None),
        )
        .unwrap();
        will.record_witness_signature(
            ids[1],
            LegalDeclarations::all(),
            SignatureRecord::new(SignatureKind::Wet, None),
        )
        .unwrap();

        let err = will.attest("Registry office").unwrap_err();
        assert!(matches!(
            err,
            WillError::SignaturesNotSimultaneous { window_minutes: 30, .. }
        ));
    }

    #[test]
    fn full_lifecycle_to_execution() {
        let mut will = attested_will();
        will.activate().unwrap();
        assert_eq!(will.status(), WillStatus::Active);

        will.open_probate("PROB-2026-114").unwrap();
        assert_eq!(will.status(), WillStatus::InProbate);

        will.execute().unwrap();
        assert_eq!(will.status(), WillStatus::Executed);

        assert!(matches!(
            will.revoke("too late", None),
            Err(WillError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn activation_requires_sound_mind_declaration() {
        let mut will = draft_will();
        will.add_bequest(
            PartyRef::external("Beneficiary One", None),
            Relationship::Child,
            ShareSpec::Residuary { percent: None },
            vec![],
        )
        .unwrap();
        will.add_executor(
            PartyRef::external("Marie Curie", None),
            Relationship::Other,
            ExecutorTier::Primary,
            ExecutorPowers::standard(),
        )
        .unwrap();
        let ids = add_standard_witnesses(&mut will);
        will.submit_for_attestation().unwrap();
        sign_all(&mut will, &ids);
        will.attest("Registry office").unwrap();

        assert!(matches!(
            will.activate(),
            Err(WillError::CapacityNotConfirmed)
        ));
    }

    #[test]
    fn activation_requires_residuary_disposition() {
        let mut will = draft_will();
        will.declare_capacity(CapacityDeclaration::new("Dr. Smith", true, None))
            .unwrap();
        will.add_bequest(
            PartyRef::external("Beneficiary One", None),
            Relationship::Child,
            ShareSpec::Percentage {
                percent: Percentage::new(50).unwrap(),
            },
            vec![],
        )
        .unwrap();
        will.add_executor(
            PartyRef::external("Marie Curie", None),
            Relationship::Other,
            ExecutorTier::Primary,
            ExecutorPowers::standard(),
        )
        .unwrap();
        let ids = add_standard_witnesses(&mut will);
        will.submit_for_attestation().unwrap();
        sign_all(&mut will, &ids);
        will.attest("Registry office").unwrap();

        assert!(matches!(
            will.activate(),
            Err(WillError::NoResiduaryDisposition)
        ));
        assert_eq!(will.status(), WillStatus::Attested);
    }

    #[test]
    fn underage_quorum_witness_blocks_activation() {
        let mut will = draft_will();
        will.declare_capacity(CapacityDeclaration::new("Dr. Smith", true, None))
            .unwrap();
        will.add_bequest(
            PartyRef::external("Beneficiary One", None),
            Relationship::Child,
            ShareSpec::Residuary { percent: None },
            vec![],
        )
        .unwrap();
        will.add_executor(
            PartyRef::external("Marie Curie", None),
            Relationship::Other,
            ExecutorTier::Primary,
            ExecutorPowers::standard(),
        )
        .unwrap();
        let adult = will
            .add_witness(
                PartyRef::external("Grace Hopper", None),
                Relationship::Other,
                Some(45),
                None,
            )
            .unwrap();
        let minor = will
            .add_witness(
                PartyRef::external("Young Cousin", None),
                Relationship::Other,
                Some(16),
                None,
            )
            .unwrap();
        will.submit_for_attestation().unwrap();
        sign_all(&mut will, &[adult, minor]);
        will.attest("Registry office").unwrap();

        let err = will.activate().unwrap_err();
        assert!(matches!(err, WillError::IneligibleWitness { .. }));
        assert_eq!(will.status(), WillStatus::Attested);
    }

    #[test]
    fn contest_and_resolution() {
        let mut will = attested_will();
        will.activate().unwrap();
        will.contest("Disgruntled relative", "undue influence")
            .unwrap();
        assert_eq!(will.status(), WillStatus::Contested);

        will.resolve_contest(true, "claim dismissed").unwrap();
        assert_eq!(will.status(), WillStatus::Active);

        will.contest("Same relative", "fraud").unwrap();
        will.resolve_contest(false, "referred to probate").unwrap();
        assert_eq!(will.status(), WillStatus::InProbate);
    }

    #[test]
    fn revoked_will_reopens_with_fresh_ceremony() {
        let mut will = attested_will();
        will.activate().unwrap();
        will.revoke("new family circumstances", None).unwrap();
        assert_eq!(will.status(), WillStatus::Revoked);
        assert!(will.revocation().is_some());

        will.reopen_as_draft().unwrap();
        assert_eq!(will.status(), WillStatus::Draft);
        assert!(will.execution().is_none());
        assert!(will.revocation().is_none());
        assert_eq!(will.quorum_witness_count(), 0);
        assert_eq!(will.listed_witness_count(), 2);
    }

    #[test]
    fn witness_cannot_be_spouse() {
        let mut will = draft_will();
        let err = will
            .add_witness(
                PartyRef::external("Spouse", None),
                Relationship::Spouse,
                Some(50),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, WillError::WitnessIsSpouse { .. }));
    }

    #[test]
    fn witness_cannot_be_beneficiary_either_direction() {
        let mut will = draft_will();
        let person = PartyRef::external("John Doe", None);

        will.add_bequest(
            person.clone(),
            Relationship::Child,
            ShareSpec::Percentage {
                percent: Percentage::new(20).unwrap(),
            },
            vec![],
        )
        .unwrap();
        assert!(matches!(
            will.add_witness(person.clone(), Relationship::Child, Some(30), None),
            Err(WillError::WitnessIsBeneficiary { .. })
        ));

        let other = PartyRef::external("Jane Doe", None);
        will.add_witness(other.clone(), Relationship::Other, Some(30), None)
            .unwrap();
        assert!(matches!(
            will.add_bequest(
                other,
                Relationship::Other,
                ShareSpec::Percentage {
                    percent: Percentage::new(10).unwrap(),
                },
                vec![],
            ),
            Err(WillError::WitnessIsBeneficiary { .. })
        ));
    }

    #[test]
    fn duplicate_witness_rejected_but_struck_witness_may_return() {
        let mut will = draft_will();
        let person = PartyRef::external("Grace Hopper", None);
        let id = will
            .add_witness(person.clone(), Relationship::Other, Some(45), None)
            .unwrap();
        assert!(matches!(
            will.add_witness(person.clone(), Relationship::Other, Some(45), None),
            Err(WillError::DuplicateWitness { .. })
        ));

        will.reject_witness(id, "unavailable for ceremony").unwrap();
        will.add_witness(person, Relationship::Other, Some(45), None)
            .unwrap();
    }

    #[test]
    fn percentage_allocation_cannot_exceed_whole() {
        let mut will = draft_will();
        will.add_bequest(
            PartyRef::external("First", None),
            Relationship::Child,
            ShareSpec::Percentage {
                percent: Percentage::new(60).unwrap(),
            },
            vec![],
        )
        .unwrap();

        let err = will
            .add_bequest(
                PartyRef::external("Second", None),
                Relationship::Child,
                ShareSpec::Percentage {
                    percent: Percentage::new(50).unwrap(),
                },
                vec![],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            WillError::AllocationExceedsWhole { attempted: 110 }
        ));

        // the first bequest is untouched
        assert_eq!(will.bequests().len(), 1);
        assert_eq!(will.effective_percentage_total(), 60);
    }

    #[test]
    fn revoked_share_frees_the_allocation() {
        let mut will = draft_will();
        let id = will
            .add_bequest(
                PartyRef::external("First", None),
                Relationship::Child,
                ShareSpec::Percentage {
                    percent: Percentage::new(60).unwrap(),
                },
                vec![],
            )
            .unwrap();
        will.revoke_bequest(id).unwrap();

        will.add_bequest(
            PartyRef::external("Second", None),
            Relationship::Child,
            ShareSpec::Percentage {
                percent: Percentage::new(80).unwrap(),
            },
            vec![],
        )
        .unwrap();
        assert_eq!(will.effective_percentage_total(), 80);
    }

    #[test]
    fn asset_given_away_once() {
        let mut will = draft_will();
        let share = ShareSpec::SpecificAsset {
            asset_id: "house-1".to_string(),
            description: "the family home".to_string(),
        };
        will.add_bequest(
            PartyRef::external("First", None),
            Relationship::Child,
            share.clone(),
            vec![],
        )
        .unwrap();

        assert!(matches!(
            will.add_bequest(
                PartyRef::external("Second", None),
                Relationship::Child,
                share,
                vec![],
            ),
            Err(WillError::AssetAlreadyAssigned { .. })
        ));
    }

    #[test]
    fn residuary_rules() {
        let mut will = draft_will();
        will.add_bequest(
            PartyRef::external("First", None),
            Relationship::Child,
            ShareSpec::Residuary { percent: None },
            vec![],
        )
        .unwrap();
        assert!(matches!(
            will.add_bequest(
                PartyRef::external("Second", None),
                Relationship::Child,
                ShareSpec::Residuary { percent: None },
                vec![],
            ),
            Err(WillError::DuplicateResiduary)
        ));

        will.add_bequest(
            PartyRef::external("Third", None),
            Relationship::Sibling,
            ShareSpec::Residuary {
                percent: Some(Percentage::new(70).unwrap()),
            },
            vec![],
        )
        .unwrap();
        assert!(matches!(
            will.add_bequest(
                PartyRef::external("Fourth", None),
                Relationship::Sibling,
                ShareSpec::Residuary {
                    percent: Some(Percentage::new(40).unwrap()),
                },
                vec![],
            ),
            Err(WillError::ResiduaryShareOverflow)
        ));
    }

    #[test]
    fn disinheritance_contradiction_both_directions() {
        let mut will = draft_will();
        let person = PartyRef::external("Estranged Child", None);

        will.add_disinheritance(DisinheritanceRecord::new(
            person.clone(),
            Relationship::Child,
            DisinheritanceReason::Estrangement,
            "No contact for fifteen years.",
            DisinheritanceSeverity::Complete,
        ))
        .unwrap();
        assert!(matches!(
            will.add_bequest(
                person.clone(),
                Relationship::Child,
                ShareSpec::Percentage {
                    percent: Percentage::new(10).unwrap(),
                },
                vec![],
            ),
            Err(WillError::BeneficiaryIsDisinherited { .. })
        ));

        let other = PartyRef::external("Another Child", None);
        will.add_bequest(
            other.clone(),
            Relationship::Child,
            ShareSpec::Percentage {
                percent: Percentage::new(10).unwrap(),
            },
            vec![],
        )
        .unwrap();
        assert!(matches!(
            will.add_disinheritance(DisinheritanceRecord::new(
                other,
                Relationship::Child,
                DisinheritanceReason::PersonalReasons,
                "Changed my mind.",
                DisinheritanceSeverity::Complete,
            )),
            Err(WillError::ExcludedPersonIsBeneficiary { .. })
        ));
    }

    #[test]
    fn partial_disinheritance_may_coexist_with_bequest() {
        let mut will = draft_will();
        let person = PartyRef::external("Sibling", None);
        will.add_bequest(
            person.clone(),
            Relationship::Sibling,
            ShareSpec::Percentage {
                percent: Percentage::new(5).unwrap(),
            },
            vec![],
        )
        .unwrap();
        will.add_disinheritance(DisinheritanceRecord::new(
            person,
            Relationship::Sibling,
            DisinheritanceReason::PriorTransfer,
            "Received the lake property in 2020.",
            DisinheritanceSeverity::Partial,
        ))
        .unwrap();
    }

    #[test]
    fn one_standing_primary_executor() {
        let mut will = draft_will();
        will.add_executor(
            PartyRef::external("First", None),
            Relationship::Other,
            ExecutorTier::Primary,
            ExecutorPowers::standard(),
        )
        .unwrap();
        assert!(matches!(
            will.add_executor(
                PartyRef::external("Second", None),
                Relationship::Other,
                ExecutorTier::Primary,
                ExecutorPowers::standard(),
            ),
            Err(WillError::DuplicatePrimaryExecutor)
        ));

        // alternates remain fine
        will.add_executor(
            PartyRef::external("Second", None),
            Relationship::Other,
            ExecutorTier::Alternate,
            ExecutorPowers::standard(),
        )
        .unwrap();
    }

    #[test]
    fn removed_primary_frees_the_slot() {
        let mut will = draft_will();
        let id = will
            .add_executor(
                PartyRef::external("First", None),
                Relationship::Other,
                ExecutorTier::Primary,
                ExecutorPowers::standard(),
            )
            .unwrap();
        will.remove_executor(id).unwrap();
        will.add_executor(
            PartyRef::external("Second", None),
            Relationship::Other,
            ExecutorTier::Primary,
            ExecutorPowers::standard(),
        )
        .unwrap();
    }

    #[test]
    fn mutation_locked_outside_draft() {
        let mut will = attested_will();
        assert!(matches!(
            will.add_bequest(
                PartyRef::external("Late Addition", None),
                Relationship::Other,
                ShareSpec::Percentage {
                    percent: Percentage::new(5).unwrap(),
                },
                vec![],
            ),
            Err(WillError::DocumentImmutable { .. })
        ));
        assert!(matches!(
            will.set_funeral_wishes("changed"),
            Err(WillError::DocumentImmutable { .. })
        ));
    }

    #[test]
    fn codicil_only_after_attestation() {
        let mut draft = draft_will();
        assert!(matches!(
            draft.add_codicil(AmendmentKind::Addition, vec![], "too early"),
            Err(WillError::CodicilNotAllowed { .. })
        ));

        let mut will = attested_will();
        let codicil_id = will
            .add_codicil(
                AmendmentKind::Modification,
                vec!["clause-2".to_string()],
                "Update guardianship",
            )
            .unwrap();

        let w1 = PartyRef::external("Witness A", None);
        let w2 = PartyRef::external("Witness B", None);
        will.add_codicil_witness(codicil_id, w1.clone()).unwrap();
        will.add_codicil_witness(codicil_id, w2.clone()).unwrap();
        will.record_codicil_signature(codicil_id, &w1).unwrap();
        will.record_codicil_signature(codicil_id, &w2).unwrap();

        assert!(will.codicils()[0].is_attested());
    }

    #[test]
    fn events_accumulate_and_drain() {
        let mut will = draft_will();
        will.set_funeral_wishes("cremation, ashes scattered at sea")
            .unwrap();

        let events = will.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "WillCreated");
        assert_eq!(events[1].event_type(), "ClauseUpdated");
        assert!(will.pending_events().is_empty());
    }

    #[test]
    fn failed_mutation_records_no_event() {
        let mut will = draft_will();
        will.take_events();

        let _ = will.submit_for_attestation();
        assert!(will.pending_events().is_empty());
    }

    #[test]
    fn supersede_records_successor() {
        let mut will = attested_will();
        will.activate().unwrap();
        let successor = AggregateId::new();
        will.supersede(successor).unwrap();
        assert_eq!(will.status(), WillStatus::Superseded);
        assert_eq!(will.superseded_by(), Some(successor));
    }
}
