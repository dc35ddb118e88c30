//! The will aggregate and its child entities.

mod aggregate;
mod bequest;
mod codicil;
pub mod commands;
mod disinheritance;
mod events;
mod executor;
mod service;
mod state;
mod values;
mod witness;

use thiserror::Error;

pub use aggregate::{SIGNING_WINDOW_MINUTES, Will};
pub use bequest::{Bequest, BequestId, BequestStatus, ShareSpec};
pub use codicil::{AmendmentKind, CODICIL_WITNESS_MINIMUM, Codicil, CodicilId, CodicilWitness};
pub use commands::CommandEnvelope;
pub use disinheritance::{
    DisinheritanceId, DisinheritanceReason, DisinheritanceRecord, DisinheritanceSeverity,
};
pub use events::WillEvent;
pub use executor::{
    ExecutorId, ExecutorNomination, ExecutorPowers, ExecutorTier, NominationStatus,
};
pub use service::{CommandOutcome, WillService};
pub use state::WillStatus;
pub use values::{
    CapacityDeclaration, DocumentType, ExecutionRecord, LegalDeclarations, Money, PartyRef,
    Percentage, Relationship, RevocationRecord, SignatureKind, SignatureRecord, Testator,
};
pub use witness::{
    AttestationStatus, ConflictKind, ConflictSeverity, EligibilityConflict, EligibilitySnapshot,
    Witness, WitnessId, MINIMUM_WITNESS_AGE,
};

/// Invariant violations raised by the will aggregate and its children.
#[derive(Debug, Error, PartialEq)]
pub enum WillError {
    #[error("Will has not been created yet")]
    NotYetCreated,

    #[error("Will has already been created")]
    AlreadyCreated,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: WillStatus, to: WillStatus },

    #[error("Cannot {action} while the document is {status}")]
    DocumentImmutable { status: WillStatus, action: String },

    #[error("Insufficient witnesses: {required} required, {actual} present")]
    InsufficientWitnesses { required: usize, actual: usize },

    #[error("Witness signatures span {spread_minutes} minutes, exceeding the {window_minutes}-minute ceremony window")]
    SignaturesNotSimultaneous {
        spread_minutes: i64,
        window_minutes: i64,
    },

    #[error("Witness not found: {witness_id}")]
    WitnessNotFound { witness_id: WitnessId },

    #[error("{name} is already listed as a witness")]
    DuplicateWitness { name: String },

    #[error("{name} cannot witness: they receive a bequest under this will")]
    WitnessIsBeneficiary { name: String },

    #[error("{name} cannot witness: they are the testator's spouse")]
    WitnessIsSpouse { name: String },

    #[error("Witness {name} has not confirmed all statutory declarations")]
    DeclarationsIncomplete { name: String },

    #[error("Witness {name} has already signed")]
    WitnessAlreadySigned { name: String },

    #[error("Witness {name} has not signed yet")]
    WitnessNotSigned { name: String },

    #[error("Witness {name} was struck from the ceremony")]
    WitnessRejected { name: String },

    #[error("Witness {name} cannot be rejected while {status}")]
    WitnessNotRejectable {
        name: String,
        status: AttestationStatus,
    },

    #[error("Executor nomination not found: {executor_id}")]
    ExecutorNotFound { executor_id: ExecutorId },

    #[error("{name} already holds a standing nomination on this will")]
    DuplicateNominee { name: String },

    #[error("A standing primary executor is already nominated")]
    DuplicatePrimaryExecutor,

    #[error("Nomination for {name} is not awaiting notification ({status})")]
    NominationNotPending {
        name: String,
        status: NominationStatus,
    },

    #[error("Nomination for {name} is already resolved ({status})")]
    NominationAlreadyResolved {
        name: String,
        status: NominationStatus,
    },

    #[error("Bequest not found: {bequest_id}")]
    BequestNotFound { bequest_id: BequestId },

    #[error("Bequest {bequest_id} is already revoked")]
    BequestAlreadyRevoked { bequest_id: BequestId },

    #[error("Percentage shares would total {attempted}, exceeding 100")]
    AllocationExceedsWhole { attempted: u32 },

    #[error("Asset {asset_id} is already given away by another bequest")]
    AssetAlreadyAssigned { asset_id: String },

    #[error("An open-ended residuary bequest already exists")]
    DuplicateResiduary,

    #[error("Fixed residuary shares would exceed 100 percent")]
    ResiduaryShareOverflow,

    #[error("{name} is completely disinherited and cannot receive a bequest")]
    BeneficiaryIsDisinherited { name: String },

    #[error("{name} holds an effective bequest and cannot be completely disinherited")]
    ExcludedPersonIsBeneficiary { name: String },

    #[error("Codicils cannot be attached while the document is {status}")]
    CodicilNotAllowed { status: WillStatus },

    #[error("Codicil not found: {codicil_id}")]
    CodicilNotFound { codicil_id: CodicilId },

    #[error("{name} already witnesses this codicil")]
    DuplicateCodicilWitness { name: String },

    #[error("{name} is not a witness on this codicil")]
    CodicilWitnessNotFound { name: String },

    #[error("Activation requires a sound-mind capacity declaration")]
    CapacityNotConfirmed,

    #[error("Activation requires at least one effective bequest")]
    NoEffectiveBeneficiary,

    #[error("Activation requires at least one standing executor nomination")]
    NoEligibleExecutor,

    #[error("Activation requires a residuary disposition")]
    NoResiduaryDisposition,

    #[error("Witness {name} is ineligible: {reason}")]
    IneligibleWitness { name: String, reason: String },

    #[error("Percentage must be between 0 and 100, got {value}")]
    InvalidPercentage { value: u8 },
}
