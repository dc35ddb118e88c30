//! Domain layer for the testament registry.
//!
//! This crate provides:
//! - The `Will` aggregate with its lifecycle state machine and
//!   cross-entity invariant enforcement
//! - Child entities (witnesses, executor nominations, bequests, codicils,
//!   disinheritance records) with their own sub-lifecycles
//! - Read-only compliance services: witness eligibility, tiered
//!   readiness validation, disinheritance risk scoring, and estate
//!   solvency analysis

pub mod error;
pub mod services;
pub mod will;

pub use error::DomainError;
pub use will::{
    AmendmentKind, AttestationStatus, Bequest, BequestId, BequestStatus, CapacityDeclaration,
    Codicil, CodicilId, CodicilWitness, CommandEnvelope, CommandOutcome, ConflictKind,
    ConflictSeverity, DisinheritanceId, DisinheritanceReason, DisinheritanceRecord,
    DisinheritanceSeverity, DocumentType, EligibilityConflict, EligibilitySnapshot,
    ExecutionRecord, ExecutorId, ExecutorNomination, ExecutorPowers, ExecutorTier,
    LegalDeclarations, Money, NominationStatus, PartyRef, Percentage, Relationship,
    RevocationRecord, ShareSpec, SignatureKind, SignatureRecord, Testator, Will, WillError,
    WillEvent, WillService, WillStatus, Witness, WitnessId,
};
