//! Read-only compliance services over a hydrated will.
//!
//! None of these mutate the aggregate; they produce advisory reports the
//! caller may store (the witness eligibility snapshot) or surface to the
//! testator and registrar.

pub mod eligibility;
pub mod readiness;
pub mod risk;
pub mod solvency;

pub use eligibility::{EligibilityChecker, WitnessCandidate, MINIMUM_WITNESS_AGE};
pub use readiness::{
    ReadinessReport, ReadinessTier, ReadinessValidator, ValidationIssue, ValidationSeverity,
    ValidationWarning,
};
pub use risk::{LegalStrength, RiskAssessment, RiskLevel, RiskScorer, WillRiskProfile};
pub use solvency::{
    DebtClaim, DebtTier, EstateAsset, SolvencyAnalyzer, SolvencyReport, TierSettlement,
};
