//! Tiered readiness validation.
//!
//! Three escalating tiers: attestation-readiness, activation-readiness,
//! probate-readiness. Each tier runs every check of the tier below plus
//! its own rules, and every check accumulates into the report instead of
//! short-circuiting, so a caller gets the full punch list in one pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::will::{AttestationStatus, NominationStatus, Will, WillStatus};

/// The readiness tier being validated. Each tier is a superset of the
/// checks in the tier below it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ReadinessTier {
    /// Ready for the signing ceremony.
    Attestation,

    /// Ready to come into legal effect.
    Activation,

    /// Ready for probate proceedings.
    Probate,
}

impl ReadinessTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessTier::Attestation => "Attestation",
            ReadinessTier::Activation => "Activation",
            ReadinessTier::Probate => "Probate",
        }
    }
}

impl std::fmt::Display for ReadinessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How severely an issue blocks the document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ValidationSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ValidationSeverity {
    fn penalty(&self) -> i32 {
        match self {
            ValidationSeverity::Critical => 25,
            ValidationSeverity::High => 15,
            ValidationSeverity::Medium => 10,
            ValidationSeverity::Low => 5,
        }
    }
}

/// One blocking finding, attributed to the tier whose rule it breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub tier: ReadinessTier,
    pub severity: ValidationSeverity,
    pub message: String,

    /// Statutory citation, where one applies.
    pub citation: Option<String>,
}

impl ValidationIssue {
    fn new(tier: ReadinessTier, severity: ValidationSeverity, message: impl Into<String>) -> Self {
        Self {
            tier,
            severity,
            message: message.into(),
            citation: None,
        }
    }

    fn cited(
        tier: ReadinessTier,
        severity: ValidationSeverity,
        message: impl Into<String>,
        citation: impl Into<String>,
    ) -> Self {
        Self {
            tier,
            severity,
            message: message.into(),
            citation: Some(citation.into()),
        }
    }
}

/// A non-blocking finding with a human-actionable recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub message: String,
    pub recommendation: String,
}

impl ValidationWarning {
    fn new(message: impl Into<String>, recommendation: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }
}

/// The validator's verdict for one tier.
///
/// `is_valid` means no blocking issues; warnings never block but do
/// lower the advisory score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub tier: ReadinessTier,
    pub status: WillStatus,
    pub issues: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationWarning>,
    pub score: u8,
    pub is_valid: bool,
    pub checked_at: DateTime<Utc>,
}

impl ReadinessReport {
    /// Issues attributed to one tier's rules.
    pub fn issues_for(&self, tier: ReadinessTier) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.tier == tier).collect()
    }

    /// The most severe issue present, if any.
    pub fn worst_severity(&self) -> Option<ValidationSeverity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}

/// Validates a will up to a requested tier and scores its readiness.
///
/// The score is advisory; the validity verdict comes from the absence of
/// blocking issues alone. The lifecycle state machine still decides which
/// transitions are open.
#[derive(Debug, Default)]
pub struct ReadinessValidator;

impl ReadinessValidator {
    pub fn new() -> Self {
        Self
    }

    /// Runs every check up to and including `tier` and assembles the report.
    pub fn validate(&self, will: &Will, tier: ReadinessTier) -> ReadinessReport {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        self.check_attestation(will, &mut issues, &mut warnings);
        if tier >= ReadinessTier::Activation {
            self.check_activation(will, tier, &mut issues, &mut warnings);
        }
        if tier >= ReadinessTier::Probate {
            self.check_probate(will, &mut issues);
        }

        let score = Self::score(&issues, &warnings);
        ReadinessReport {
            tier,
            status: will.status(),
            is_valid: issues.is_empty(),
            issues,
            warnings,
            score,
            checked_at: Utc::now(),
        }
    }

    fn check_attestation(
        &self,
        will: &Will,
        issues: &mut Vec<ValidationIssue>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        if will.id().is_none() || will.testator().is_none() {
            issues.push(ValidationIssue::new(
                ReadinessTier::Attestation,
                ValidationSeverity::Critical,
                "Document has not been created for a testator",
            ));
            return;
        }
        if will.status().is_terminal() {
            issues.push(ValidationIssue::new(
                ReadinessTier::Attestation,
                ValidationSeverity::Critical,
                format!("Document is {} and cannot proceed", will.status()),
            ));
        }

        let required = will.document_type().minimum_witnesses();
        let listed = will.listed_witness_count();
        if listed < required {
            issues.push(ValidationIssue::cited(
                ReadinessTier::Attestation,
                ValidationSeverity::Critical,
                format!("Insufficient witnesses: {required} required, {listed} listed"),
                "Wills Act s 9(1)",
            ));
        }

        for witness in will.witnesses() {
            if witness.status == AttestationStatus::Rejected {
                continue;
            }
            if let Some(snapshot) = &witness.eligibility {
                if !snapshot.eligible {
                    issues.push(ValidationIssue::cited(
                        ReadinessTier::Attestation,
                        ValidationSeverity::High,
                        format!(
                            "Witness {} was recorded with a disqualifying conflict",
                            witness.party.display_name()
                        ),
                        "Wills Act s 9(2)",
                    ));
                } else if !snapshot.conflicts.is_empty() {
                    warnings.push(ValidationWarning::new(
                        format!(
                            "Witness {} carries advisory conflicts",
                            witness.party.display_name()
                        ),
                        "Prefer a witness with no conflicts of interest",
                    ));
                }
            }
            if will.status() == WillStatus::PendingAttestation
                && witness.status == AttestationStatus::Pending
            {
                issues.push(ValidationIssue::new(
                    ReadinessTier::Attestation,
                    ValidationSeverity::High,
                    format!(
                        "Witness {} has not signed yet",
                        witness.party.display_name()
                    ),
                ));
            }
        }

        if will.funeral_wishes().is_none() {
            warnings.push(ValidationWarning::new(
                "No funeral wishes recorded",
                "Record the testator's funeral and burial wishes",
            ));
        }
    }

    fn check_activation(
        &self,
        will: &Will,
        tier: ReadinessTier,
        issues: &mut Vec<ValidationIssue>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        match will.capacity() {
            None => issues.push(ValidationIssue::cited(
                ReadinessTier::Activation,
                ValidationSeverity::Critical,
                "No testamentary capacity declaration on file",
                "Wills Act s 7",
            )),
            Some(declaration) if !declaration.of_sound_mind => {
                issues.push(ValidationIssue::cited(
                    ReadinessTier::Activation,
                    ValidationSeverity::Critical,
                    "Capacity declaration does not confirm sound mind",
                    "Wills Act s 7",
                ));
            }
            Some(_) => {}
        }

        if !will.bequests().iter().any(|b| b.is_effective()) {
            issues.push(ValidationIssue::new(
                ReadinessTier::Activation,
                ValidationSeverity::High,
                "No effective bequest disposes of the estate",
            ));
        }
        if !will.has_residuary_disposition() {
            issues.push(ValidationIssue::new(
                ReadinessTier::Activation,
                ValidationSeverity::Medium,
                "No residuary disposition: part of the estate may pass intestate",
            ));
        }

        if !will.executors().iter().any(|e| e.is_active()) {
            issues.push(ValidationIssue::new(
                ReadinessTier::Activation,
                ValidationSeverity::High,
                "No standing executor nomination",
            ));
        } else if !will
            .executors()
            .iter()
            .any(|e| e.is_active() && e.status == NominationStatus::Accepted)
        {
            // escalates from warning to blocker at the probate tier
            if tier >= ReadinessTier::Probate {
                issues.push(ValidationIssue::new(
                    ReadinessTier::Probate,
                    ValidationSeverity::High,
                    "No executor nominee has accepted appointment",
                ));
            } else {
                warnings.push(ValidationWarning::new(
                    "No executor nominee has accepted yet",
                    "Obtain the nominee's acceptance before probate",
                ));
            }
        }
    }

    fn check_probate(&self, will: &Will, issues: &mut Vec<ValidationIssue>) {
        if will.execution().is_none() {
            issues.push(ValidationIssue::new(
                ReadinessTier::Probate,
                ValidationSeverity::Critical,
                "The signing ceremony has not been completed",
            ));
        }
        if !matches!(
            will.status(),
            WillStatus::Active | WillStatus::Contested | WillStatus::InProbate
        ) {
            issues.push(ValidationIssue::new(
                ReadinessTier::Probate,
                ValidationSeverity::High,
                format!("Document is {} and not in legal effect", will.status()),
            ));
        }
        if will.revocation().is_some() {
            issues.push(ValidationIssue::new(
                ReadinessTier::Probate,
                ValidationSeverity::Critical,
                "Document carries a revocation record",
            ));
        }
    }

    fn score(issues: &[ValidationIssue], warnings: &[ValidationWarning]) -> u8 {
        let mut score: i32 = 100;
        for issue in issues {
            score -= issue.severity.penalty();
        }
        score -= 3 * warnings.len() as i32;
        score.clamp(0, 100) as u8
    }
}

#[cfg(test)]
mod tests {
    use common::{AggregateId, PersonId};

    use crate::will::{
        CapacityDeclaration, DocumentType, ExecutorPowers, ExecutorTier, LegalDeclarations,
        PartyRef, Relationship, ShareSpec, SignatureKind, SignatureRecord, Testator,
    };

    use super::*;

    fn draft_will() -> Will {
        let mut will = Will::default();
        will.create(
            AggregateId::new(),
            Testator::new(PersonId::new(), "Ada Lovelace"),
            DocumentType::Standard,
        )
        .unwrap();
        will
    }

    fn complete_draft() -> Will {
        let mut will = draft_will();
        will.declare_capacity(CapacityDeclaration::new("Dr. Smith", true, None))
            .unwrap();
        will.set_funeral_wishes("cremation").unwrap();
        will.add_bequest(
            PartyRef::external("Beneficiary", None),
            Relationship::Child,
            ShareSpec::Residuary { percent: None },
            vec![],
        )
        .unwrap();
        let executor_id = will
            .add_executor(
                PartyRef::external("Marie Curie", None),
                Relationship::Other,
                ExecutorTier::Primary,
                ExecutorPowers::standard(),
            )
            .unwrap();
        will.record_executor_response(executor_id, true, None)
            .unwrap();
        for name in ["Grace Hopper", "Alan Turing"] {
            will.add_witness(
                PartyRef::external(name, None),
                Relationship::Other,
                Some(40),
                None,
            )
            .unwrap();
        }
        will
    }

    fn activated_will() -> Will {
        let mut will = complete_draft();
        will.submit_for_attestation().unwrap();
        let witness_ids: Vec<_> = will.witnesses().iter().map(|w| w.witness_id).collect();
        for witness_id in witness_ids {
            will.record_witness_signature(
                witness_id,
                LegalDeclarations::all(),
                SignatureRecord::new(SignatureKind::Wet, None),
            )
            .unwrap();
        }
        will.attest("Registry office".to_string()).unwrap();
        will.activate().unwrap();
        will
    }

    #[test]
    fn complete_draft_is_ready_through_activation() {
        let validator = ReadinessValidator::new();
        let will = complete_draft();

        for tier in [ReadinessTier::Attestation, ReadinessTier::Activation] {
            let report = validator.validate(&will, tier);
            assert!(report.is_valid, "{tier}: {:?}", report.issues);
            assert_eq!(report.score, 100);
        }
    }

    #[test]
    fn zero_witnesses_is_a_critical_issue() {
        let mut will = draft_will();
        will.declare_capacity(CapacityDeclaration::new("Dr. Smith", true, None))
            .unwrap();

        let report = ReadinessValidator::new().validate(&will, ReadinessTier::Attestation);
        assert!(!report.is_valid);

        let attestation = report.issues_for(ReadinessTier::Attestation);
        assert_eq!(attestation.len(), 1);
        assert_eq!(attestation[0].severity, ValidationSeverity::Critical);
        assert!(attestation[0].message.contains("2 required, 0 listed"));
        assert!(attestation[0].citation.is_some());
    }

    #[test]
    fn capacity_is_checked_from_the_activation_tier_up() {
        let mut will = draft_will();
        will.add_bequest(
            PartyRef::external("Beneficiary", None),
            Relationship::Child,
            ShareSpec::Residuary { percent: None },
            vec![],
        )
        .unwrap();

        let validator = ReadinessValidator::new();
        let attestation = validator.validate(&will, ReadinessTier::Attestation);
        assert!(attestation
            .issues_for(ReadinessTier::Activation)
            .is_empty());

        let activation = validator.validate(&will, ReadinessTier::Activation);
        let capacity: Vec<_> = activation
            .issues_for(ReadinessTier::Activation)
            .into_iter()
            .filter(|i| i.message.contains("capacity"))
            .collect();
        assert_eq!(capacity.len(), 1);
        assert_eq!(capacity[0].severity, ValidationSeverity::Critical);
    }

    #[test]
    fn unsound_mind_declaration_blocks_activation() {
        let mut will = draft_will();
        will.declare_capacity(CapacityDeclaration::new("Dr. Smith", false, None))
            .unwrap();

        let report = ReadinessValidator::new().validate(&will, ReadinessTier::Activation);
        assert!(report
            .issues
            .iter()
            .any(|i| i.message.contains("sound mind")));
    }

    #[test]
    fn score_reflects_severity_and_warnings() {
        // bare draft at activation: witnesses critical (25), capacity
        // critical (25), no bequest high (15), no residuary medium (10),
        // no executor high (15), plus the funeral-wishes warning (3)
        let report = ReadinessValidator::new().validate(&draft_will(), ReadinessTier::Activation);
        assert_eq!(report.score, 100 - 25 - 25 - 15 - 10 - 15 - 3);
        assert_eq!(report.worst_severity(), Some(ValidationSeverity::Critical));
        assert!(!report.is_valid);
    }

    #[test]
    fn pending_signatures_flagged_during_ceremony() {
        let mut will = complete_draft();
        will.submit_for_attestation().unwrap();

        let report = ReadinessValidator::new().validate(&will, ReadinessTier::Attestation);
        let unsigned: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.message.contains("not signed"))
            .collect();
        assert_eq!(unsigned.len(), 2);
    }

    #[test]
    fn probate_tier_requires_a_completed_ceremony() {
        let report = ReadinessValidator::new().validate(&complete_draft(), ReadinessTier::Probate);
        assert!(!report.is_valid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.message.contains("ceremony")));
        assert!(report
            .issues
            .iter()
            .any(|i| i.message.contains("not in legal effect")));
    }

    #[test]
    fn activated_will_is_ready_for_probate() {
        let report = ReadinessValidator::new().validate(&activated_will(), ReadinessTier::Probate);
        assert!(report.is_valid, "unexpected issues: {:?}", report.issues);
    }

    #[test]
    fn unaccepted_executor_escalates_at_probate() {
        let mut will = draft_will();
        will.declare_capacity(CapacityDeclaration::new("Dr. Smith", true, None))
            .unwrap();
        will.add_executor(
            PartyRef::external("Marie Curie", None),
            Relationship::Other,
            ExecutorTier::Primary,
            ExecutorPowers::standard(),
        )
        .unwrap();

        let validator = ReadinessValidator::new();
        let activation = validator.validate(&will, ReadinessTier::Activation);
        assert!(activation
            .warnings
            .iter()
            .any(|w| w.message.contains("accepted")));

        let probate = validator.validate(&will, ReadinessTier::Probate);
        assert!(probate
            .issues
            .iter()
            .any(|i| i.message.contains("accepted appointment")));
    }
}
