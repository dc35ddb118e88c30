//! Witnesses and their attestation sub-lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::values::{LegalDeclarations, PartyRef, Relationship, SignatureRecord};
use super::WillError;

/// Statutory minimum age for a witness.
pub const MINIMUM_WITNESS_AGE: u8 = 18;

/// Unique identifier for a witness entry on a will.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WitnessId(Uuid);

impl WitnessId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for WitnessId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WitnessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a witness stands in the attestation sub-lifecycle.
///
/// `Pending ──► Signed ──► Verified`, with `Rejected` reachable from
/// either non-terminal state. `Verified` and `Rejected` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttestationStatus {
    /// Added to the document; has not yet signed.
    #[default]
    Pending,

    /// Has signed; awaiting registrar verification.
    Signed,

    /// Signature verified by the registrar.
    Verified,

    /// Struck from the ceremony.
    Rejected,
}

impl AttestationStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttestationStatus::Pending => "Pending",
            AttestationStatus::Signed => "Signed",
            AttestationStatus::Verified => "Verified",
            AttestationStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for AttestationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of an eligibility conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// A specific reason a person should not witness a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Below the statutory minimum age.
    UnderAge,

    /// Receives something under the document.
    IsBeneficiary,

    /// Spouse of the testator.
    IsSpouse,

    /// Lacks the mental capacity to attest.
    LacksCapacity,

    /// Nominated as an executor of the same document.
    IsExecutor,

    /// Close family member of the testator.
    CloseFamily,
}

impl ConflictKind {
    /// The severity attached to each conflict. The first four are legal
    /// impediments; the last two are advisory.
    pub fn severity(&self) -> ConflictSeverity {
        match self {
            ConflictKind::UnderAge => ConflictSeverity::Critical,
            ConflictKind::IsBeneficiary => ConflictSeverity::Critical,
            ConflictKind::IsSpouse => ConflictSeverity::Critical,
            ConflictKind::LacksCapacity => ConflictSeverity::Critical,
            ConflictKind::IsExecutor => ConflictSeverity::High,
            ConflictKind::CloseFamily => ConflictSeverity::Medium,
        }
    }

    /// Returns true if the conflict bars the person from witnessing
    /// rather than merely counselling against it.
    pub fn is_disqualifying(&self) -> bool {
        self.severity() == ConflictSeverity::Critical
    }
}

/// One finding from the eligibility checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConflict {
    pub kind: ConflictKind,
    pub severity: ConflictSeverity,
    pub detail: String,
}

impl EligibilityConflict {
    pub fn new(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            detail: detail.into(),
        }
    }
}

/// The eligibility checker's verdict for a candidate, stored on the
/// witness entry as advisory context for the registrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilitySnapshot {
    /// Whether the candidate is legally able to witness.
    pub eligible: bool,

    /// Every conflict found, disqualifying or advisory.
    pub conflicts: Vec<EligibilityConflict>,

    /// Non-blocking observations.
    pub warnings: Vec<String>,

    /// Suitability score in 0..=100.
    pub score: u8,

    /// When the check was run.
    pub checked_at: DateTime<Utc>,
}

/// A person attesting the will.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// Identity of this witness entry.
    pub witness_id: WitnessId,

    /// Who the witness is.
    pub party: PartyRef,

    /// Relationship to the testator.
    pub relationship: Relationship,

    /// Age at the time of addition, when known.
    pub age: Option<u8>,

    /// Whether the witness has the mental capacity to attest.
    pub has_capacity: bool,

    /// Position in the attestation sub-lifecycle.
    pub status: AttestationStatus,

    /// The statutory declarations made so far.
    pub declarations: LegalDeclarations,

    /// The signature, once made.
    pub signature: Option<SignatureRecord>,

    /// Why the witness was struck, when rejected.
    pub rejection_reason: Option<String>,

    /// Advisory eligibility verdict recorded when the witness was added.
    pub eligibility: Option<EligibilitySnapshot>,
}

impl Witness {
    /// Creates a pending witness entry.
    pub fn new(party: PartyRef, relationship: Relationship, age: Option<u8>) -> Self {
        Self {
            witness_id: WitnessId::new(),
            party,
            relationship,
            age,
            has_capacity: true,
            status: AttestationStatus::Pending,
            declarations: LegalDeclarations::default(),
            signature: None,
            rejection_reason: None,
            eligibility: None,
        }
    }

    /// Records the witness's signature.
    ///
    /// All five statutory declarations must be confirmed before the
    /// signature is accepted, and a witness signs exactly once.
    pub fn sign(
        &mut self,
        declarations: LegalDeclarations,
        signature: SignatureRecord,
    ) -> Result<(), WillError> {
        match self.status {
            AttestationStatus::Pending => {}
            AttestationStatus::Signed | AttestationStatus::Verified => {
                return Err(WillError::WitnessAlreadySigned {
                    name: self.party.display_name().to_string(),
                });
            }
            AttestationStatus::Rejected => {
                return Err(WillError::WitnessRejected {
                    name: self.party.display_name().to_string(),
                });
            }
        }

        if !declarations.all_confirmed() {
            return Err(WillError::DeclarationsIncomplete {
                name: self.party.display_name().to_string(),
            });
        }

        self.declarations = declarations;
        self.signature = Some(signature);
        self.status = AttestationStatus::Signed;
        Ok(())
    }

    /// Marks the signature as verified by the registrar.
    pub fn verify(&mut self) -> Result<(), WillError> {
        if self.status != AttestationStatus::Signed {
            return Err(WillError::WitnessNotSigned {
                name: self.party.display_name().to_string(),
            });
        }
        self.status = AttestationStatus::Verified;
        Ok(())
    }

    /// Strikes the witness from the ceremony.
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), WillError> {
        if matches!(
            self.status,
            AttestationStatus::Verified | AttestationStatus::Rejected
        ) {
            return Err(WillError::WitnessNotRejectable {
                name: self.party.display_name().to_string(),
                status: self.status,
            });
        }
        self.status = AttestationStatus::Rejected;
        self.rejection_reason = Some(reason.into());
        Ok(())
    }

    /// Returns true if the witness counts toward the attestation quorum.
    pub fn counts_toward_quorum(&self) -> bool {
        matches!(
            self.status,
            AttestationStatus::Signed | AttestationStatus::Verified
        )
    }
}
