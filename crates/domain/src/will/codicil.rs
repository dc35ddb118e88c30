//! Codicils: formal amendments to an attested will.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::values::PartyRef;
use super::WillError;

/// Number of signed codicil witnesses required for the amendment to be
/// considered attested.
pub const CODICIL_WITNESS_MINIMUM: usize = 2;

/// Unique identifier for a codicil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodicilId(Uuid);

impl CodicilId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CodicilId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CodicilId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of change the codicil makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmendmentKind {
    /// Adds a new provision.
    Addition,

    /// Changes an existing provision.
    Modification,

    /// Strikes an existing provision.
    Revocation,
}

impl AmendmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmendmentKind::Addition => "Addition",
            AmendmentKind::Modification => "Modification",
            AmendmentKind::Revocation => "Revocation",
        }
    }
}

impl std::fmt::Display for AmendmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A witness to a codicil. Codicils carry their own witnesses, separate
/// from the will's attestation ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodicilWitness {
    /// Who the witness is.
    pub party: PartyRef,

    /// When they signed, if they have.
    pub signed_at: Option<DateTime<Utc>>,
}

impl CodicilWitness {
    pub fn new(party: PartyRef) -> Self {
        Self {
            party,
            signed_at: None,
        }
    }

    pub fn has_signed(&self) -> bool {
        self.signed_at.is_some()
    }
}

/// A formal amendment to an attested will.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codicil {
    /// Identity of this codicil.
    pub codicil_id: CodicilId,

    /// Ordinal position among the will's codicils, starting at 1.
    pub sequence: u32,

    /// The kind of change made.
    pub amendment: AmendmentKind,

    /// Which clauses of the will the amendment touches.
    pub referenced_clauses: Vec<String>,

    /// Human-readable summary of the change.
    pub summary: String,

    /// The codicil's own witnesses.
    pub witnesses: Vec<CodicilWitness>,

    /// When the codicil was created.
    pub created_at: DateTime<Utc>,
}

impl Codicil {
    /// Creates a codicil with no witnesses yet.
    pub fn new(
        sequence: u32,
        amendment: AmendmentKind,
        referenced_clauses: Vec<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            codicil_id: CodicilId::new(),
            sequence,
            amendment,
            referenced_clauses,
            summary: summary.into(),
            witnesses: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a witness to the codicil. The same person may not witness
    /// the same codicil twice.
    pub fn add_witness(&mut self, party: PartyRef) -> Result<(), WillError> {
        if self.witnesses.iter().any(|w| w.party.same_person(&party)) {
            return Err(WillError::DuplicateCodicilWitness {
                name: party.display_name().to_string(),
            });
        }
        self.witnesses.push(CodicilWitness::new(party));
        Ok(())
    }

    /// Records a witness's signature on the codicil.
    pub fn record_signature(&mut self, party: &PartyRef) -> Result<(), WillError> {
        let witness = self
            .witnesses
            .iter_mut()
            .find(|w| w.party.same_person(party))
            .ok_or_else(|| WillError::CodicilWitnessNotFound {
                name: party.display_name().to_string(),
            })?;

        if witness.has_signed() {
            return Err(WillError::WitnessAlreadySigned {
                name: party.display_name().to_string(),
            });
        }
        witness.signed_at = Some(Utc::now());
        Ok(())
    }

    /// Returns true once enough witnesses have signed.
    pub fn is_attested(&self) -> bool {
        self.witnesses.iter().filter(|w| w.has_signed()).count() >= CODICIL_WITNESS_MINIMUM
    }
}
