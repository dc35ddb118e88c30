//! Value objects for the will domain.

use chrono::{DateTime, Utc};
use common::PersonId;
use serde::{Deserialize, Serialize};

use super::WillError;

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Creates a new Money amount from a dollar value.
    pub fn from_dollars(dollars: i64) -> Self {
        Self {
            cents: dollars * 100,
        }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Returns the smaller of two amounts.
    pub fn min(self, other: Money) -> Money {
        if self.cents <= other.cents { self } else { other }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents.abs() % 100
        )
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents + rhs.cents,
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents - rhs.cents,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents += rhs.cents;
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.cents -= rhs.cents;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// A whole-number percentage in the range 0..=100.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Creates a percentage, rejecting values over 100.
    pub fn new(value: u8) -> Result<Self, WillError> {
        if value > 100 {
            return Err(WillError::InvalidPercentage { value });
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// The statutory form of the document, determining the minimum witness count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DocumentType {
    /// Ordinary typed and witnessed will.
    #[default]
    Standard,

    /// Executed before a notary; stricter witnessing requirement.
    Notarial,

    /// Entirely in the testator's handwriting; no witnesses required.
    Holographic,

    /// Single document executed by two testators.
    Joint,
}

impl DocumentType {
    /// Minimum number of witnesses required for attestation.
    pub fn minimum_witnesses(&self) -> usize {
        match self {
            DocumentType::Standard => 2,
            DocumentType::Notarial => 3,
            DocumentType::Holographic => 0,
            DocumentType::Joint => 2,
        }
    }

    /// Returns the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Standard => "Standard",
            DocumentType::Notarial => "Notarial",
            DocumentType::Holographic => "Holographic",
            DocumentType::Joint => "Joint",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A person referenced by a document: either registered in the system or
/// an external individual known only by descriptive fields.
///
/// Consumers must match exhaustively; there is no bag of optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PartyRef {
    /// A person registered in the system.
    Registered {
        person_id: PersonId,
        full_name: String,
    },

    /// An external individual, identified by name and optional national ID.
    External {
        full_name: String,
        national_id: Option<String>,
    },
}

impl PartyRef {
    /// Creates a reference to a registered person.
    pub fn registered(person_id: PersonId, full_name: impl Into<String>) -> Self {
        PartyRef::Registered {
            person_id,
            full_name: full_name.into(),
        }
    }

    /// Creates a reference to an external individual.
    pub fn external(full_name: impl Into<String>, national_id: Option<String>) -> Self {
        PartyRef::External {
            full_name: full_name.into(),
            national_id,
        }
    }

    /// Returns the display name of the referenced person.
    pub fn display_name(&self) -> &str {
        match self {
            PartyRef::Registered { full_name, .. } => full_name,
            PartyRef::External { full_name, .. } => full_name,
        }
    }

    /// Returns the person ID when the party is registered.
    pub fn person_id(&self) -> Option<PersonId> {
        match self {
            PartyRef::Registered { person_id, .. } => Some(*person_id),
            PartyRef::External { .. } => None,
        }
    }

    /// Returns true if both references identify the same person.
    ///
    /// Registered parties compare by ID. External parties compare by
    /// national ID when both carry one, otherwise by case-insensitive
    /// full name. A registered and an external reference never match.
    pub fn same_person(&self, other: &PartyRef) -> bool {
        match (self, other) {
            (
                PartyRef::Registered { person_id: a, .. },
                PartyRef::Registered { person_id: b, .. },
            ) => a == b,
            (
                PartyRef::External {
                    full_name: name_a,
                    national_id: id_a,
                },
                PartyRef::External {
                    full_name: name_b,
                    national_id: id_b,
                },
            ) => match (id_a, id_b) {
                (Some(a), Some(b)) => a == b,
                _ => name_a.eq_ignore_ascii_case(name_b),
            },
            _ => false,
        }
    }
}

impl std::fmt::Display for PartyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The person making the will.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testator {
    /// Registered identity of the testator.
    pub person_id: PersonId,

    /// Legal name.
    pub full_name: String,
}

impl Testator {
    /// Creates a new testator reference.
    pub fn new(person_id: PersonId, full_name: impl Into<String>) -> Self {
        Self {
            person_id,
            full_name: full_name.into(),
        }
    }

    /// Returns the testator as a party reference.
    pub fn as_party(&self) -> PartyRef {
        PartyRef::registered(self.person_id, self.full_name.clone())
    }
}

/// Relationship of a person to the testator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    Spouse,
    Child,
    Parent,
    Sibling,
    Other,
}

impl Relationship {
    /// Returns true for close-family relationships that raise
    /// best-practice concerns when the person acts as a witness.
    pub fn is_close_family(&self) -> bool {
        !matches!(self, Relationship::Other)
    }

    /// Returns the relationship name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Spouse => "Spouse",
            Relationship::Child => "Child",
            Relationship::Parent => "Parent",
            Relationship::Sibling => "Sibling",
            Relationship::Other => "Other",
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declaration of the testator's testamentary capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityDeclaration {
    /// When the capacity was assessed.
    pub declared_at: DateTime<Utc>,

    /// Who performed the assessment (physician, notary, attorney).
    pub assessed_by: String,

    /// Whether the testator was found of sound mind.
    pub of_sound_mind: bool,

    /// Free-text assessment notes.
    pub notes: Option<String>,
}

impl CapacityDeclaration {
    /// Creates a declaration dated now.
    pub fn new(assessed_by: impl Into<String>, of_sound_mind: bool, notes: Option<String>) -> Self {
        Self {
            declared_at: Utc::now(),
            assessed_by: assessed_by.into(),
            of_sound_mind,
            notes,
        }
    }
}

/// Record of the signing ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// When the document was executed.
    pub executed_at: DateTime<Utc>,

    /// Where the signing ceremony took place.
    pub location: String,

    /// How many witnesses signed.
    pub witness_count: usize,
}

/// How a witness signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureKind {
    /// Ink on paper.
    Wet,

    /// Qualified electronic signature.
    Electronic,

    /// A mark made by a person unable to write, properly acknowledged.
    Mark,
}

/// A witness signature with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// The form of the signature.
    pub kind: SignatureKind,

    /// When the signature was made.
    pub signed_at: DateTime<Utc>,

    /// Where the signature was made.
    pub location: Option<String>,
}

impl SignatureRecord {
    /// Creates a signature record timestamped now.
    pub fn new(kind: SignatureKind, location: Option<String>) -> Self {
        Self {
            kind,
            signed_at: Utc::now(),
            location,
        }
    }

    /// Creates a signature record with an explicit timestamp.
    pub fn at(kind: SignatureKind, signed_at: DateTime<Utc>, location: Option<String>) -> Self {
        Self {
            kind,
            signed_at,
            location,
        }
    }
}

/// The five statutory declarations every witness must make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LegalDeclarations {
    /// The witness receives nothing under the document.
    pub not_beneficiary: bool,

    /// The witness is not the testator's spouse.
    pub not_spouse_of_testator: bool,

    /// The witness is of legal age.
    pub of_legal_age: bool,

    /// The witness understands the nature of the document being signed.
    pub understands_document: bool,

    /// The witness is signing of their own free will.
    pub signing_voluntarily: bool,
}

impl LegalDeclarations {
    /// Declarations with every attestation confirmed.
    pub fn all() -> Self {
        Self {
            not_beneficiary: true,
            not_spouse_of_testator: true,
            of_legal_age: true,
            understands_document: true,
            signing_voluntarily: true,
        }
    }

    /// Returns true if every declaration has been confirmed.
    pub fn all_confirmed(&self) -> bool {
        self.not_beneficiary
            && self.not_spouse_of_testator
            && self.of_legal_age
            && self.understands_document
            && self.signing_voluntarily
    }
}

/// Record of a revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationRecord {
    /// When the document was revoked.
    pub revoked_at: DateTime<Utc>,

    /// The testator's stated reason.
    pub reason: String,

    /// Who requested the revocation.
    pub revoked_by: Option<PersonId>,
}
