//! Disinheritance records: explicit exclusions from the estate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::values::{PartyRef, Relationship};

/// Unique identifier for a disinheritance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisinheritanceId(Uuid);

impl DisinheritanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DisinheritanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DisinheritanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why the person is being excluded. Ordered roughly by how often each
/// ground survives a court challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisinheritanceReason {
    /// A court has already ordered the exclusion.
    CourtOrder,

    /// The excluded person was convicted of relevant criminal conduct.
    CriminalConduct,

    /// The person already received their share during the testator's life.
    PriorTransfer,

    /// Long-standing estrangement from the testator.
    Estrangement,

    /// Financial grounds (the person is well provided for, owes the
    /// estate money, or similar).
    FinancialReasons,

    /// Personal grounds stated by the testator.
    PersonalReasons,
}

impl DisinheritanceReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisinheritanceReason::CourtOrder => "CourtOrder",
            DisinheritanceReason::CriminalConduct => "CriminalConduct",
            DisinheritanceReason::PriorTransfer => "PriorTransfer",
            DisinheritanceReason::Estrangement => "Estrangement",
            DisinheritanceReason::FinancialReasons => "FinancialReasons",
            DisinheritanceReason::PersonalReasons => "PersonalReasons",
        }
    }
}

impl std::fmt::Display for DisinheritanceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How far the exclusion goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisinheritanceSeverity {
    /// Excluded from part of the estate only.
    Partial,

    /// Excluded unless a stated condition is met.
    Conditional,

    /// Excluded from the entire estate.
    Complete,
}

impl DisinheritanceSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisinheritanceSeverity::Partial => "Partial",
            DisinheritanceSeverity::Conditional => "Conditional",
            DisinheritanceSeverity::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for DisinheritanceSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An explicit exclusion of a person from the estate.
///
/// A complete disinheritance contradicts any effective bequest to the
/// same person; the aggregate rejects whichever is recorded second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisinheritanceRecord {
    /// Identity of this record.
    pub disinheritance_id: DisinheritanceId,

    /// Who is excluded.
    pub excluded: PartyRef,

    /// Relationship of the excluded person to the testator.
    pub relationship: Relationship,

    /// The ground for exclusion.
    pub reason: DisinheritanceReason,

    /// The testator's written justification.
    pub justification: String,

    /// How far the exclusion goes.
    pub severity: DisinheritanceSeverity,

    /// References to supporting evidence (court orders, correspondence).
    pub evidence_refs: Vec<String>,

    /// A nominal alternative provision left to the excluded person,
    /// which weakens a pretermitted-heir challenge.
    pub alternative_provision: Option<String>,

    /// A personal statement from the testator explaining the decision.
    pub personal_statement: Option<String>,

    /// When the record was added.
    pub added_at: DateTime<Utc>,
}

impl DisinheritanceRecord {
    /// Creates a new disinheritance record.
    pub fn new(
        excluded: PartyRef,
        relationship: Relationship,
        reason: DisinheritanceReason,
        justification: impl Into<String>,
        severity: DisinheritanceSeverity,
    ) -> Self {
        Self {
            disinheritance_id: DisinheritanceId::new(),
            excluded,
            relationship,
            reason,
            justification: justification.into(),
            severity,
            evidence_refs: Vec::new(),
            alternative_provision: None,
            personal_statement: None,
            added_at: Utc::now(),
        }
    }

    /// Attaches evidence references.
    pub fn with_evidence(mut self, refs: Vec<String>) -> Self {
        self.evidence_refs = refs;
        self
    }

    /// Attaches an alternative provision.
    pub fn with_alternative_provision(mut self, provision: impl Into<String>) -> Self {
        self.alternative_provision = Some(provision.into());
        self
    }

    /// Attaches a personal statement.
    pub fn with_personal_statement(mut self, statement: impl Into<String>) -> Self {
        self.personal_statement = Some(statement.into());
        self
    }

    /// Returns true if the exclusion covers the whole estate.
    pub fn is_complete(&self) -> bool {
        self.severity == DisinheritanceSeverity::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_supporting_material() {
        let record = DisinheritanceRecord::new(
            PartyRef::external("Estranged Child", None),
            Relationship::Child,
            DisinheritanceReason::Estrangement,
            "No contact for fifteen years despite repeated attempts.",
            DisinheritanceSeverity::Complete,
        )
        .with_evidence(vec!["letter-2019-04".to_string()])
        .with_alternative_provision("One dollar")
        .with_personal_statement("I make this decision with a clear mind.");

        assert!(record.is_complete());
        assert_eq!(record.evidence_refs.len(), 1);
        assert!(record.alternative_provision.is_some());
        assert!(record.personal_statement.is_some());
    }

    #[test]
    fn partial_exclusion_is_not_complete() {
        let record = DisinheritanceRecord::new(
            PartyRef::external("Sibling", None),
            Relationship::Sibling,
            DisinheritanceReason::PriorTransfer,
            "Received the lake property in 2020.",
            DisinheritanceSeverity::Partial,
        );
        assert!(!record.is_complete());
    }
}
