//! Will lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle status of a will.
///
/// Transitions:
/// ```text
/// Draft ──► PendingAttestation ──► Attested ──► Active ──┬──► Revoked ──► Draft
///   ▲               │                  │                 ├──► Superseded
///   └───────────────┘                  └──► Revoked      ├──► Contested ──► Active
///                                                        │        │
///                                                        └──► InProbate ◄┘
///                                                                 │
///                                                                 ▼
///                                                             Executed
/// ```
///
/// `Executed` and `Superseded` are terminal. Only `Draft` accepts
/// ordinary field mutation; codicils are the sanctioned amendment path
/// once the document has been attested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WillStatus {
    /// Document is being drafted; the only status allowing direct edits.
    #[default]
    Draft,

    /// Submitted for the signing ceremony; witnesses sign in this status.
    PendingAttestation,

    /// Signing ceremony completed and validated.
    Attested,

    /// In legal effect.
    Active,

    /// Validity is being challenged.
    Contested,

    /// Before the probate court.
    InProbate,

    /// Revoked by the testator; may be reopened as a draft for correction.
    Revoked,

    /// Replaced by a later will (terminal).
    Superseded,

    /// Estate distributed; the document's life is over (terminal).
    Executed,
}

/// The explicit transition table. Any requested transition not present
/// here fails, naming both states.
const TRANSITIONS: &[(WillStatus, WillStatus)] = &[
    (WillStatus::Draft, WillStatus::PendingAttestation),
    (WillStatus::PendingAttestation, WillStatus::Attested),
    (WillStatus::PendingAttestation, WillStatus::Draft),
    (WillStatus::Attested, WillStatus::Active),
    (WillStatus::Attested, WillStatus::Revoked),
    (WillStatus::Active, WillStatus::Revoked),
    (WillStatus::Active, WillStatus::Superseded),
    (WillStatus::Active, WillStatus::Contested),
    (WillStatus::Active, WillStatus::InProbate),
    (WillStatus::Contested, WillStatus::Active),
    (WillStatus::Contested, WillStatus::InProbate),
    (WillStatus::InProbate, WillStatus::Executed),
    (WillStatus::Revoked, WillStatus::Draft),
];

impl WillStatus {
    /// Returns true if the transition from this status to `to` is legal.
    pub fn can_transition(&self, to: WillStatus) -> bool {
        TRANSITIONS.contains(&(*self, to))
    }

    /// Returns the statuses reachable from this one.
    pub fn successors(&self) -> Vec<WillStatus> {
        TRANSITIONS
            .iter()
            .filter(|(from, _)| from == self)
            .map(|(_, to)| *to)
            .collect()
    }

    /// Returns true if ordinary field mutation is allowed in this status.
    pub fn is_mutable(&self) -> bool {
        matches!(self, WillStatus::Draft)
    }

    /// Returns true if a codicil may be attached in this status.
    ///
    /// Amendment is only sanctioned once the document is past its signing
    /// ceremony and before its life is over.
    pub fn allows_amendment(&self) -> bool {
        matches!(
            self,
            WillStatus::Attested | WillStatus::Active | WillStatus::Contested | WillStatus::InProbate
        )
    }

    /// Returns true if witnesses may sign in this status.
    pub fn allows_witness_signing(&self) -> bool {
        matches!(self, WillStatus::PendingAttestation)
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WillStatus::Executed | WillStatus::Superseded)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            WillStatus::Draft => "Draft",
            WillStatus::PendingAttestation => "PendingAttestation",
            WillStatus::Attested => "Attested",
            WillStatus::Active => "Active",
            WillStatus::Contested => "Contested",
            WillStatus::InProbate => "InProbate",
            WillStatus::Revoked => "Revoked",
            WillStatus::Superseded => "Superseded",
            WillStatus::Executed => "Executed",
        }
    }
}

impl std::fmt::Display for WillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_draft() {
        assert_eq!(WillStatus::default(), WillStatus::Draft);
    }

    #[test]
    fn transitions_follow_the_table() {
        assert!(WillStatus::Draft.can_transition(WillStatus::PendingAttestation));
        assert!(WillStatus::PendingAttestation.can_transition(WillStatus::Attested));
        assert!(WillStatus::PendingAttestation.can_transition(WillStatus::Draft));
        assert!(WillStatus::Attested.can_transition(WillStatus::Active));
        assert!(WillStatus::Active.can_transition(WillStatus::Revoked));
        assert!(WillStatus::Active.can_transition(WillStatus::Superseded));
        assert!(WillStatus::Revoked.can_transition(WillStatus::Draft));
        assert!(WillStatus::InProbate.can_transition(WillStatus::Executed));
    }

    #[test]
    fn transitions_absent_from_the_table_are_rejected() {
        assert!(!WillStatus::Draft.can_transition(WillStatus::Active));
        assert!(!WillStatus::Draft.can_transition(WillStatus::Attested));
        assert!(!WillStatus::Attested.can_transition(WillStatus::Draft));
        assert!(!WillStatus::Executed.can_transition(WillStatus::Revoked));
        assert!(!WillStatus::Superseded.can_transition(WillStatus::Draft));
        assert!(!WillStatus::Revoked.can_transition(WillStatus::Active));
    }

    #[test]
    fn terminal_statuses_have_no_successors() {
        assert!(WillStatus::Executed.successors().is_empty());
        assert!(WillStatus::Superseded.successors().is_empty());
        assert!(!WillStatus::Active.successors().is_empty());
    }

    #[test]
    fn only_draft_is_mutable() {
        assert!(WillStatus::Draft.is_mutable());
        assert!(!WillStatus::PendingAttestation.is_mutable());
        assert!(!WillStatus::Attested.is_mutable());
        assert!(!WillStatus::Active.is_mutable());
        assert!(!WillStatus::Executed.is_mutable());
    }

    #[test]
    fn amendment_allowed_only_past_attestation() {
        assert!(!WillStatus::Draft.allows_amendment());
        assert!(!WillStatus::PendingAttestation.allows_amendment());
        assert!(WillStatus::Attested.allows_amendment());
        assert!(WillStatus::Active.allows_amendment());
        assert!(WillStatus::Contested.allows_amendment());
        assert!(WillStatus::InProbate.allows_amendment());
        assert!(!WillStatus::Executed.allows_amendment());
        assert!(!WillStatus::Superseded.allows_amendment());
    }

    #[test]
    fn terminal_statuses() {
        assert!(WillStatus::Executed.is_terminal());
        assert!(WillStatus::Superseded.is_terminal());
        assert!(!WillStatus::Revoked.is_terminal());
        assert!(!WillStatus::Active.is_terminal());
    }

    #[test]
    fn display() {
        assert_eq!(WillStatus::Draft.to_string(), "Draft");
        assert_eq!(
            WillStatus::PendingAttestation.to_string(),
            "PendingAttestation"
        );
        assert_eq!(WillStatus::InProbate.to_string(), "InProbate");
    }

    #[test]
    fn serialization_roundtrip() {
        let status = WillStatus::Contested;
        let json = serde_json::to_string(&status).unwrap();
        let deserialized: WillStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, deserialized);
    }
}
