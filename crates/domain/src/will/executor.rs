//! Executor nominations and their response sub-lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::values::{PartyRef, Percentage, Relationship};
use super::WillError;

/// Unique identifier for an executor nomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutorId(Uuid);

impl ExecutorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ExecutorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExecutorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role a nominee plays in administering the estate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutorTier {
    /// First in line to administer the estate. At most one per will.
    Primary,

    /// Steps in if the primary cannot or will not serve.
    Alternate,

    /// Serves jointly with the primary.
    CoExecutor,
}

impl ExecutorTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutorTier::Primary => "Primary",
            ExecutorTier::Alternate => "Alternate",
            ExecutorTier::CoExecutor => "CoExecutor",
        }
    }
}

impl std::fmt::Display for ExecutorTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a nomination stands.
///
/// `Nominated ──► Notified ──► Accepted | Declined`, with `Removed`
/// reachable from any non-final state. Acceptance may also be recorded
/// directly from `Nominated` when the nominee responds in person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NominationStatus {
    #[default]
    Nominated,
    Notified,
    Accepted,
    Declined,
    Removed,
}

impl NominationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NominationStatus::Nominated => "Nominated",
            NominationStatus::Notified => "Notified",
            NominationStatus::Accepted => "Accepted",
            NominationStatus::Declined => "Declined",
            NominationStatus::Removed => "Removed",
        }
    }

    /// Returns true once the nominee has answered or been removed.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            NominationStatus::Accepted | NominationStatus::Declined | NominationStatus::Removed
        )
    }
}

impl std::fmt::Display for NominationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The specific powers granted to an executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExecutorPowers {
    /// May settle the estate's debts and expenses.
    pub pay_debts: bool,

    /// May sell real property without further court approval.
    pub sell_real_property: bool,

    /// May invest estate funds pending distribution.
    pub invest_funds: bool,

    /// May continue a business the testator owned.
    pub continue_business: bool,

    /// May distribute personal property among beneficiaries.
    pub distribute_personal_property: bool,

    /// Whether the executor must post a bond before serving.
    pub bond_required: bool,

    /// Compensation as a percentage of the estate, when granted.
    pub compensation: Option<Percentage>,
}

impl ExecutorPowers {
    /// The ordinary grant: everything except continuing a business,
    /// no bond, no compensation.
    pub fn standard() -> Self {
        Self {
            pay_debts: true,
            sell_real_property: true,
            invest_funds: true,
            continue_business: false,
            distribute_personal_property: true,
            bond_required: false,
            compensation: None,
        }
    }
}

/// A nomination of a person to administer the estate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorNomination {
    /// Identity of this nomination.
    pub executor_id: ExecutorId,

    /// Who the nominee is.
    pub party: PartyRef,

    /// Relationship to the testator.
    pub relationship: Relationship,

    /// Role in the administration.
    pub tier: ExecutorTier,

    /// Powers granted.
    pub powers: ExecutorPowers,

    /// Position in the response sub-lifecycle.
    pub status: NominationStatus,

    /// When the nominee was notified, if they were.
    pub notified_at: Option<DateTime<Utc>>,

    /// When the nominee responded, if they have.
    pub responded_at: Option<DateTime<Utc>>,

    /// The nominee's stated reason for declining.
    pub decline_reason: Option<String>,
}

impl ExecutorNomination {
    /// Creates a fresh nomination.
    pub fn new(
        party: PartyRef,
        relationship: Relationship,
        tier: ExecutorTier,
        powers: ExecutorPowers,
    ) -> Self {
        Self {
            executor_id: ExecutorId::new(),
            party,
            relationship,
            tier,
            powers,
            status: NominationStatus::Nominated,
            notified_at: None,
            responded_at: None,
            decline_reason: None,
        }
    }

    /// Records that the nominee was notified of the nomination.
    pub fn mark_notified(&mut self) -> Result<(), WillError> {
        if self.status != NominationStatus::Nominated {
            return Err(WillError::NominationNotPending {
                name: self.party.display_name().to_string(),
                status: self.status,
            });
        }
        self.status = NominationStatus::Notified;
        self.notified_at = Some(Utc::now());
        Ok(())
    }

    /// Records the nominee's acceptance or declination.
    pub fn record_response(
        &mut self,
        accepted: bool,
        decline_reason: Option<String>,
    ) -> Result<(), WillError> {
        if self.status.is_final() {
            return Err(WillError::NominationAlreadyResolved {
                name: self.party.display_name().to_string(),
                status: self.status,
            });
        }
        self.status = if accepted {
            NominationStatus::Accepted
        } else {
            NominationStatus::Declined
        };
        self.responded_at = Some(Utc::now());
        self.decline_reason = if accepted { None } else { decline_reason };
        Ok(())
    }

    /// Removes the nomination.
    pub fn remove(&mut self) -> Result<(), WillError> {
        if self.status == NominationStatus::Removed {
            return Err(WillError::NominationAlreadyResolved {
                name: self.party.display_name().to_string(),
                status: self.status,
            });
        }
        self.status = NominationStatus::Removed;
        Ok(())
    }

    /// Returns true if the nomination still stands (not declined or removed).
    pub fn is_active(&self) -> bool {
        !matches!(
            self.status,
            NominationStatus::Declined | NominationStatus::Removed
        )
    }
}
