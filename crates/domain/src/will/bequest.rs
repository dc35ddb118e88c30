//! Bequests: dispositions of the estate to beneficiaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::values::{PartyRef, Percentage, Relationship};
use super::WillError;

/// Unique identifier for a bequest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BequestId(Uuid);

impl BequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the beneficiary receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ShareSpec {
    /// A named asset. Each asset may be given away at most once.
    SpecificAsset {
        asset_id: String,
        description: String,
    },

    /// A fixed percentage of the divisible estate. The percentage shares
    /// across all effective bequests may not exceed 100.
    Percentage { percent: Percentage },

    /// Whatever remains after specific and percentage gifts. A fixed
    /// residuary share is optional; at most one open-ended residuary
    /// bequest may exist, and fixed residuary shares may not exceed 100
    /// in total.
    Residuary { percent: Option<Percentage> },
}

impl ShareSpec {
    /// Returns the asset ID for a specific-asset share.
    pub fn asset_id(&self) -> Option<&str> {
        match self {
            ShareSpec::SpecificAsset { asset_id, .. } => Some(asset_id),
            _ => None,
        }
    }

    /// Returns the percentage this share claims of the divisible estate.
    pub fn percentage(&self) -> Option<Percentage> {
        match self {
            ShareSpec::Percentage { percent } => Some(*percent),
            _ => None,
        }
    }

    /// Returns true for residuary shares.
    pub fn is_residuary(&self) -> bool {
        matches!(self, ShareSpec::Residuary { .. })
    }
}

/// Lifecycle of a bequest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BequestStatus {
    /// Recorded while the will is a draft.
    #[default]
    Pending,

    /// In effect; the will has been attested or activated.
    Active,

    /// Struck from the will.
    Revoked,
}

impl BequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BequestStatus::Pending => "Pending",
            BequestStatus::Active => "Active",
            BequestStatus::Revoked => "Revoked",
        }
    }
}

impl std::fmt::Display for BequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single disposition to a beneficiary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bequest {
    /// Identity of this bequest.
    pub bequest_id: BequestId,

    /// Who receives the gift.
    pub beneficiary: PartyRef,

    /// Relationship of the beneficiary to the testator.
    pub relationship: Relationship,

    /// What the beneficiary receives.
    pub share: ShareSpec,

    /// Lifecycle status.
    pub status: BequestStatus,

    /// When the bequest was recorded.
    pub added_at: DateTime<Utc>,

    /// Conditions attached to the gift (survivorship clauses, age gates).
    pub conditions: Vec<String>,
}

impl Bequest {
    /// Records a new pending bequest.
    pub fn new(
        beneficiary: PartyRef,
        relationship: Relationship,
        share: ShareSpec,
        conditions: Vec<String>,
    ) -> Self {
        Self {
            bequest_id: BequestId::new(),
            beneficiary,
            relationship,
            share,
            status: BequestStatus::Pending,
            added_at: Utc::now(),
            conditions,
        }
    }

    /// Returns true if the bequest still disposes of anything.
    pub fn is_effective(&self) -> bool {
        self.status != BequestStatus::Revoked
    }

    /// Strikes the bequest from the will.
    pub fn revoke(&mut self) -> Result<(), WillError> {
        if self.status == BequestStatus::Revoked {
            return Err(WillError::BequestAlreadyRevoked {
                bequest_id: self.bequest_id,
            });
        }
        self.status = BequestStatus::Revoked;
        Ok(())
    }

    /// Marks a pending bequest active.
    pub fn activate(&mut self) {
        if self.status == BequestStatus::Pending {
            self.status = BequestStatus::Active;
        }
    }
}
