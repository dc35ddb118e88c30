//! Witness eligibility checking and candidate ranking.

use chrono::Utc;

use crate::will::{
    ConflictKind, ConflictSeverity, EligibilityConflict, EligibilitySnapshot, PartyRef,
    Relationship, Will,
};

pub use crate::will::MINIMUM_WITNESS_AGE;

/// A person proposed as a witness, before they are added to the will.
#[derive(Debug, Clone)]
pub struct WitnessCandidate {
    pub party: PartyRef,
    pub relationship: Relationship,
    pub age: Option<u8>,
    pub has_capacity: bool,
}

impl WitnessCandidate {
    pub fn new(party: PartyRef, relationship: Relationship, age: Option<u8>) -> Self {
        Self {
            party,
            relationship,
            age,
            has_capacity: true,
        }
    }
}

/// Checks proposed witnesses against a will's current contents.
///
/// Legal impediments (under age, beneficiary, spouse, lacking capacity)
/// make the candidate ineligible. Advisory conflicts (nominated executor,
/// close family) and warnings lower the suitability score but do not
/// disqualify.
#[derive(Debug, Default)]
pub struct EligibilityChecker;

impl EligibilityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Produces an eligibility verdict for one candidate.
    pub fn check(&self, candidate: &WitnessCandidate, will: &Will) -> EligibilitySnapshot {
        let mut conflicts = Vec::new();
        let mut warnings = Vec::new();

        match candidate.age {
            Some(age) if age < MINIMUM_WITNESS_AGE => {
                conflicts.push(EligibilityConflict::new(
                    ConflictKind::UnderAge,
                    format!("{} is {age}, below the minimum of {MINIMUM_WITNESS_AGE}",
                        candidate.party.display_name()),
                ));
            }
            Some(_) => {}
            None => warnings.push(format!(
                "Age of {} is not recorded",
                candidate.party.display_name()
            )),
        }

        if will.is_effective_beneficiary(&candidate.party) {
            conflicts.push(EligibilityConflict::new(
                ConflictKind::IsBeneficiary,
                format!(
                    "{} receives a bequest under this will",
                    candidate.party.display_name()
                ),
            ));
        }

        if candidate.relationship == Relationship::Spouse {
            conflicts.push(EligibilityConflict::new(
                ConflictKind::IsSpouse,
                format!(
                    "{} is the testator's spouse",
                    candidate.party.display_name()
                ),
            ));
        }

        if !candidate.has_capacity {
            conflicts.push(EligibilityConflict::new(
                ConflictKind::LacksCapacity,
                format!(
                    "{} lacks the capacity to attest",
                    candidate.party.display_name()
                ),
            ));
        }

        if will
            .executors()
            .iter()
            .any(|e| e.is_active() && e.party.same_person(&candidate.party))
        {
            conflicts.push(EligibilityConflict::new(
                ConflictKind::IsExecutor,
                format!(
                    "{} is nominated as an executor of this will",
                    candidate.party.display_name()
                ),
            ));
        }

        if candidate.relationship.is_close_family()
            && candidate.relationship != Relationship::Spouse
        {
            conflicts.push(EligibilityConflict::new(
                ConflictKind::CloseFamily,
                format!(
                    "{} is close family ({}) of the testator",
                    candidate.party.display_name(),
                    candidate.relationship
                ),
            ));
        }

        if matches!(&candidate.party, PartyRef::External { national_id: None, .. }) {
            warnings.push(format!(
                "Identity of {} cannot be verified without a national ID",
                candidate.party.display_name()
            ));
        }

        let eligible = !conflicts.iter().any(|c| c.kind.is_disqualifying());
        let score = Self::score(&conflicts, &warnings);
        EligibilitySnapshot {
            eligible,
            conflicts,
            warnings,
            score,
            checked_at: Utc::now(),
        }
    }

    /// Checks several candidates and returns them ordered best-first.
    pub fn rank<'a>(
        &self,
        candidates: &'a [WitnessCandidate],
        will: &Will,
    ) -> Vec<(&'a WitnessCandidate, EligibilitySnapshot)> {
        let mut ranked: Vec<_> = candidates
            .iter()
            .map(|c| (c, self.check(c, will)))
            .collect();
        ranked.sort_by(|a, b| b.1.score.cmp(&a.1.score));
        ranked
    }

    fn score(conflicts: &[EligibilityConflict], warnings: &[String]) -> u8 {
        let mut score: i32 = 100;
        for conflict in conflicts {
            score -= match conflict.severity {
                ConflictSeverity::Critical => 50,
                ConflictSeverity::High => 25,
                ConflictSeverity::Medium => 10,
                ConflictSeverity::Low => 5,
            };
        }
        score -= 3 * warnings.len() as i32;
        if conflicts.is_empty() && warnings.is_empty() {
            score += 5;
        }
        score.clamp(0, 100) as u8
    }
}
