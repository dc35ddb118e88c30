//! Contest-risk scoring for disinheritance records.

use serde::{Deserialize, Serialize};

use crate::will::{
    DisinheritanceId, DisinheritanceReason, DisinheritanceRecord, DisinheritanceSeverity,
    Relationship, Will,
};

/// Justification text shorter than this weakens the record.
const SHORT_JUSTIFICATION_CHARS: usize = 100;

/// A personal statement at least this long strengthens the record.
const SUBSTANTIAL_STATEMENT_CHARS: usize = 200;

/// How likely the exclusion is to draw a court challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
    Extreme,
}

impl RiskLevel {
    fn from_points(points: u32) -> Self {
        match points {
            0..=24 => RiskLevel::Low,
            25..=44 => RiskLevel::Moderate,
            45..=64 => RiskLevel::High,
            65..=84 => RiskLevel::Severe,
            _ => RiskLevel::Extreme,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Severe => "Severe",
            RiskLevel::Extreme => "Extreme",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How well the record would hold up if challenged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LegalStrength {
    Weak,
    Moderate,
    Strong,
}

impl LegalStrength {
    fn from_score(score: u8) -> Self {
        match score {
            75..=100 => LegalStrength::Strong,
            50..=74 => LegalStrength::Moderate,
            _ => LegalStrength::Weak,
        }
    }
}

/// The scorer's verdict for one disinheritance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub disinheritance_id: DisinheritanceId,
    pub excluded_name: String,

    /// Contest-risk points; higher means more likely to be challenged.
    pub risk_points: u32,
    pub risk_level: RiskLevel,

    /// Documentation-strength score in 0..=100.
    pub strength_score: u8,
    pub legal_strength: LegalStrength,

    /// Concrete steps that would strengthen the record.
    pub recommendations: Vec<String>,
}

/// Aggregated risk over every exclusion on a will.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WillRiskProfile {
    pub assessments: Vec<RiskAssessment>,

    /// The highest individual risk level, or `Low` with no exclusions.
    pub overall_level: RiskLevel,
}

/// Scores disinheritance records for contest risk and documentation
/// strength.
///
/// Risk points combine who is excluded (closer family challenges more),
/// why (subjective grounds challenge more), and how completely. Strength
/// starts from full marks and loses points for missing evidence, thin
/// justification, and the absence of softening provisions.
#[derive(Debug, Default)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn new() -> Self {
        Self
    }

    /// Raw contest-risk points for a relationship, ground, and severity.
    ///
    /// Exposed so read models can score from event payloads without
    /// rehydrating the aggregate.
    pub fn points_for(
        relationship: Relationship,
        reason: DisinheritanceReason,
        severity: DisinheritanceSeverity,
    ) -> u32 {
        Self::relationship_points(relationship)
            + Self::reason_points(reason)
            + Self::severity_points(severity)
    }

    /// The risk bucket for a point total.
    pub fn level_for(points: u32) -> RiskLevel {
        RiskLevel::from_points(points)
    }

    /// Scores a single record.
    pub fn assess(&self, record: &DisinheritanceRecord) -> RiskAssessment {
        let risk_points =
            Self::points_for(record.relationship, record.reason, record.severity);

        let (strength_score, recommendations) = Self::strength(record);

        RiskAssessment {
            disinheritance_id: record.disinheritance_id,
            excluded_name: record.excluded.display_name().to_string(),
            risk_points,
            risk_level: RiskLevel::from_points(risk_points),
            strength_score,
            legal_strength: LegalStrength::from_score(strength_score),
            recommendations,
        }
    }

    /// Scores every exclusion on a will.
    pub fn assess_will(&self, will: &Will) -> WillRiskProfile {
        let assessments: Vec<_> = will
            .disinheritances()
            .iter()
            .map(|record| self.assess(record))
            .collect();
        let overall_level = assessments
            .iter()
            .map(|a| a.risk_level)
            .max()
            .unwrap_or(RiskLevel::Low);
        WillRiskProfile {
            assessments,
            overall_level,
        }
    }

    fn relationship_points(relationship: Relationship) -> u32 {
        match relationship {
            Relationship::Spouse => 40,
            Relationship::Child => 30,
            Relationship::Parent => 20,
            Relationship::Sibling => 15,
            Relationship::Other => 5,
        }
    }

    fn reason_points(reason: DisinheritanceReason) -> u32 {
        match reason {
            DisinheritanceReason::PersonalReasons => 30,
            DisinheritanceReason::FinancialReasons => 25,
            DisinheritanceReason::Estrangement => 15,
            DisinheritanceReason::PriorTransfer => 10,
            DisinheritanceReason::CriminalConduct => 5,
            DisinheritanceReason::CourtOrder => 0,
        }
    }

    fn severity_points(severity: DisinheritanceSeverity) -> u32 {
        match severity {
            DisinheritanceSeverity::Complete => 30,
            DisinheritanceSeverity::Conditional => 15,
            DisinheritanceSeverity::Partial => 10,
        }
    }

    fn strength(record: &DisinheritanceRecord) -> (u8, Vec<String>) {
        let mut score: i32 = 100;
        let mut recommendations = Vec::new();

        if record.evidence_refs.is_empty() {
            score -= 30;
            recommendations
                .push("Attach supporting evidence (correspondence, court orders)".to_string());
        }
        if record.justification.chars().count() < SHORT_JUSTIFICATION_CHARS {
            score -= 20;
            recommendations.push(format!(
                "Expand the written justification to at least {SHORT_JUSTIFICATION_CHARS} characters"
            ));
        }
        if record.alternative_provision.is_none() {
            score -= 15;
            recommendations.push(
                "Consider a nominal alternative provision to weaken a pretermitted-heir claim"
                    .to_string(),
            );
        }
        if record.severity == DisinheritanceSeverity::Complete {
            score -= 10;
        }
        match &record.personal_statement {
            Some(statement) if statement.chars().count() >= SUBSTANTIAL_STATEMENT_CHARS => {
                score += 10;
            }
            _ => recommendations
                .push("Add a substantial personal statement from the testator".to_string()),
        }

        (score.clamp(0, 100) as u8, recommendations)
    }
}

#[cfg(test)]
mod tests {
    use crate::will::PartyRef;

    use super::*;

    fn record(
        relationship: Relationship,
        reason: DisinheritanceReason,
        severity: DisinheritanceSeverity,
    ) -> DisinheritanceRecord {
        DisinheritanceRecord::new(
            PartyRef::external("Excluded", None),
            relationship,
            reason,
            "short",
            severity,
        )
    }

    #[test]
    fn spouse_personal_complete_is_extreme() {
        let assessment = RiskScorer::new().assess(&record(
            Relationship::Spouse,
            DisinheritanceReason::PersonalReasons,
            DisinheritanceSeverity::Complete,
        ));
        assert_eq!(assessment.risk_points, 100);
        assert_eq!(assessment.risk_level, RiskLevel::Extreme);
    }

    #[test]
    fn court_ordered_exclusion_of_outsider_is_low() {
        let assessment = RiskScorer::new().assess(&record(
            Relationship::Other,
            DisinheritanceReason::CourtOrder,
            DisinheritanceSeverity::Partial,
        ));
        assert_eq!(assessment.risk_points, 15);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
    }

    #[test]
    fn risk_grows_with_severity() {
        let scorer = RiskScorer::new();
        let partial = scorer.assess(&record(
            Relationship::Child,
            DisinheritanceReason::Estrangement,
            DisinheritanceSeverity::Partial,
        ));
        let conditional = scorer.assess(&record(
            Relationship::Child,
            DisinheritanceReason::Estrangement,
            DisinheritanceSeverity::Conditional,
        ));
        let complete = scorer.assess(&record(
            Relationship::Child,
            DisinheritanceReason::Estrangement,
            DisinheritanceSeverity::Complete,
        ));

        assert!(partial.risk_points < conditional.risk_points);
        assert!(conditional.risk_points < complete.risk_points);
        assert!(partial.risk_level <= complete.risk_level);
    }

    #[test]
    fn bare_record_is_weak_with_recommendations() {
        let assessment = RiskScorer::new().assess(&record(
            Relationship::Child,
            DisinheritanceReason::Estrangement,
            DisinheritanceSeverity::Complete,
        ));
        // 100 - 30 evidence - 20 justification - 15 provision - 10 complete
        assert_eq!(assessment.strength_score, 25);
        assert_eq!(assessment.legal_strength, LegalStrength::Weak);
        assert_eq!(assessment.recommendations.len(), 4);
    }

    #[test]
    fn documented_record_is_strong() {
        let documented = DisinheritanceRecord::new(
            PartyRef::external("Excluded", None),
            Relationship::Sibling,
            DisinheritanceReason::PriorTransfer,
            "x".repeat(150),
            DisinheritanceSeverity::Partial,
        )
        .with_evidence(vec!["deed-2020".to_string()])
        .with_alternative_provision("The painting in the hallway")
        .with_personal_statement("s".repeat(250));

        let assessment = RiskScorer::new().assess(&documented);
        // nothing deducted, statement bonus clamps at 100
        assert_eq!(assessment.strength_score, 100);
        assert_eq!(assessment.legal_strength, LegalStrength::Strong);
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn will_profile_takes_the_worst_level() {
        use crate::will::{DocumentType, Testator, Will};
        use common::{AggregateId, PersonId};

        let mut will = Will::default();
        will.create(
            AggregateId::new(),
            Testator::new(PersonId::new(), "Ada Lovelace"),
            DocumentType::Standard,
        )
        .unwrap();
        will.add_disinheritance(record(
            Relationship::Other,
            DisinheritanceReason::CourtOrder,
            DisinheritanceSeverity::Partial,
        ))
        .unwrap();
        will.add_disinheritance(DisinheritanceRecord::new(
            PartyRef::external("Estranged Child", None),
            Relationship::Child,
            DisinheritanceReason::PersonalReasons,
            "short",
            DisinheritanceSeverity::Complete,
        ))
        .unwrap();

        let profile = RiskScorer::new().assess_will(&will);
        assert_eq!(profile.assessments.len(), 2);
        // 30 + 30 + 30 = 90 points
        assert_eq!(profile.overall_level, RiskLevel::Extreme);
    }

    #[test]
    fn empty_will_profile_is_low() {
        use crate::will::{DocumentType, Testator, Will};
        use common::{AggregateId, PersonId};

        let mut will = Will::default();
        will.create(
            AggregateId::new(),
            Testator::new(PersonId::new(), "Ada Lovelace"),
            DocumentType::Standard,
        )
        .unwrap();

        let profile = RiskScorer::new().assess_will(&will);
        assert!(profile.assessments.is_empty());
        assert_eq!(profile.overall_level, RiskLevel::Low);
    }
}
