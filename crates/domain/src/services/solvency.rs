//! Estate solvency analysis: a debt-priority waterfall over the estate.

use serde::{Deserialize, Serialize};

use crate::will::Money;

/// Statutory payment order for estate debts. Every claim in one tier is
/// settled before anything flows to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DebtTier {
    /// Funeral and burial expenses.
    Funeral,

    /// Costs of administering the estate.
    Administration,

    /// Debts secured against estate property.
    Secured,

    /// Taxes and employee wages.
    TaxesAndWages,

    /// Everything else.
    GeneralUnsecured,
}

impl DebtTier {
    /// All tiers in payment order.
    pub const ORDER: [DebtTier; 5] = [
        DebtTier::Funeral,
        DebtTier::Administration,
        DebtTier::Secured,
        DebtTier::TaxesAndWages,
        DebtTier::GeneralUnsecured,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DebtTier::Funeral => "Funeral",
            DebtTier::Administration => "Administration",
            DebtTier::Secured => "Secured",
            DebtTier::TaxesAndWages => "TaxesAndWages",
            DebtTier::GeneralUnsecured => "GeneralUnsecured",
        }
    }
}

impl std::fmt::Display for DebtTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An asset of the estate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstateAsset {
    pub asset_id: String,
    pub description: String,
    pub value: Money,

    /// Whether the asset can settle debts without being sold first.
    pub liquid: bool,

    /// Whether a creditor holds security over the asset.
    pub encumbered: bool,
}

impl EstateAsset {
    pub fn liquid(asset_id: impl Into<String>, description: impl Into<String>, value: Money) -> Self {
        Self {
            asset_id: asset_id.into(),
            description: description.into(),
            value,
            liquid: true,
            encumbered: false,
        }
    }

    pub fn illiquid(
        asset_id: impl Into<String>,
        description: impl Into<String>,
        value: Money,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            description: description.into(),
            value,
            liquid: false,
            encumbered: false,
        }
    }

    /// Marks the asset as held as security for a debt.
    pub fn encumbered(mut self) -> Self {
        self.encumbered = true;
        self
    }
}

/// A claim against the estate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtClaim {
    pub creditor: String,
    pub tier: DebtTier,
    pub amount: Money,
}

impl DebtClaim {
    pub fn new(creditor: impl Into<String>, tier: DebtTier, amount: Money) -> Self {
        Self {
            creditor: creditor.into(),
            tier,
            amount,
        }
    }
}

/// What happened to one tier in the waterfall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSettlement {
    pub tier: DebtTier,

    /// Total claims in this tier.
    pub claimed: Money,

    /// Amount the waterfall could cover.
    pub paid: Money,

    /// Unpaid remainder.
    pub shortfall: Money,

    /// True when an earlier tier already fell short, so these claims
    /// depend on assets that may not materialize.
    pub at_risk: bool,
}

impl TierSettlement {
    pub fn fully_paid(&self) -> bool {
        self.shortfall.is_zero()
    }
}

/// The analyzer's verdict for an estate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvencyReport {
    pub total_assets: Money,
    pub liquid_assets: Money,

    /// Value of assets a creditor could reach without court involvement.
    pub free_and_clear_assets: Money,

    pub total_debt: Money,

    /// Every tier in payment order, settled or not.
    pub tiers: Vec<TierSettlement>,

    /// Assets left for beneficiaries after all debts.
    pub residual_estate: Money,

    /// True when every claim can be paid in full.
    pub is_solvent: bool,

    /// Liquid assets divided by total debt. Above 1.0 the estate can pay
    /// without selling anything.
    pub liquidity_ratio: f64,

    /// Solvent on paper but unable to pay from liquid assets alone.
    pub cash_poor: bool,
}

impl SolvencyReport {
    /// The settlement for one tier.
    pub fn tier(&self, tier: DebtTier) -> Option<&TierSettlement> {
        self.tiers.iter().find(|t| t.tier == tier)
    }

    /// Total unpaid claims across all tiers.
    pub fn total_shortfall(&self) -> Money {
        self.tiers.iter().map(|t| t.shortfall).sum()
    }
}

/// Runs the debt-priority waterfall over an estate.
///
/// The waterfall never stops early: every tier is reported even when the
/// funds ran out several tiers up, so the report always shows the full
/// shape of an insolvency.
#[derive(Debug, Default)]
pub struct SolvencyAnalyzer;

impl SolvencyAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyzes the estate as it stands.
    pub fn analyze(&self, assets: &[EstateAsset], debts: &[DebtClaim]) -> SolvencyReport {
        let total_assets: Money = assets.iter().map(|a| a.value).sum();
        let liquid_assets: Money = assets
            .iter()
            .filter(|a| a.liquid)
            .map(|a| a.value)
            .sum();
        let free_and_clear_assets: Money = assets
            .iter()
            .filter(|a| !a.encumbered)
            .map(|a| a.value)
            .sum();
        let total_debt: Money = debts.iter().map(|d| d.amount).sum();

        let mut remaining = total_assets;
        let mut earlier_shortfall = false;
        let mut tiers = Vec::with_capacity(DebtTier::ORDER.len());

        for tier in DebtTier::ORDER {
            let claimed: Money = debts
                .iter()
                .filter(|d| d.tier == tier)
                .map(|d| d.amount)
                .sum();
            let paid = claimed.min(remaining);
            let shortfall = claimed - paid;
            remaining -= paid;

            tiers.push(TierSettlement {
                tier,
                claimed,
                paid,
                shortfall,
                at_risk: earlier_shortfall && claimed.is_positive(),
            });
            if shortfall.is_positive() {
                earlier_shortfall = true;
            }
        }

        let is_solvent = tiers.iter().all(TierSettlement::fully_paid);
        let liquidity_ratio = if total_debt.is_positive() {
            liquid_assets.cents() as f64 / total_debt.cents() as f64
        } else {
            f64::INFINITY
        };

        SolvencyReport {
            total_assets,
            liquid_assets,
            free_and_clear_assets,
            total_debt,
            tiers,
            residual_estate: remaining,
            is_solvent,
            liquidity_ratio,
            cash_poor: is_solvent && liquid_assets < total_debt,
        }
    }

    /// Re-runs the analysis as if the named asset had been sold for
    /// `sale_price`, replacing its book value with liquid proceeds.
    pub fn simulate_asset_sale(
        &self,
        assets: &[EstateAsset],
        debts: &[DebtClaim],
        asset_id: &str,
        sale_price: Money,
    ) -> SolvencyReport {
        let adjusted: Vec<EstateAsset> = assets
            .iter()
            .map(|asset| {
                if asset.asset_id == asset_id {
                    EstateAsset {
                        value: sale_price,
                        liquid: true,
                        encumbered: false,
                        ..asset.clone()
                    }
                } else {
                    asset.clone()
                }
            })
            .collect();
        self.analyze(&adjusted, debts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dollars(amount: i64) -> Money {
        Money::from_dollars(amount)
    }

    #[test]
    fn solvent_estate_pays_everything() {
        let assets = vec![EstateAsset::liquid("cash", "bank accounts", dollars(500_000))];
        let debts = vec![
            DebtClaim::new("Funeral home", DebtTier::Funeral, dollars(20_000)),
            DebtClaim::new("Credit card", DebtTier::GeneralUnsecured, dollars(30_000)),
        ];

        let report = SolvencyAnalyzer::new().analyze(&assets, &debts);
        assert!(report.is_solvent);
        assert!(!report.cash_poor);
        assert_eq!(report.residual_estate, dollars(450_000));
        assert_eq!(report.total_shortfall(), Money::zero());
        assert!(report.liquidity_ratio > 1.0);
    }

    #[test]
    fn waterfall_shortfall_lands_on_the_lowest_tier() {
        let assets = vec![EstateAsset::liquid("cash", "bank accounts", dollars(1_000_000))];
        let debts = vec![
            DebtClaim::new("Funeral home", DebtTier::Funeral, dollars(50_000)),
            DebtClaim::new("Mortgage bank", DebtTier::Secured, dollars(200_000)),
            DebtClaim::new(
                "Trade creditors",
                DebtTier::GeneralUnsecured,
                dollars(900_000),
            ),
        ];

        let report = SolvencyAnalyzer::new().analyze(&assets, &debts);
        assert!(!report.is_solvent);

        let funeral = report.tier(DebtTier::Funeral).unwrap();
        assert_eq!(funeral.paid, dollars(50_000));
        assert!(funeral.fully_paid());

        let secured = report.tier(DebtTier::Secured).unwrap();
        assert_eq!(secured.paid, dollars(200_000));
        assert!(secured.fully_paid());

        let unsecured = report.tier(DebtTier::GeneralUnsecured).unwrap();
        assert_eq!(unsecured.paid, dollars(750_000));
        assert_eq!(unsecured.shortfall, dollars(150_000));

        assert_eq!(report.residual_estate, Money::zero());
        assert_eq!(report.total_shortfall(), dollars(150_000));
    }

    #[test]
    fn later_tiers_marked_at_risk_after_a_shortfall() {
        let assets = vec![EstateAsset::liquid("cash", "bank accounts", dollars(10_000))];
        let debts = vec![
            DebtClaim::new("Funeral home", DebtTier::Funeral, dollars(15_000)),
            DebtClaim::new("Tax office", DebtTier::TaxesAndWages, dollars(5_000)),
            DebtClaim::new("Credit card", DebtTier::GeneralUnsecured, dollars(2_000)),
        ];

        let report = SolvencyAnalyzer::new().analyze(&assets, &debts);

        let funeral = report.tier(DebtTier::Funeral).unwrap();
        assert!(!funeral.at_risk);
        assert_eq!(funeral.shortfall, dollars(5_000));

        // every later tier with claims is flagged, and still reported
        assert!(report.tier(DebtTier::TaxesAndWages).unwrap().at_risk);
        assert!(report.tier(DebtTier::GeneralUnsecured).unwrap().at_risk);
        assert_eq!(
            report.tier(DebtTier::GeneralUnsecured).unwrap().paid,
            Money::zero()
        );

        // empty tiers are reported but not flagged
        assert!(!report.tier(DebtTier::Secured).unwrap().at_risk);
    }

    #[test]
    fn cash_poor_estate_is_solvent_but_illiquid() {
        let assets = vec![
            EstateAsset::liquid("cash", "bank accounts", dollars(20_000)),
            EstateAsset::illiquid("house", "family home", dollars(800_000)),
        ];
        let debts = vec![DebtClaim::new(
            "Mortgage bank",
            DebtTier::Secured,
            dollars(100_000),
        )];

        let report = SolvencyAnalyzer::new().analyze(&assets, &debts);
        assert!(report.is_solvent);
        assert!(report.cash_poor);
        assert!((report.liquidity_ratio - 0.2).abs() < 1e-9);
    }

    #[test]
    fn encumbered_assets_excluded_from_free_and_clear() {
        let assets = vec![
            EstateAsset::liquid("cash", "bank accounts", dollars(50_000)),
            EstateAsset::illiquid("house", "family home", dollars(400_000)).encumbered(),
        ];
        let debts = vec![DebtClaim::new(
            "Mortgage bank",
            DebtTier::Secured,
            dollars(300_000),
        )];

        let report = SolvencyAnalyzer::new().analyze(&assets, &debts);
        assert_eq!(report.total_assets, dollars(450_000));
        assert_eq!(report.free_and_clear_assets, dollars(50_000));

        // selling the house releases the security
        let after_sale = SolvencyAnalyzer::new().simulate_asset_sale(
            &assets,
            &debts,
            "house",
            dollars(400_000),
        );
        assert_eq!(after_sale.free_and_clear_assets, dollars(450_000));
    }

    #[test]
    fn no_debt_means_infinite_liquidity() {
        let assets = vec![EstateAsset::liquid("cash", "bank accounts", dollars(1_000))];
        let report = SolvencyAnalyzer::new().analyze(&assets, &[]);
        assert!(report.is_solvent);
        assert!(report.liquidity_ratio.is_infinite());
        assert_eq!(report.residual_estate, dollars(1_000));
    }

    #[test]
    fn simulated_sale_converts_value_to_liquidity() {
        let assets = vec![
            EstateAsset::liquid("cash", "bank accounts", dollars(20_000)),
            EstateAsset::illiquid("house", "family home", dollars(800_000)),
        ];
        let debts = vec![DebtClaim::new(
            "Mortgage bank",
            DebtTier::Secured,
            dollars(100_000),
        )];
        let analyzer = SolvencyAnalyzer::new();

        // sold below book value, but the estate is no longer cash poor
        let report = analyzer.simulate_asset_sale(&assets, &debts, "house", dollars(700_000));
        assert!(report.is_solvent);
        assert!(!report.cash_poor);
        assert_eq!(report.total_assets, dollars(720_000));
        assert_eq!(report.liquid_assets, dollars(720_000));
    }

    #[test]
    fn sale_at_a_loss_can_reveal_insolvency() {
        let assets = vec![EstateAsset::illiquid("house", "family home", dollars(500_000))];
        let debts = vec![DebtClaim::new(
            "Mortgage bank",
            DebtTier::Secured,
            dollars(450_000),
        )];
        let analyzer = SolvencyAnalyzer::new();

        assert!(analyzer.analyze(&assets, &debts).is_solvent);

        let report = analyzer.simulate_asset_sale(&assets, &debts, "house", dollars(400_000));
        assert!(!report.is_solvent);
        assert_eq!(
            report.tier(DebtTier::Secured).unwrap().shortfall,
            dollars(50_000)
        );
    }
}
