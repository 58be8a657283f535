//! Investment level assessment from monthly practice revenue

use serde::{Deserialize, Serialize};

/// Used when no (or a zero) monthly revenue is given
pub const DEFAULT_MONTHLY_REVENUE: u64 = 50_000;
/// Expected revenue lift as a fraction of current revenue
pub const GROWTH_RATE: f64 = 0.4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InvestmentTier {
    #[serde(rename = "starter-growth")]
    StarterGrowth,
    #[serde(rename = "professional-excellence")]
    ProfessionalExcellence,
    #[serde(rename = "growth-acceleration")]
    GrowthAcceleration,
    #[serde(rename = "enterprise-transformation")]
    EnterpriseTransformation,
}

impl InvestmentTier {
    /// Pick the tier for a projected annual increase. Thresholds are exclusive.
    pub fn for_annual_increase(increase: u64) -> Self {
        if increase > 1_500_000 {
            InvestmentTier::EnterpriseTransformation
        } else if increase > 500_000 {
            InvestmentTier::GrowthAcceleration
        } else if increase > 200_000 {
            InvestmentTier::ProfessionalExcellence
        } else {
            InvestmentTier::StarterGrowth
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InvestmentTier::StarterGrowth => "Starter Growth",
            InvestmentTier::ProfessionalExcellence => "Professional Excellence",
            InvestmentTier::GrowthAcceleration => "Growth Acceleration",
            InvestmentTier::EnterpriseTransformation => "Enterprise Transformation",
        }
    }

    pub fn target(&self) -> &'static str {
        match self {
            InvestmentTier::StarterGrowth => "For practices ready to automate patient acquisition",
            InvestmentTier::ProfessionalExcellence => {
                "For practices scaling clinical and operational efficiency"
            }
            InvestmentTier::GrowthAcceleration => "For practices expanding locations or services",
            InvestmentTier::EnterpriseTransformation => "For DSOs and large practice groups",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierAssessment {
    pub monthly_revenue: u64,
    pub annual_increase: u64,
    pub tier: InvestmentTier,
}

pub fn assess_investment(monthly_revenue: Option<u64>) -> TierAssessment {
    let monthly_revenue = monthly_revenue
        .filter(|r| *r > 0)
        .unwrap_or(DEFAULT_MONTHLY_REVENUE);
    let annual_increase = (monthly_revenue as f64 * GROWTH_RATE * 12.0).round() as u64;

    TierAssessment {
        monthly_revenue,
        annual_increase,
        tier: InvestmentTier::for_annual_increase(annual_increase),
    }
}
