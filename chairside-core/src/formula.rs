//! Formula evaluator: inputs -> annual impact, ROI and payback period

use serde::{Deserialize, Serialize};

use crate::inputs::EstimatorInputs;

/// Staff cost per saved hour, in currency units
pub const HOURLY_RATE: f64 = 25.0;
pub const WEEKS_PER_YEAR: f64 = 52.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;
/// Annual subscription cost the ROI is measured against
pub const ANNUAL_COST: f64 = 6000.0;

/// Months until the annual cost is covered by the monthly benefit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Payback {
    /// Rounded to one decimal place
    Months(f64),
    /// No benefit at all: the quotient is not finite
    Never,
}

impl Payback {
    pub fn months(&self) -> Option<f64> {
        match self {
            Payback::Months(m) => Some(*m),
            Payback::Never => None,
        }
    }

    /// One-decimal rendering, `N/A` when the cost is never recovered
    pub fn display(&self) -> String {
        match self {
            Payback::Months(m) => format!("{:.1}", m),
            Payback::Never => "N/A".to_string(),
        }
    }
}

/// Derived results. Always recomputed wholesale from an [`EstimatorInputs`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EstimatorOutputs {
    pub annual_recovered_revenue: f64,
    pub annual_staff_savings: f64,
    /// First-year ROI, whole percent
    pub roi_percentage: i64,
    pub payback_months: Payback,
}

impl EstimatorOutputs {
    /// Recovered revenue plus staff savings
    pub fn total_annual_benefit(&self) -> f64 {
        self.annual_recovered_revenue + self.annual_staff_savings
    }
}

/// Evaluate the ROI formulas. No validation, no failure mode.
pub fn evaluate(inputs: &EstimatorInputs) -> EstimatorOutputs {
    let annual_recovered_revenue =
        inputs.missed_calls_per_month as f64 * inputs.average_treatment_value * MONTHS_PER_YEAR;
    let annual_staff_savings = inputs.hours_saved_per_week as f64 * HOURLY_RATE * WEEKS_PER_YEAR;
    let benefit = annual_recovered_revenue + annual_staff_savings;

    let roi_percentage = round_half_up((benefit / ANNUAL_COST) * 100.0) as i64;

    let raw_payback = ANNUAL_COST / (benefit / MONTHS_PER_YEAR);
    let payback_months = if raw_payback.is_finite() {
        let tenths = to_fixed_1(raw_payback);
        Payback::Months(tenths.parse().unwrap_or(raw_payback))
    } else {
        Payback::Never
    };

    EstimatorOutputs {
        annual_recovered_revenue,
        annual_staff_savings,
        roi_percentage,
        payback_months,
    }
}

// Ties go toward +inf, so -2.5 rounds to -2 rather than -3.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// One-decimal text of the exact binary value, like JavaScript `toFixed(1)`:
/// 0.15 is stored as 0.1499.. and becomes `0.1`; exact ties such as 0.25
/// round away from zero.
fn to_fixed_1(x: f64) -> String {
    let a = x.abs();
    let quarters = a * 4.0;
    let text = if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        format!("{:.1}", (a * 10.0 + 0.5).floor() / 10.0)
    } else {
        format!("{:.1}", a)
    };
    if x < 0.0 { format!("-{}", text) } else { text }
}
