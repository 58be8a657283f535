//! chairside-core: ROI estimation types, formulas and display helpers

pub mod counter;
pub mod format;
pub mod formula;
pub mod inputs;
pub mod tier;

pub use counter::{AnimatedCounter, CountUp, Easing};
pub use format::{OutputSummary, format_currency, format_grouped, format_months, format_percent};
pub use formula::{
    ANNUAL_COST, EstimatorOutputs, HOURLY_RATE, MONTHS_PER_YEAR, Payback, WEEKS_PER_YEAR,
    evaluate,
};
pub use inputs::{EstimatorInputs, InputError, InputField};
pub use tier::{InvestmentTier, TierAssessment, assess_investment};
