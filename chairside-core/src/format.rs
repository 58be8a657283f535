//! Display formatting for estimator outputs

use serde::{Deserialize, Serialize};

use crate::formula::{EstimatorOutputs, Payback};

/// Group an integer with thousands separators: `1234567` -> `1,234,567`
pub fn format_grouped(value: i64) -> String {
    let digits = group_digits(&value.unsigned_abs().to_string());
    if value < 0 { format!("-{}", digits) } else { digits }
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole currency units: `120000.0` -> `$120,000`, `-1200.4` -> `-$1,200`.
///
/// Works past the i64 range (the digits of the rounded value are printed);
/// NaN and infinities render as `N/A`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "N/A".to_string();
    }
    let whole = amount.round();
    let digits = group_digits(&format!("{:.0}", whole.abs()));
    if whole < 0.0 {
        format!("-${}", digits)
    } else {
        format!("${}", digits)
    }
}

pub fn format_percent(pct: i64) -> String {
    format!("{}%", format_grouped(pct))
}

pub fn format_months(payback: &Payback) -> String {
    match payback {
        Payback::Months(_) => format!("{} months", payback.display()),
        Payback::Never => payback.display(),
    }
}

/// The four headline values, ready to print
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputSummary {
    pub recovered_revenue: String,
    pub staff_savings: String,
    pub roi: String,
    pub payback: String,
}

impl From<&EstimatorOutputs> for OutputSummary {
    fn from(out: &EstimatorOutputs) -> Self {
        Self {
            recovered_revenue: format_currency(out.annual_recovered_revenue),
            staff_savings: format_currency(out.annual_staff_savings),
            roi: format_percent(out.roi_percentage),
            payback: format_months(&out.payback_months),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::evaluate;
    use crate::inputs::EstimatorInputs;

    #[test]
    fn test_grouping() {
        assert_eq!(format_grouped(0), "0");
        assert_eq!(format_grouped(999), "999");
        assert_eq!(format_grouped(1000), "1,000");
        assert_eq!(format_grouped(2_452_000), "2,452,000");
        assert_eq!(format_grouped(-71_500), "-71,500");
    }

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(120_000.0), "$120,000");
        assert_eq!(format_currency(1999.6), "$2,000");
        assert_eq!(format_currency(-1200.4), "-$1,200");
    }

    #[test]
    fn test_currency_beyond_i64() {
        assert_eq!(format_currency(-1e30), "-$1,000,000,000,000,000,019,884,624,838,656");
        assert_eq!(format_currency(1e19), "$10,000,000,000,000,000,000");
        assert_eq!(format_currency(-0.4), "$0");
    }

    #[test]
    fn test_currency_non_finite() {
        assert_eq!(format_currency(f64::NEG_INFINITY), "N/A");
        assert_eq!(format_currency(f64::INFINITY), "N/A");
        assert_eq!(format_currency(f64::NAN), "N/A");
    }

    #[test]
    fn test_summary_for_huge_negative_value() {
        let out = evaluate(&EstimatorInputs::new(10, -1e30, 5));
        let summary = OutputSummary::from(&out);
        assert!(summary.recovered_revenue.starts_with("-$1"));
        assert!(summary.recovered_revenue.matches(',').count() >= 10);
        assert!(summary.roi.starts_with('-'));

        let out = evaluate(&EstimatorInputs::new(10, f64::NEG_INFINITY, 5));
        assert_eq!(OutputSummary::from(&out).recovered_revenue, "N/A");
    }

    #[test]
    fn test_summary_for_defaults() {
        let out = evaluate(&EstimatorInputs::default());
        let summary = OutputSummary::from(&out);
        assert_eq!(summary.recovered_revenue, "$120,000");
        assert_eq!(summary.staff_savings, "$26,000");
        assert_eq!(summary.roi, "2,433%");
        assert_eq!(summary.payback, "0.5 months");
    }

    #[test]
    fn test_summary_never() {
        let out = evaluate(&EstimatorInputs::new(0, 0.0, 0));
        assert_eq!(OutputSummary::from(&out).payback, "N/A");
    }
}
