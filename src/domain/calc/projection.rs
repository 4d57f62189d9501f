use crate::domain::money::{from_f64, out_of_range, round_half_up, round_money, to_f64};
use crate::error::{InvestError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Geometric monthly rate equivalent to `annual_rate`: `(1 + r)^(1/12) - 1`.
pub fn monthly_rate(annual_rate: f64) -> Result<f64> {
    if !annual_rate.is_finite() || annual_rate <= -1.0 {
        return Err(InvestError::invalid(format!(
            "annual return must be greater than -100%, got {annual_rate}"
        )));
    }
    Ok((1.0 + annual_rate).powf(1.0 / 12.0) - 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month: u32,
    pub year: u32,
    pub projected_value: Decimal,
    /// Growth since month 0, in percent.
    pub cumulative_return: Decimal,
}

/// Compounds `current_value` monthly for months `0..=horizon_months`.
///
/// A horizon whose projected value leaves the decimal range is rejected.
pub fn project(current_value: Decimal, annual_rate: f64, horizon_months: u32) -> Result<Vec<ProjectionPoint>> {
    if current_value < Decimal::ZERO {
        return Err(InvestError::invalid(format!(
            "current value cannot be negative, got {current_value}"
        )));
    }
    let monthly = monthly_rate(annual_rate)?;
    let base = to_f64(current_value);

    (0..=horizon_months)
        .map(|month| -> Result<ProjectionPoint> {
            let growth = (1.0 + monthly).powf(f64::from(month));
            let projected = base * growth;
            let cumulative = if base > 0.0 { (growth - 1.0) * 100.0 } else { 0.0 };
            Ok(ProjectionPoint {
                month,
                year: month / 12,
                projected_value: round_money(from_f64(projected)?),
                cumulative_return: round_money(from_f64(cumulative)?),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub target: Decimal,
    pub label: String,
    /// Whole months until the target is passed; absent when unreachable.
    pub months_to_reach: Option<u32>,
    pub years_to_reach: Option<Decimal>,
    pub achievable: bool,
}

/// Months of compounding at `monthly_rate` needed to grow `current_value` to `target`.
///
/// Targets at or below the current value, an empty portfolio and a
/// non-positive rate are all reported as not achievable instead of producing
/// a negative or infinite month count. A month count too large to report is
/// an error.
pub fn milestone(target: Decimal, current_value: Decimal, monthly_rate: f64) -> Result<Milestone> {
    let label = milestone_label(target);
    let unreachable = Milestone {
        target,
        label: label.clone(),
        months_to_reach: None,
        years_to_reach: None,
        achievable: false,
    };

    if current_value <= Decimal::ZERO || target <= current_value || monthly_rate <= 0.0 {
        return Ok(unreachable);
    }

    let months = (to_f64(target) / to_f64(current_value)).ln() / (1.0 + monthly_rate).ln();
    if months.is_nan() || months <= 0.0 {
        return Ok(unreachable);
    }
    let whole_months = months.ceil();
    if whole_months > f64::from(u32::MAX) {
        return Err(out_of_range(format!("{whole_months} months to reach {target}")));
    }

    Ok(Milestone {
        target,
        label,
        months_to_reach: Some(whole_months as u32),
        years_to_reach: Some(round_half_up(from_f64(months / 12.0)?, 1)),
        achievable: true,
    })
}

/// Dollar label with thousands separators, e.g. `$1,000` or `$12.50`.
pub fn milestone_label(target: Decimal) -> String {
    let rounded = round_money(target.abs());
    let whole = rounded.trunc().to_u64().unwrap_or(0).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if target < Decimal::ZERO { "-" } else { "" };
    let cents = (rounded.fract() * Decimal::ONE_HUNDRED).to_u32().unwrap_or(0);
    if cents == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{cents:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate_is_geometric() {
        let m = monthly_rate(0.08).unwrap();
        assert!(((1.0 + m).powi(12) - 1.08).abs() < 1e-12);
        assert!(m < 0.08 / 12.0);
        assert!(monthly_rate(-1.0).is_err());
        assert!(monthly_rate(f64::NAN).is_err());
    }

    #[test]
    fn test_project_twelve_months() {
        let points = project(dec!(10), 0.08, 12).unwrap();
        assert_eq!(points.len(), 13);
        assert_eq!(points[0].month, 0);
        assert_eq!(points[0].projected_value.to_string(), "10.00");
        assert_eq!(points[0].cumulative_return, Decimal::ZERO);
        assert_eq!(points[12].projected_value, dec!(10.80));
        assert_eq!(points[12].cumulative_return, dec!(8.00));
        assert_eq!(points[12].year, 1);
        assert_eq!(points[11].year, 0);
    }

    #[test]
    fn test_project_zero_value() {
        let points = project(Decimal::ZERO, 0.08, 3).unwrap();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.projected_value.is_zero() && p.cumulative_return.is_zero()));
    }

    #[test]
    fn test_project_rejects_negative_value() {
        assert!(matches!(
            project(dec!(-1), 0.08, 12),
            Err(InvestError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_milestone_below_current_value() {
        let m = milestone(dec!(5), dec!(10), monthly_rate(0.08).unwrap()).unwrap();
        assert!(!m.achievable);
        assert_eq!(m.months_to_reach, None);
        assert_eq!(m.years_to_reach, None);
    }

    #[test]
    fn test_milestone_equal_and_empty_portfolio() {
        let rate = monthly_rate(0.08).unwrap();
        assert!(!milestone(dec!(10), dec!(10), rate).unwrap().achievable);
        assert!(!milestone(dec!(50), Decimal::ZERO, rate).unwrap().achievable);
        assert!(!milestone(dec!(50), dec!(10), 0.0).unwrap().achievable);
    }

    #[test]
    fn test_milestone_doubling() {
        // Doubling at 8% a year takes ln 2 / ln 1.08 ~= 9.006 years.
        let m = milestone(dec!(50), dec!(25), monthly_rate(0.08).unwrap()).unwrap();
        assert!(m.achievable);
        assert_eq!(m.months_to_reach, Some(109));
        assert_eq!(m.years_to_reach, Some(dec!(9.0)));
        assert_eq!(m.label, "$50");
    }

    #[test]
    fn test_project_beyond_decimal_range_rejected() {
        // 1001^50 overflows long before month 600.
        assert!(matches!(
            project(dec!(25.55), 1000.0, 600),
            Err(InvestError::InvalidInput(_))
        ));
        assert_eq!(project(dec!(25.55), 1000.0, 12).unwrap()[12].projected_value, dec!(25575.55));
    }

    #[test]
    fn test_milestone_month_count_too_large() {
        assert!(matches!(
            milestone(dec!(1000000), dec!(0.01), 1e-12),
            Err(InvestError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_milestone_labels() {
        assert_eq!(milestone_label(dec!(1000)), "$1,000");
        assert_eq!(milestone_label(dec!(250)), "$250");
        assert_eq!(milestone_label(dec!(1234567)), "$1,234,567");
        assert_eq!(milestone_label(dec!(12.5)), "$12.50");
    }
}
