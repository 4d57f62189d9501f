use crate::domain::money::{from_f64, out_of_range, percent_of, round_money, to_f64};
use crate::error::{InvestError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One portfolio valuation snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Trailing window of snapshots a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "14d")]
    Fortnight,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "all")]
    All,
}

impl Period {
    pub fn window(&self) -> Option<usize> {
        match self {
            Period::Week => Some(7),
            Period::Fortnight => Some(14),
            Period::Month => Some(30),
            Period::All => None,
        }
    }

    /// The last `window` points of `points`, or all of them.
    pub fn trailing<'a>(&self, points: &'a [PerformancePoint]) -> &'a [PerformancePoint] {
        match self.window() {
            Some(n) if points.len() > n => &points[points.len() - n..],
            _ => points,
        }
    }
}

impl FromStr for Period {
    type Err = InvestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(Period::Week),
            "14d" => Ok(Period::Fortnight),
            "30d" => Ok(Period::Month),
            "all" => Ok(Period::All),
            other => Err(InvestError::invalid(format!("unknown period '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub total_change: Decimal,
    pub total_change_percent: Decimal,
    /// Day-over-day returns in percent, 2 dp.
    pub daily_returns: Vec<Decimal>,
    /// Population standard deviation of the daily returns.
    pub volatility: Decimal,
}

/// Change and volatility over an ordered series of snapshots.
///
/// An empty series is rejected. A single point has no returns and zero
/// volatility. Returns whose previous value is zero are undefined and skipped.
pub fn performance(points: &[PerformancePoint]) -> Result<PerformanceMetrics> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first.value, last.value),
        _ => return Err(InvestError::invalid("performance series is empty")),
    };

    let total_change = last
        .checked_sub(first)
        .ok_or_else(|| out_of_range(format!("change from {first} to {last}")))?;
    let total_change_percent = if first > Decimal::ZERO {
        percent_of(total_change, first, 2)?
    } else {
        Decimal::ZERO
    };

    let returns = points
        .windows(2)
        .filter(|w| !w[0].value.is_zero())
        .map(|w| {
            w[1].value
                .checked_sub(w[0].value)
                .and_then(|delta| delta.checked_div(w[0].value))
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(|| out_of_range(format!("return from {} to {}", w[0].value, w[1].value)))
        })
        .collect::<Result<Vec<Decimal>>>()?;

    let volatility = if returns.is_empty() {
        Decimal::ZERO
    } else {
        let overflow = || out_of_range("variance of daily returns");
        let n = Decimal::from(returns.len());
        let mean = returns
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(*r))
            .ok_or_else(overflow)?
            / n;
        let variance = returns
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| {
                let deviation = r.checked_sub(mean)?;
                acc.checked_add(deviation.checked_mul(deviation)?)
            })
            .ok_or_else(overflow)?
            / n;
        round_money(from_f64(to_f64(variance).sqrt())?)
    };

    Ok(PerformanceMetrics {
        start_value: first,
        end_value: last,
        total_change: round_money(total_change),
        total_change_percent,
        daily_returns: returns.into_iter().map(round_money).collect(),
        volatility,
    })
}
