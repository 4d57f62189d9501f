use crate::domain::investment::{Investment, InvestmentId};
use crate::domain::money::{Currency, percent_of, round_money};
use crate::domain::stock::{Country, StockCatalog};
use crate::error::{InvestError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_invested: Decimal,
    pub total_value: Decimal,
    pub total_gain_loss: Decimal,
    pub total_gain_loss_percent: Decimal,
    pub investment_count: usize,
}

/// Aggregates a user's positions.
///
/// The gain/loss percentage is measured against the amount invested and is
/// zero for an empty (or zero-cost) portfolio.
pub fn summarize(investments: &[Investment]) -> Result<PortfolioSummary> {
    let total_invested: Decimal = investments.iter().map(|i| i.amount).sum();
    let total_value: Decimal = investments.iter().map(Investment::market_value).sum();
    let total_gain_loss: Decimal = investments.iter().map(Investment::gain_loss).sum();

    Ok(PortfolioSummary {
        total_invested: round_money(total_invested),
        total_value: round_money(total_value),
        total_gain_loss: round_money(total_gain_loss),
        total_gain_loss_percent: percent_of(total_gain_loss, total_invested, 2)?,
        investment_count: investments.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: InvestmentId,
    pub stock_symbol: String,
    pub stock_name: String,
    pub shares: Decimal,
    pub value: Decimal,
    pub cost_basis: Decimal,
    pub gain_loss: Decimal,
    pub gain_loss_percent: Decimal,
    /// Share of the portfolio's total value, in percent.
    pub weight: Decimal,
    pub currency: Currency,
    pub country: Country,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HoldingSortKey {
    #[default]
    Value,
    Shares,
    GainLoss,
    GainLossPercent,
    Weight,
}

impl HoldingSortKey {
    fn field(&self, holding: &Holding) -> Decimal {
        match self {
            HoldingSortKey::Value => holding.value,
            HoldingSortKey::Shares => holding.shares,
            HoldingSortKey::GainLoss => holding.gain_loss,
            HoldingSortKey::GainLossPercent => holding.gain_loss_percent,
            HoldingSortKey::Weight => holding.weight,
        }
    }
}

impl FromStr for HoldingSortKey {
    type Err = InvestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "value" => Ok(HoldingSortKey::Value),
            "shares" => Ok(HoldingSortKey::Shares),
            "gainloss" => Ok(HoldingSortKey::GainLoss),
            "gainlosspercent" => Ok(HoldingSortKey::GainLossPercent),
            "weight" => Ok(HoldingSortKey::Weight),
            _ => Err(InvestError::invalid(format!("cannot sort holdings by '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = InvestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(InvestError::invalid(format!("unknown sort order '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingTotals {
    pub total_value: Decimal,
    pub total_gain_loss: Decimal,
    pub total_gain_loss_percent: Decimal,
    pub total_weight: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsReport {
    pub holdings: Vec<Holding>,
    pub totals: HoldingTotals,
    pub sort_by: HoldingSortKey,
    pub sort_order: SortOrder,
}

/// Per-position breakdown with portfolio weights.
///
/// Sorting is stable: holdings with equal keys keep their input order in
/// both directions.
pub fn holdings(
    investments: &[Investment],
    sort_by: HoldingSortKey,
    sort_order: SortOrder,
) -> Result<HoldingsReport> {
    let total_value: Decimal = investments.iter().map(Investment::market_value).sum();

    let mut rows: Vec<Holding> = investments
        .iter()
        .map(|inv| -> Result<Holding> {
            let value = inv.market_value();
            let cost_basis = inv.cost_basis();
            let gain_loss = inv.gain_loss();
            Ok(Holding {
                id: inv.id,
                stock_symbol: inv.stock_symbol.clone(),
                stock_name: inv.stock_name.clone(),
                shares: inv.shares,
                value: round_money(value),
                cost_basis: round_money(cost_basis),
                gain_loss: round_money(gain_loss),
                gain_loss_percent: percent_of(gain_loss, cost_basis, 2)?,
                weight: percent_of(value, total_value, 2)?,
                currency: inv.currency,
                country: inv.country,
            })
        })
        .collect::<Result<_>>()?;

    rows.sort_by(|a, b| {
        let ordering = sort_by.field(a).cmp(&sort_by.field(b));
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let summary = summarize(investments)?;
    let totals = HoldingTotals {
        total_value: summary.total_value,
        total_gain_loss: summary.total_gain_loss,
        total_gain_loss_percent: summary.total_gain_loss_percent,
        total_weight: rows.iter().map(|h| h.weight).sum(),
    };

    Ok(HoldingsReport {
        holdings: rows,
        totals,
        sort_by,
        sort_order,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSlice {
    pub name: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub by_country: Vec<AllocationSlice>,
    pub by_currency: Vec<AllocationSlice>,
    pub by_sector: Vec<AllocationSlice>,
    pub by_market_cap: Vec<AllocationSlice>,
}

fn add_weight(slices: &mut Vec<AllocationSlice>, name: &str, weight: Decimal) {
    match slices.iter_mut().find(|s| s.name == name) {
        Some(slice) => slice.value += weight,
        None => slices.push(AllocationSlice {
            name: name.to_string(),
            value: weight,
        }),
    }
}

/// Groups holding weights by country, currency, sector and market cap.
///
/// Slices appear in first-seen order. Symbols missing from the catalog fall
/// into the `Other` sector and the `Unknown` market cap.
pub fn allocation(holdings: &[Holding], catalog: &StockCatalog) -> Allocation {
    let mut out = Allocation::default();
    for holding in holdings {
        add_weight(&mut out.by_country, &holding.country.to_string(), holding.weight);
        add_weight(&mut out.by_currency, holding.currency.code(), holding.weight);
        add_weight(&mut out.by_sector, catalog.sector_of(&holding.stock_symbol), holding.weight);
        add_weight(
            &mut out.by_market_cap,
            catalog.market_cap_of(&holding.stock_symbol),
            holding.weight,
        );
    }
    out
}

/// Orders investments newest purchase first, keeping insertion order for same-day buys.
pub fn newest_first(investments: &mut [Investment]) {
    investments.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
}
