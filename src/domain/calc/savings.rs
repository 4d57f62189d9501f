use crate::domain::investment::Investment;
use crate::domain::money::{Currency, MONEY_DP, out_of_range, percent_of, round_money, round_shares};
use crate::domain::user::User;
use crate::error::{InvestError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::Serialize;

const USD_TO_INR: Decimal = dec!(83.0);
const CAD_TO_INR: Decimal = dec!(61.0);
const USD_TO_CAD: Decimal = dec!(1.35);

/// Spare change needed to lift `amount` to the next whole unit, in cents.
///
/// Whole amounts need no change: `round_up(5.00) == 0.00`. Amounts must be
/// whole cents, so the result always stays below one unit.
pub fn round_up(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(InvestError::invalid(format!(
            "purchase amount must be positive, got {amount}"
        )));
    }
    if amount.normalize().scale() > MONEY_DP {
        return Err(InvestError::invalid(format!(
            "purchase amount must be in whole cents, got {amount}"
        )));
    }
    Ok(round_money(amount.ceil() - amount))
}

/// Fractional shares bought by `amount` at `price`, to 4 decimal places.
pub fn shares_for(amount: Decimal, price: Decimal) -> Result<Decimal> {
    if price <= Decimal::ZERO {
        return Err(InvestError::invalid(format!(
            "price per share must be positive, got {price}"
        )));
    }
    if amount <= Decimal::ZERO {
        return Err(InvestError::invalid(format!(
            "investment amount must be positive, got {amount}"
        )));
    }
    let shares = amount
        .checked_div(price)
        .ok_or_else(|| out_of_range(format!("{amount} / {price} shares")))?;
    Ok(round_shares(shares))
}

/// Converts with the fixed demo rate table.
///
/// Only USD→INR, CAD→INR and USD→CAD are listed. Every other pair, reverse
/// directions included, returns `amount` unchanged. This is a known gap in
/// the rate table, kept as is.
pub fn convert(amount: Decimal, from: Currency, to: Currency) -> Result<Decimal> {
    let rate = match (from, to) {
        (Currency::Usd, Currency::Inr) => USD_TO_INR,
        (Currency::Cad, Currency::Inr) => CAD_TO_INR,
        (Currency::Usd, Currency::Cad) => USD_TO_CAD,
        _ => return Ok(amount),
    };
    amount
        .checked_mul(rate)
        .ok_or_else(|| out_of_range(format!("{amount} {from} in {to}")))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOutcome {
    pub sale_amount: Decimal,
    pub gain_loss: Decimal,
    pub remaining_shares: Decimal,
    /// True when the position is closed by this sale.
    pub sold_out: bool,
}

/// Prices a sale of `shares` at `price` against the position's cost.
pub fn sell(investment: &Investment, shares: Decimal, price: Decimal) -> Result<SaleOutcome> {
    if shares <= Decimal::ZERO {
        return Err(InvestError::invalid(format!(
            "shares to sell must be positive, got {shares}"
        )));
    }
    if price <= Decimal::ZERO {
        return Err(InvestError::invalid(format!(
            "sell price must be positive, got {price}"
        )));
    }
    if shares > investment.shares {
        return Err(InvestError::invalid(format!(
            "cannot sell {shares} shares, only {} owned",
            investment.shares
        )));
    }

    let sale_amount = shares
        .checked_mul(price)
        .ok_or_else(|| out_of_range(format!("{shares} shares at {price}")))?;
    let gain_loss = shares
        .checked_mul(investment.purchase_price)
        .and_then(|cost| sale_amount.checked_sub(cost))
        .ok_or_else(|| out_of_range(format!("gain on {shares} shares at {price}")))?;
    let remaining_shares = investment.shares - shares;

    Ok(SaleOutcome {
        sale_amount: round_money(sale_amount),
        gain_loss: round_money(gain_loss),
        remaining_shares,
        sold_out: remaining_shares.is_zero(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_saved: Decimal,
    pub total_invested: Decimal,
    pub upcoming_investment: Decimal,
    pub savings_rate: Decimal,
    pub investment_progress: Decimal,
    pub days_to_next_investment: u32,
    pub currency: Currency,
}

/// Savings dashboard figures. `daily_savings` is the assumed spare change per day.
pub fn user_stats(user: &User, daily_savings: Decimal) -> Result<UserStats> {
    if daily_savings <= Decimal::ZERO {
        return Err(InvestError::invalid(format!(
            "daily savings estimate must be positive, got {daily_savings}"
        )));
    }
    let saved = user.total_saved.value();
    let invested = user.total_invested.value();
    let upcoming = user.upcoming_investment.value();
    let threshold = user.investment_threshold;

    let savings_rate = if saved > Decimal::ZERO {
        percent_of(saved, saved + invested, 1)?
    } else {
        Decimal::ZERO
    };
    let investment_progress = if threshold > Decimal::ZERO {
        percent_of(upcoming, threshold, 1)?
    } else {
        Decimal::ZERO
    };
    let days_to_next_investment = if upcoming >= threshold {
        0
    } else {
        ((threshold - upcoming) / daily_savings)
            .ceil()
            .to_u32()
            .unwrap_or(u32::MAX)
    };

    Ok(UserStats {
        total_saved: round_money(saved),
        total_invested: round_money(invested),
        upcoming_investment: round_money(upcoming),
        savings_rate,
        investment_progress,
        days_to_next_investment,
        currency: user.currency,
    })
}
