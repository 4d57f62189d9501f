use super::money::Currency;
use super::stock::{Country, StockQuote};
use super::user::UserId;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type InvestmentId = u64;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    Active,
    Sold,
}

impl std::str::FromStr for InvestmentStatus {
    type Err = crate::error::InvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(InvestmentStatus::Active),
            "sold" => Ok(InvestmentStatus::Sold),
            other => Err(crate::error::InvestError::invalid(format!(
                "unknown investment status '{other}'"
            ))),
        }
    }
}

/// A fractional share purchase.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: InvestmentId,
    pub user_id: UserId,
    pub stock_symbol: String,
    pub stock_name: String,
    /// Fractional shares, 4 decimal places.
    pub shares: Decimal,
    /// Amount paid, in `currency`.
    pub amount: Decimal,
    pub currency: Currency,
    pub country: Country,
    pub purchase_price: Decimal,
    pub current_price: Decimal,
    pub status: InvestmentStatus,
    pub purchase_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Investment {
    /// Opens an active position at the quote's price; the store assigns the id.
    pub fn open(
        user_id: UserId,
        quote: &StockQuote,
        shares: Decimal,
        amount: Decimal,
        currency: Currency,
        at: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            stock_symbol: quote.symbol.clone(),
            stock_name: quote.name.clone(),
            shares,
            amount,
            currency,
            country: quote.country,
            purchase_price: quote.price,
            current_price: quote.price,
            status: InvestmentStatus::Active,
            purchase_date: at.date(),
            created_at: at,
            updated_at: at,
        }
    }

    pub fn market_value(&self) -> Decimal {
        self.shares * self.current_price
    }

    pub fn cost_basis(&self) -> Decimal {
        self.shares * self.purchase_price
    }

    pub fn gain_loss(&self) -> Decimal {
        self.market_value() - self.cost_basis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::StockCatalog;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_open_position_uses_quote_price() {
        let catalog = StockCatalog::demo();
        let at = NaiveDate::from_ymd_opt(2024, 1, 13)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut inv = Investment::open(
            1,
            catalog.get("AAPL").unwrap(),
            dec!(0.5),
            dec!(10.10),
            Currency::Usd,
            at,
        );
        assert_eq!(inv.status, InvestmentStatus::Active);
        assert_eq!(inv.purchase_price, dec!(20.20));

        inv.current_price = dec!(21.20);
        assert_eq!(inv.market_value(), dec!(10.60));
        assert_eq!(inv.cost_basis(), dec!(10.10));
        assert_eq!(inv.gain_loss(), dec!(0.50));
    }
}
