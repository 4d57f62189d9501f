use super::money::Currency;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    Us,
    In,
    Ca,
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Country::Us => "US",
            Country::In => "IN",
            Country::Ca => "CA",
        })
    }
}

impl std::str::FromStr for Country {
    type Err = crate::error::InvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(Country::Us),
            "IN" => Ok(Country::In),
            "CA" => Ok(Country::Ca),
            other => Err(crate::error::InvestError::invalid(format!(
                "unsupported country '{other}'"
            ))),
        }
    }
}

/// Static quote for one tradable symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub currency: Currency,
    pub country: Country,
    pub sector: String,
    pub market_cap: String,
}

impl StockQuote {
    fn listed(
        symbol: &str,
        name: &str,
        price: Decimal,
        currency: Currency,
        country: Country,
        sector: &str,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            currency,
            country,
            sector: sector.to_string(),
            market_cap: "Large Cap".to_string(),
        }
    }
}

/// Read-only symbol lookup table. Not a live feed.
#[derive(Debug, Clone, Default)]
pub struct StockCatalog {
    quotes: Vec<StockQuote>,
}

impl StockCatalog {
    pub fn new(quotes: Vec<StockQuote>) -> Self {
        Self { quotes }
    }

    /// The demo universe the application ships with.
    pub fn demo() -> Self {
        Self::new(vec![
            StockQuote::listed("AAPL", "Apple Inc.", dec!(20.20), Currency::Usd, Country::Us, "Technology"),
            StockQuote::listed("TSLA", "Tesla Inc.", dec!(24.70), Currency::Usd, Country::Us, "Automotive"),
            StockQuote::listed("INFY", "Infosys Ltd.", dec!(402.00), Currency::Inr, Country::In, "Technology"),
            StockQuote::listed("GOOGL", "Alphabet Inc.", dec!(150.00), Currency::Usd, Country::Us, "Technology"),
            StockQuote::listed("MSFT", "Microsoft Corporation", dec!(380.00), Currency::Usd, Country::Us, "Technology"),
        ])
    }

    pub fn get(&self, symbol: &str) -> Option<&StockQuote> {
        self.quotes
            .iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn all(&self) -> &[StockQuote] {
        &self.quotes
    }

    /// Quotes matching the optional currency and country filters, in catalog order.
    pub fn filter(&self, currency: Option<Currency>, country: Option<Country>) -> Vec<StockQuote> {
        self.quotes
            .iter()
            .filter(|q| currency.is_none_or(|c| q.currency == c))
            .filter(|q| country.is_none_or(|c| q.country == c))
            .cloned()
            .collect()
    }

    pub fn sector_of(&self, symbol: &str) -> &str {
        self.get(symbol).map(|q| q.sector.as_str()).unwrap_or("Other")
    }

    pub fn market_cap_of(&self, symbol: &str) -> &str {
        self.get(symbol)
            .map(|q| q.market_cap.as_str())
            .unwrap_or("Unknown")
    }
}
