use crate::application::savings::RoundUpRequest;
use crate::domain::money::{Amount, Currency};
use crate::domain::transaction::PaymentMethod;
use crate::domain::user::{DEFAULT_USER_ID, UserId};
use crate::error::{InvestError, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::io::Read;

/// One card purchase as it appears in a statement export.
///
/// `user`, `currency` and `timestamp` may be left empty or omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PurchaseRecord {
    #[serde(default)]
    pub user: Option<UserId>,
    pub merchant: String,
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

impl PurchaseRecord {
    /// Splits the record into a round-up request and its optional timestamp.
    pub fn into_request(self) -> (RoundUpRequest, Option<NaiveDateTime>) {
        let request = RoundUpRequest {
            user_id: self.user.unwrap_or(DEFAULT_USER_ID),
            merchant: self.merchant,
            amount: self.amount.value(),
            payment_method: self.payment_method,
            currency: self.currency.unwrap_or(Currency::Usd),
        };
        (request, self.timestamp)
    }
}

/// Reads purchases from a CSV source.
///
/// Fields are trimmed and rows may omit trailing optional columns.
pub struct PurchaseReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PurchaseReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes one record per row; a bad row yields an error
    /// without stopping the stream.
    pub fn purchases(self) -> impl Iterator<Item = Result<PurchaseRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(InvestError::from))
    }
}
