use super::money::Currency;
use super::user::UserId;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type TransactionId = u64;

/// Status given to every transaction on creation. Later updates may set any string.
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[serde(rename = "roundup")]
    RoundUp,
    Investment,
}

impl std::str::FromStr for TransactionKind {
    type Err = crate::error::InvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roundup" => Ok(TransactionKind::RoundUp),
            "investment" => Ok(TransactionKind::Investment),
            other => Err(crate::error::InvestError::invalid(format!(
                "unknown transaction type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    ApplePay,
    GooglePay,
    CreditCard,
    DebitCard,
}

/// One entry of a user's history: a round-up or a share purchase.
///
/// Immutable after creation except for `status`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub merchant: String,
    /// Purchase amount.
    pub amount: Decimal,
    /// Spare change put aside for this purchase.
    pub saved: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub currency: Currency,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    /// Builds a completed round-up record; the store assigns the final id.
    #[allow(clippy::too_many_arguments)]
    pub fn round_up(
        user_id: UserId,
        merchant: &str,
        amount: Decimal,
        saved: Decimal,
        payment_method: PaymentMethod,
        currency: Currency,
        external_id: Option<String>,
        at: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            kind: TransactionKind::RoundUp,
            merchant: merchant.to_string(),
            amount,
            saved,
            payment_method: Some(payment_method),
            currency,
            date: at.date(),
            time: at.time(),
            status: STATUS_COMPLETED.to_string(),
            external_id,
            created_at: at,
            updated_at: at,
        }
    }

    /// Records money leaving the savings pot for `stock_name`. Nothing is saved.
    pub fn investment(
        user_id: UserId,
        stock_name: &str,
        amount: Decimal,
        currency: Currency,
        at: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            kind: TransactionKind::Investment,
            merchant: stock_name.to_string(),
            amount,
            saved: Decimal::ZERO,
            payment_method: None,
            currency,
            date: at.date(),
            time: at.time(),
            status: STATUS_COMPLETED.to_string(),
            external_id: None,
            created_at: at,
            updated_at: at,
        }
    }
}
