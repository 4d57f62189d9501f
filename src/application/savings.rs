use super::engine::SavingsEngine;
use crate::domain::calc;
use crate::domain::money::{Balance, Currency};
use crate::domain::transaction::{PaymentMethod, Transaction, TransactionId, TransactionKind};
use crate::domain::user::{DEFAULT_USER_ID, UserId};
use crate::error::{InvestError, Result};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Webhook event type that carries a settled card purchase.
pub const EVENT_TRANSACTION_COMPLETED: &str = "transaction.completed";

fn default_user() -> UserId {
    DEFAULT_USER_ID
}

fn default_currency() -> Currency {
    Currency::Usd
}

/// A card purchase to round up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundUpRequest {
    #[serde(default = "default_user")]
    pub user_id: UserId,
    pub merchant: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default = "default_currency")]
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundUpReceipt {
    pub transaction: Transaction,
    pub round_up_amount: Decimal,
    /// Zero when the purchase belongs to an unknown user.
    pub total_saved: Decimal,
    pub upcoming_investment: Decimal,
}

/// Payment provider notification, in the provider's snake_case wire format.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEvent {
    pub event_type: String,
    pub transaction_id: Option<String>,
    pub merchant: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub payment_method: Option<PaymentMethod>,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    Recorded(Box<RoundUpReceipt>),
    Ignored(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransactionQuery {
    pub kind: Option<TransactionKind>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            kind: None,
            limit: 50,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_round_ups: Decimal,
    pub total_investments: Decimal,
    pub total_transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
    pub summary: TransactionSummary,
}

impl SavingsEngine {
    /// Records the spare change of a card purchase and credits it to the user.
    ///
    /// The transaction is stored even when the user does not exist; only the
    /// balance update is skipped in that case.
    pub async fn record_round_up(&self, request: RoundUpRequest, at: NaiveDateTime) -> Result<RoundUpReceipt> {
        let merchant = request.merchant.trim();
        if merchant.is_empty() {
            warn!("rejected round-up without merchant for user {}", request.user_id);
            return Err(InvestError::invalid("merchant name is required"));
        }
        if request.amount < self.config.min_round_up_purchase {
            warn!(
                "rejected round-up of {} for user {}",
                request.amount, request.user_id
            );
            return Err(InvestError::invalid(format!(
                "amount must be at least {}",
                self.config.min_round_up_purchase
            )));
        }

        self.apply_round_up(
            request.user_id,
            merchant,
            request.amount,
            request.payment_method,
            request.currency,
            None,
            at,
        )
        .await
    }

    /// Processes a payment provider notification.
    ///
    /// Only `transaction.completed` events produce a round-up; every other
    /// event type is acknowledged and ignored.
    pub async fn handle_webhook(&self, event: WebhookEvent, at: NaiveDateTime) -> Result<WebhookOutcome> {
        if event.event_type != EVENT_TRANSACTION_COMPLETED {
            debug!("ignoring webhook event {}", event.event_type);
            return Ok(WebhookOutcome::Ignored(event.event_type));
        }

        let amount = event
            .amount
            .ok_or_else(|| InvestError::invalid("webhook event has no amount"))?;
        let merchant = event
            .merchant
            .ok_or_else(|| InvestError::invalid("webhook event has no merchant"))?;
        let payment_method = event
            .payment_method
            .ok_or_else(|| InvestError::invalid("webhook event has no payment method"))?;

        let receipt = self
            .apply_round_up(
                event.user_id.unwrap_or(DEFAULT_USER_ID),
                &merchant,
                amount,
                payment_method,
                event.currency.unwrap_or(Currency::Usd),
                event.transaction_id,
                at,
            )
            .await?;
        info!(
            "webhook processed: {} - {} -> saved {}",
            merchant, amount, receipt.round_up_amount
        );
        Ok(WebhookOutcome::Recorded(Box::new(receipt)))
    }

    #[allow(clippy::too_many_arguments)]
    async fn apply_round_up(
        &self,
        user_id: UserId,
        merchant: &str,
        amount: Decimal,
        payment_method: PaymentMethod,
        currency: Currency,
        external_id: Option<String>,
        at: NaiveDateTime,
    ) -> Result<RoundUpReceipt> {
        let saved = calc::round_up(amount)?;

        let _guard = self.writes.lock().await;
        let transaction = self
            .transactions
            .append(Transaction::round_up(
                user_id,
                merchant,
                amount,
                saved,
                payment_method,
                currency,
                external_id,
                at,
            ))
            .await?;

        let (total_saved, upcoming_investment) = match self.users.find_by_id(user_id).await? {
            Some(mut user) => {
                user.credit_savings(Balance::new(saved), at);
                let totals = (user.total_saved.value(), user.upcoming_investment.value());
                self.users.update(user).await?;
                totals
            }
            None => {
                warn!("round-up {} recorded for unknown user {user_id}", transaction.id);
                (Decimal::ZERO, Decimal::ZERO)
            }
        };

        info!(
            "round-up {}: {merchant} {amount} -> saved {saved} for user {user_id}",
            transaction.id
        );
        Ok(RoundUpReceipt {
            transaction,
            round_up_amount: saved,
            total_saved,
            upcoming_investment,
        })
    }

    /// A user's history, newest first, optionally filtered by kind and sliced.
    ///
    /// The summary covers every matching transaction, not just the page.
    pub async fn transactions(&self, user_id: UserId, query: &TransactionQuery) -> Result<TransactionPage> {
        let mut matching: Vec<Transaction> = self
            .transactions
            .find_by_user(user_id)
            .await?
            .into_iter()
            .filter(|t| query.kind.is_none_or(|k| t.kind == k))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len();
        let summary = TransactionSummary {
            total_round_ups: matching
                .iter()
                .filter(|t| t.kind == TransactionKind::RoundUp)
                .map(|t| t.saved)
                .sum(),
            total_investments: matching
                .iter()
                .filter(|t| t.kind == TransactionKind::Investment)
                .map(|t| t.amount)
                .sum(),
            total_transactions: total,
        };

        let page: Vec<Transaction> = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        Ok(TransactionPage {
            transactions: page,
            pagination: Pagination {
                total,
                limit: query.limit,
                offset: query.offset,
                has_more: query.offset.saturating_add(query.limit) < total,
            },
            summary,
        })
    }

    pub async fn transaction(&self, id: TransactionId) -> Result<Transaction> {
        self.transactions
            .find_by_id(id)
            .await?
            .ok_or_else(|| InvestError::NotFound(format!("transaction {id}")))
    }

    /// Overwrites a transaction's status with any non-empty string.
    pub async fn update_transaction_status(
        &self,
        id: TransactionId,
        status: &str,
        at: NaiveDateTime,
    ) -> Result<Transaction> {
        let status = status.trim();
        if status.is_empty() {
            return Err(InvestError::invalid("status is required"));
        }

        let _guard = self.writes.lock().await;
        let mut transaction = self.transaction(id).await?;
        transaction.status = status.to_string();
        transaction.updated_at = at;
        if !self.transactions.update(transaction.clone()).await? {
            return Err(InvestError::NotFound(format!("transaction {id}")));
        }
        info!("transaction {id} status set to {status}");
        Ok(transaction)
    }

    /// Deletes a transaction. Balances it contributed to are left untouched.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<Transaction> {
        let _guard = self.writes.lock().await;
        let removed = self
            .transactions
            .remove(id)
            .await?
            .ok_or_else(|| InvestError::NotFound(format!("transaction {id}")))?;
        info!("transaction {id} deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::engine::test_support::{demo_engine, empty_engine, now};
    use crate::domain::transaction::STATUS_COMPLETED;
    use rust_decimal_macros::dec;

    fn purchase(merchant: &str, amount: Decimal) -> RoundUpRequest {
        RoundUpRequest {
            user_id: 1,
            merchant: merchant.to_string(),
            amount,
            payment_method: PaymentMethod::DebitCard,
            currency: Currency::Usd,
        }
    }

    #[tokio::test]
    async fn test_round_up_credits_user() {
        let engine = demo_engine().await;
        let receipt = engine.record_round_up(purchase("Uber", dec!(8.45)), now()).await.unwrap();

        assert_eq!(receipt.round_up_amount, dec!(0.55));
        assert_eq!(receipt.total_saved, dec!(13.30));
        assert_eq!(receipt.upcoming_investment, dec!(3.30));
        assert_eq!(receipt.transaction.status, STATUS_COMPLETED);
        assert_eq!(receipt.transaction.id, 6);

        let user = engine.require_user(1).await.unwrap();
        assert_eq!(user.total_saved, Balance::new(dec!(13.30)));
    }

    #[tokio::test]
    async fn test_round_up_whole_amount_saves_nothing() {
        let engine = demo_engine().await;
        let receipt = engine.record_round_up(purchase("Cinema", dec!(12)), now()).await.unwrap();
        assert_eq!(receipt.round_up_amount, Decimal::ZERO);
        assert_eq!(receipt.total_saved, dec!(12.75));
    }

    #[tokio::test]
    async fn test_round_up_validation() {
        let engine = demo_engine().await;
        assert!(matches!(
            engine.record_round_up(purchase("  ", dec!(3.10)), now()).await,
            Err(InvestError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.record_round_up(purchase("Shop", dec!(0)), now()).await,
            Err(InvestError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.record_round_up(purchase("Shop", dec!(0.001)), now()).await,
            Err(InvestError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_round_up_rejects_fractional_cents() {
        let engine = demo_engine().await;
        assert!(matches!(
            engine.record_round_up(purchase("Shop", dec!(4.001)), now()).await,
            Err(InvestError::InvalidInput(_))
        ));
        let page = engine.transactions(1, &TransactionQuery::default()).await.unwrap();
        assert!(page.transactions.iter().all(|tx| tx.merchant != "Shop"));
        assert_eq!(engine.profile(1).await.unwrap().total_saved, Balance::new(dec!(12.75)));
    }

    #[tokio::test]
    async fn test_round_up_for_unknown_user_is_still_recorded() {
        let engine = empty_engine();
        let mut request = purchase("Shop", dec!(3.40));
        request.user_id = 42;
        let receipt = engine.record_round_up(request, now()).await.unwrap();

        assert_eq!(receipt.round_up_amount, dec!(0.60));
        assert_eq!(receipt.total_saved, Decimal::ZERO);
        assert_eq!(engine.transaction(receipt.transaction.id).await.unwrap().user_id, 42);
    }

    #[tokio::test]
    async fn test_round_up_request_defaults() {
        let json = r#"{"merchant":"Starbucks","amount":"2.75","paymentMethod":"apple_pay"}"#;
        let request: RoundUpRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.user_id, DEFAULT_USER_ID);
        assert_eq!(request.currency, Currency::Usd);

        let bad = r#"{"merchant":"Starbucks","amount":"2.75","paymentMethod":"cash"}"#;
        assert!(serde_json::from_str::<RoundUpRequest>(bad).is_err());
    }

    #[tokio::test]
    async fn test_webhook_completed_event() {
        let engine = demo_engine().await;
        let event: WebhookEvent = serde_json::from_str(
            r#"{
                "event_type": "transaction.completed",
                "transaction_id": "ext-991",
                "merchant": "Netflix",
                "amount": "15.99",
                "currency": "USD",
                "payment_method": "google_pay"
            }"#,
        )
        .unwrap();

        let outcome = engine.handle_webhook(event, now()).await.unwrap();
        let WebhookOutcome::Recorded(receipt) = outcome else {
            panic!("completed event should be recorded");
        };
        assert_eq!(receipt.round_up_amount, dec!(0.01));
        assert_eq!(receipt.transaction.user_id, DEFAULT_USER_ID);
        assert_eq!(receipt.transaction.external_id.as_deref(), Some("ext-991"));
        assert_eq!(receipt.upcoming_investment, dec!(2.76));
    }

    #[tokio::test]
    async fn test_webhook_other_events_ignored() {
        let engine = demo_engine().await;
        let event = WebhookEvent {
            event_type: "transaction.refunded".to_string(),
            transaction_id: None,
            merchant: None,
            amount: None,
            currency: None,
            payment_method: None,
            user_id: None,
        };
        let outcome = engine.handle_webhook(event, now()).await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Ignored("transaction.refunded".to_string()));
        assert_eq!(engine.transactions(1, &TransactionQuery::default()).await.unwrap().pagination.total, 5);
    }

    #[tokio::test]
    async fn test_transaction_history_newest_first() {
        let engine = demo_engine().await;
        let page = engine.transactions(1, &TransactionQuery::default()).await.unwrap();

        let merchants: Vec<&str> = page.transactions.iter().map(|t| t.merchant.as_str()).collect();
        assert_eq!(
            merchants,
            vec!["Starbucks", "Amazon", "Apple Inc.", "Tesla Inc.", "Infosys Ltd."]
        );
        assert_eq!(page.summary.total_round_ups, dec!(1.15));
        assert_eq!(page.summary.total_investments, dec!(25.50));
        assert_eq!(page.summary.total_transactions, 5);
        assert!(!page.pagination.has_more);
    }

    #[tokio::test]
    async fn test_transaction_history_filter_and_paging() {
        let engine = demo_engine().await;
        let query = TransactionQuery {
            kind: Some(TransactionKind::Investment),
            limit: 2,
            offset: 0,
        };
        let page = engine.transactions(1, &query).await.unwrap();
        assert_eq!(page.transactions.len(), 2);
        assert_eq!(page.pagination.total, 3);
        assert!(page.pagination.has_more);
        assert_eq!(page.summary.total_round_ups, Decimal::ZERO);

        let query = TransactionQuery { offset: 2, ..query };
        let page = engine.transactions(1, &query).await.unwrap();
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.transactions[0].merchant, "Infosys Ltd.");
        assert!(!page.pagination.has_more);
    }

    #[tokio::test]
    async fn test_update_status_and_delete() {
        let engine = demo_engine().await;
        let updated = engine.update_transaction_status(1, "disputed", now()).await.unwrap();
        assert_eq!(updated.status, "disputed");
        assert_eq!(updated.updated_at, now());
        assert_eq!(engine.transaction(1).await.unwrap().status, "disputed");

        let removed = engine.delete_transaction(1).await.unwrap();
        assert_eq!(removed.merchant, "Starbucks");
        assert!(matches!(engine.transaction(1).await, Err(InvestError::NotFound(_))));
        assert!(matches!(engine.delete_transaction(1).await, Err(InvestError::NotFound(_))));
        assert!(matches!(
            engine.update_transaction_status(99, "x", now()).await,
            Err(InvestError::NotFound(_))
        ));
    }
}
