use super::engine::SavingsEngine;
use crate::domain::calc::{self, SaleOutcome};
use crate::domain::investment::{Investment, InvestmentId, InvestmentStatus};
use crate::domain::money::{Balance, Currency, round_money};
use crate::domain::stock::{Country, StockQuote};
use crate::domain::transaction::Transaction;
use crate::domain::user::{DEFAULT_USER_ID, User, UserId};
use crate::error::{InvestError, Result};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_user() -> UserId {
    DEFAULT_USER_ID
}

fn default_currency() -> Currency {
    Currency::Usd
}

/// Buys fractional shares of one stock out of the user's pending savings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[serde(default = "default_user")]
    pub user_id: UserId,
    pub stock_symbol: String,
    /// Amount taken from the savings pot, in `currency`.
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentReceipt {
    pub investment: Investment,
    pub shares: Decimal,
    pub total_invested: Decimal,
    pub upcoming_investment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub investment: Investment,
    #[serde(flatten)]
    pub outcome: SaleOutcome,
}

impl SavingsEngine {
    /// Invests `request.amount` of the user's pending savings in one stock.
    ///
    /// Indian stocks bought in another currency are paid for in rupees: the
    /// amount is converted first and the position is recorded in INR. The
    /// user's balances always move by the unconverted amount.
    pub async fn purchase(&self, request: PurchaseRequest, at: NaiveDateTime) -> Result<InvestmentReceipt> {
        let amount = request.amount;
        if amount < self.config.min_purchase || amount > self.config.max_purchase {
            warn!("rejected purchase of {amount} for user {}", request.user_id);
            return Err(InvestError::invalid(format!(
                "investment amount must be between {} and {}",
                self.config.min_purchase, self.config.max_purchase
            )));
        }
        let quote = self
            .catalog
            .get(&request.stock_symbol)
            .ok_or_else(|| InvestError::NotFound(format!("stock {}", request.stock_symbol)))?
            .clone();

        let _guard = self.writes.lock().await;
        let user = self.require_user(request.user_id).await?;

        let (paid, paid_currency) = if quote.country == Country::In && request.currency != Currency::Inr {
            (calc::convert(amount, request.currency, Currency::Inr)?, Currency::Inr)
        } else {
            (amount, request.currency)
        };
        debug!(
            "purchase {}: {amount} {} paid as {paid} {paid_currency}",
            quote.symbol, request.currency
        );

        self.open_position(user, &quote, amount, request.currency, paid, paid_currency, at)
            .await
    }

    /// Invests the threshold amount in a stock picked by the engine's selector.
    ///
    /// USD savers are offered US stocks and INR savers Indian stocks; other
    /// currencies have nothing eligible.
    pub async fn auto_invest(&self, user_id: UserId, at: NaiveDateTime) -> Result<InvestmentReceipt> {
        let _guard = self.writes.lock().await;
        let user = self.require_user(user_id).await?;

        let upcoming = user.upcoming_investment.value();
        if upcoming < user.investment_threshold {
            return Err(InvestError::InsufficientFunds(format!(
                "{upcoming} saved, auto-invest needs {}",
                user.investment_threshold
            )));
        }

        let country = match user.currency {
            Currency::Usd => Some(Country::Us),
            Currency::Inr => Some(Country::In),
            Currency::Cad => None,
        };
        let eligible: Vec<StockQuote> = country
            .map(|c| self.catalog.filter(None, Some(c)))
            .unwrap_or_default();
        if eligible.is_empty() {
            return Err(InvestError::invalid(format!(
                "no stocks available for {} savers",
                user.currency
            )));
        }
        let index = self.selector.select(&eligible);
        let quote = eligible
            .get(index)
            .ok_or_else(|| InvestError::invalid(format!("selector picked stock {index} of {}", eligible.len())))?
            .clone();

        let amount = upcoming.min(user.investment_threshold);
        info!("auto-investing {amount} for user {user_id} in {}", quote.symbol);
        self.open_position(user, &quote, amount, quote.currency, amount, quote.currency, at)
            .await
    }

    /// Records a position bought for `paid` and moves `amount` out of the
    /// user's pending savings. Callers hold `writes`.
    #[allow(clippy::too_many_arguments)]
    async fn open_position(
        &self,
        mut user: User,
        quote: &StockQuote,
        amount: Decimal,
        currency: Currency,
        paid: Decimal,
        paid_currency: Currency,
        at: NaiveDateTime,
    ) -> Result<InvestmentReceipt> {
        user.debit_for_investment(Balance::new(amount), at)?;
        let shares = calc::shares_for(paid, quote.price)?;

        let investment = self
            .investments
            .append(Investment::open(
                user.id,
                quote,
                shares,
                round_money(paid),
                paid_currency,
                at,
            ))
            .await?;
        self.transactions
            .append(Transaction::investment(user.id, &quote.name, amount, currency, at))
            .await?;

        let total_invested = user.total_invested.value();
        let upcoming_investment = user.upcoming_investment.value();
        self.users.update(user).await?;

        info!(
            "investment {}: {shares} {} for {paid} {paid_currency}",
            investment.id, quote.symbol
        );
        Ok(InvestmentReceipt {
            investment,
            shares,
            total_invested,
            upcoming_investment,
        })
    }

    /// Sells `shares` of a position at `price`. A position sold down to zero
    /// shares is marked sold; proceeds are not credited back to the user.
    pub async fn sell(
        &self,
        id: InvestmentId,
        shares: Decimal,
        price: Decimal,
        at: NaiveDateTime,
    ) -> Result<SaleReceipt> {
        let _guard = self.writes.lock().await;
        let mut investment = self.investment(id).await?;
        let outcome = calc::sell(&investment, shares, price)?;

        investment.shares = outcome.remaining_shares;
        investment.updated_at = at;
        if outcome.sold_out {
            investment.status = InvestmentStatus::Sold;
        }
        if !self.investments.update(investment.clone()).await? {
            return Err(InvestError::NotFound(format!("investment {id}")));
        }

        info!(
            "investment {id}: sold {shares} at {price}, gain/loss {}",
            outcome.gain_loss
        );
        Ok(SaleReceipt { investment, outcome })
    }

    pub async fn investment(&self, id: InvestmentId) -> Result<Investment> {
        self.investments
            .find_by_id(id)
            .await?
            .ok_or_else(|| InvestError::NotFound(format!("investment {id}")))
    }
}
