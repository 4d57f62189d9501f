use super::engine::SavingsEngine;
use crate::domain::calc::{self, UserStats};
use crate::domain::money::Currency;
use crate::domain::stock::{Country, StockQuote};
use crate::domain::user::{PreferencesUpdate, User, UserId};
use crate::error::{InvestError, Result};
use chrono::NaiveDateTime;
use log::{info, warn};

impl SavingsEngine {
    pub async fn profile(&self, user_id: UserId) -> Result<User> {
        self.require_user(user_id).await
    }

    /// Applies the given profile and preference fields. An invalid name or
    /// phone, or a threshold outside the configured bounds, rejects the
    /// whole update.
    pub async fn update_preferences(
        &self,
        user_id: UserId,
        update: PreferencesUpdate,
        at: NaiveDateTime,
    ) -> Result<User> {
        update.validate()?;
        let (min, max) = (self.config.min_threshold, self.config.max_threshold);
        if let Some(threshold) = update.investment_threshold.filter(|t| *t < min || *t > max) {
            warn!("rejected investment threshold {threshold} for user {user_id}");
            return Err(InvestError::invalid(format!(
                "investment threshold must be between {min} and {max}"
            )));
        }

        let _guard = self.writes.lock().await;
        let mut user = self.require_user(user_id).await?;
        update.apply(&mut user, at);
        self.users.update(user.clone()).await?;
        info!("preferences updated for user {user_id}");
        Ok(user)
    }

    pub async fn stats(&self, user_id: UserId) -> Result<UserStats> {
        let user = self.require_user(user_id).await?;
        calc::user_stats(&user, self.config.daily_savings)
    }

    /// Catalog entries matching both filters; `None` matches anything.
    pub fn available_stocks(&self, currency: Option<Currency>, country: Option<Country>) -> Vec<StockQuote> {
        self.catalog.filter(currency, country)
    }
}
