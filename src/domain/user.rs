use super::money::{Balance, Currency};
use crate::error::InvestError;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type UserId = u32;

/// User assumed when a request names none.
pub const DEFAULT_USER_ID: UserId = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl std::str::FromStr for RiskTolerance {
    type Err = InvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            other => Err(InvestError::invalid(format!(
                "unknown risk tolerance '{other}'"
            ))),
        }
    }
}

/// A saver and their running balances.
///
/// `total_saved` and `upcoming_investment` grow with every round-up;
/// investing moves money from `upcoming_investment` into `total_invested`.
/// Balances are overwritten in place, no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Home currency of all three balances.
    pub currency: Currency,
    pub total_saved: Balance,
    pub total_invested: Balance,
    /// Savings not yet invested.
    pub upcoming_investment: Balance,
    /// Amount of savings that triggers an automatic investment.
    pub investment_threshold: Decimal,
    pub round_up_enabled: bool,
    pub auto_invest: bool,
    pub risk_tolerance: RiskTolerance,
    pub updated_at: Option<NaiveDateTime>,
}

impl User {
    pub fn new(id: UserId, name: &str, email: &str, currency: Currency) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            currency,
            total_saved: Balance::ZERO,
            total_invested: Balance::ZERO,
            upcoming_investment: Balance::ZERO,
            investment_threshold: Decimal::TEN,
            round_up_enabled: true,
            auto_invest: true,
            risk_tolerance: RiskTolerance::default(),
            updated_at: None,
        }
    }

    /// Credits a round-up to both the saved total and the pending investment pot.
    pub fn credit_savings(&mut self, saved: Balance, at: NaiveDateTime) {
        self.total_saved += saved;
        self.upcoming_investment += saved;
        self.updated_at = Some(at);
    }

    /// Moves `amount` from the pending pot into the invested total if it is covered.
    pub fn debit_for_investment(
        &mut self,
        amount: Balance,
        at: NaiveDateTime,
    ) -> Result<(), InvestError> {
        if self.upcoming_investment >= amount {
            self.upcoming_investment -= amount;
            self.total_invested += amount;
            self.updated_at = Some(at);
            Ok(())
        } else {
            Err(InvestError::InsufficientFunds(format!(
                "{} saved, {} requested",
                self.upcoming_investment.value(),
                amount.value()
            )))
        }
    }
}

/// Partial profile and preference update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub round_up_enabled: Option<bool>,
    pub auto_invest: Option<bool>,
    pub investment_threshold: Option<Decimal>,
    pub risk_tolerance: Option<RiskTolerance>,
    pub currency: Option<Currency>,
}

const PHONE_PATTERN: &str = r"^\+?[\d\s\-()]+$";

impl PreferencesUpdate {
    /// Checks the contact fields: a name of at least two characters once
    /// trimmed, and a phone made of digits, spaces, dashes and parentheses
    /// with an optional leading `+`.
    pub fn validate(&self) -> Result<(), InvestError> {
        if self.name.as_deref().is_some_and(|n| n.trim().chars().count() < 2) {
            return Err(InvestError::invalid("name must be at least 2 characters long"));
        }
        if let Some(phone) = self.phone.as_deref() {
            let pattern = regex::Regex::new(PHONE_PATTERN)
                .map_err(|e| InvestError::invalid(format!("phone pattern: {e}")))?;
            if !pattern.is_match(phone) {
                return Err(InvestError::invalid(format!("invalid phone number '{phone}'")));
            }
        }
        Ok(())
    }

    pub fn apply(&self, user: &mut User, at: NaiveDateTime) {
        if let Some(v) = &self.name {
            user.name = v.trim().to_string();
        }
        if let Some(v) = &self.phone {
            user.phone = Some(v.clone());
        }
        if let Some(v) = self.round_up_enabled {
            user.round_up_enabled = v;
        }
        if let Some(v) = self.auto_invest {
            user.auto_invest = v;
        }
        if let Some(v) = self.investment_threshold {
            user.investment_threshold = v;
        }
        if let Some(v) = self.risk_tolerance {
            user.risk_tolerance = v;
        }
        if let Some(v) = self.currency {
            user.currency = v;
        }
        user.updated_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_credit_savings() {
        let mut user = User::new(1, "Jo", "jo@example.com", Currency::Usd);
        user.credit_savings(Balance::new(dec!(0.25)), at());
        assert_eq!(user.total_saved, Balance::new(dec!(0.25)));
        assert_eq!(user.upcoming_investment, Balance::new(dec!(0.25)));
        assert_eq!(user.updated_at, Some(at()));
    }

    #[test]
    fn test_debit_for_investment_success() {
        let mut user = User::new(1, "Jo", "jo@example.com", Currency::Usd);
        user.upcoming_investment = Balance::new(dec!(12.0));

        assert!(user.debit_for_investment(Balance::new(dec!(10.0)), at()).is_ok());
        assert_eq!(user.upcoming_investment, Balance::new(dec!(2.0)));
        assert_eq!(user.total_invested, Balance::new(dec!(10.0)));
    }

    #[test]
    fn test_debit_for_investment_insufficient() {
        let mut user = User::new(1, "Jo", "jo@example.com", Currency::Usd);
        user.upcoming_investment = Balance::new(dec!(2.75));

        let result = user.debit_for_investment(Balance::new(dec!(5.0)), at());
        assert!(matches!(result, Err(InvestError::InsufficientFunds(_))));
        assert_eq!(user.upcoming_investment, Balance::new(dec!(2.75)));
        assert_eq!(user.total_invested, Balance::ZERO);
    }

    #[test]
    fn test_preferences_apply_only_given_fields() {
        let mut user = User::new(1, "Jo", "jo@example.com", Currency::Usd);
        let update = PreferencesUpdate {
            auto_invest: Some(false),
            investment_threshold: Some(dec!(25)),
            ..Default::default()
        };
        update.apply(&mut user, at());

        assert!(!user.auto_invest);
        assert!(user.round_up_enabled);
        assert_eq!(user.investment_threshold, dec!(25));
        assert_eq!(user.risk_tolerance, RiskTolerance::Moderate);
        assert_eq!(user.name, "Jo");
    }

    #[test]
    fn test_contact_fields_validation() {
        let update = PreferencesUpdate {
            name: Some("  Jane Roe ".to_string()),
            phone: Some("+1 (555) 123-4567".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let mut user = User::new(1, "Jo", "jo@example.com", Currency::Usd);
        update.apply(&mut user, at());
        assert_eq!(user.name, "Jane Roe");
        assert_eq!(user.phone.as_deref(), Some("+1 (555) 123-4567"));

        for (name, phone) in [(Some(" J "), None), (None, Some("555-CALL")), (None, Some("+"))] {
            let update = PreferencesUpdate {
                name: name.map(str::to_string),
                phone: phone.map(str::to_string),
                ..Default::default()
            };
            assert!(matches!(update.validate(), Err(InvestError::InvalidInput(_))));
        }
    }
}
