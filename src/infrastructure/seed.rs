use crate::domain::calc::PerformancePoint;
use crate::domain::investment::Investment;
use crate::domain::money::{Balance, Currency};
use crate::domain::ports::{InvestmentStore, SnapshotStore, TransactionStore, UserStore};
use crate::domain::stock::StockCatalog;
use crate::domain::transaction::{PaymentMethod, Transaction};
use crate::domain::user::{DEFAULT_USER_ID, RiskTolerance, User, UserId};
use crate::error::{InvestError, Result};
use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DEMO_USER: UserId = DEFAULT_USER_ID;

fn timestamp(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(hh, mm, 0))
        .ok_or_else(|| InvestError::invalid(format!("bad seed timestamp {y}-{m}-{d}")))
}

pub fn demo_user() -> User {
    let mut user = User::new(DEMO_USER, "John Doe", "john@example.com", Currency::Usd);
    user.phone = Some("+1 (555) 123-4567".to_string());
    user.total_saved = Balance::new(dec!(12.75));
    user.total_invested = Balance::new(dec!(10.00));
    user.upcoming_investment = Balance::new(dec!(2.75));
    user.investment_threshold = dec!(10);
    user.risk_tolerance = RiskTolerance::Moderate;
    user
}

/// Loads the demo saver, two round-ups, three positions (each with its
/// investment transaction) and fifteen days of valuation snapshots.
pub async fn seed_demo(
    users: &dyn UserStore,
    transactions: &dyn TransactionStore,
    investments: &dyn InvestmentStore,
    snapshots: &dyn SnapshotStore,
    catalog: &StockCatalog,
) -> Result<()> {
    users.update(demo_user()).await?;

    transactions
        .append(Transaction::round_up(
            DEMO_USER,
            "Starbucks",
            dec!(2.75),
            dec!(0.25),
            PaymentMethod::ApplePay,
            Currency::Usd,
            None,
            timestamp(2024, 1, 15, 9, 30)?,
        ))
        .await?;
    transactions
        .append(Transaction::round_up(
            DEMO_USER,
            "Amazon",
            dec!(12.10),
            dec!(0.90),
            PaymentMethod::CreditCard,
            Currency::Usd,
            None,
            timestamp(2024, 1, 14, 14, 15)?,
        ))
        .await?;

    let positions = [
        ("AAPL", dec!(0.5), dec!(10.00), dec!(20.00), timestamp(2024, 1, 13, 10, 0)?),
        ("TSLA", dec!(0.3), dec!(7.50), dec!(25.00), timestamp(2024, 1, 12, 15, 30)?),
        ("INFY", dec!(0.2), dec!(8.00), dec!(400.00), timestamp(2024, 1, 11, 9, 15)?),
    ];
    for (symbol, shares, amount, bought_at, at) in positions {
        let quote = catalog
            .get(symbol)
            .ok_or_else(|| InvestError::NotFound(format!("stock {symbol}")))?;
        let mut investment = Investment::open(DEMO_USER, quote, shares, amount, quote.currency, at);
        investment.purchase_price = bought_at;
        investments.append(investment).await?;
        transactions
            .append(Transaction::investment(DEMO_USER, &quote.name, amount, quote.currency, at))
            .await?;
    }

    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .ok_or_else(|| InvestError::invalid("bad seed snapshot date"))?;
    for day in 0..15u64 {
        let point = PerformancePoint {
            date: start + Days::new(day),
            value: dec!(20.00) + dec!(0.25) * Decimal::from(day),
        };
        snapshots.append(DEMO_USER, point).await?;
    }

    log::debug!("seeded demo data for user {DEMO_USER}");
    Ok(())
}
