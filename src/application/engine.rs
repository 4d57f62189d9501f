use crate::config::EngineConfig;
use crate::domain::ports::{
    InvestmentStoreBox, SnapshotStoreBox, StockSelectorBox, TransactionStoreBox, UserStoreBox,
};
use crate::domain::stock::StockCatalog;
use crate::domain::user::{User, UserId};
use crate::error::{InvestError, Result};
use crate::infrastructure::selector::RandomSelector;
use tokio::sync::Mutex;

/// The storage backends an engine works against.
pub struct Stores {
    pub users: UserStoreBox,
    pub transactions: TransactionStoreBox,
    pub investments: InvestmentStoreBox,
    pub snapshots: SnapshotStoreBox,
}

/// Entry point for every savings, investing and reporting operation.
///
/// `SavingsEngine` owns the storage backends and composes them with the
/// calculation engine. Operations that read a record, change it and write it
/// back hold `writes` for the whole sequence, so concurrent callers cannot
/// interleave balance updates.
pub struct SavingsEngine {
    pub(crate) users: UserStoreBox,
    pub(crate) transactions: TransactionStoreBox,
    pub(crate) investments: InvestmentStoreBox,
    pub(crate) snapshots: SnapshotStoreBox,
    pub(crate) catalog: StockCatalog,
    pub(crate) selector: StockSelectorBox,
    pub(crate) config: EngineConfig,
    pub(crate) writes: Mutex<()>,
}

impl SavingsEngine {
    /// Creates an engine with the default configuration and a random stock selector.
    ///
    /// # Arguments
    ///
    /// * `stores` - The user, transaction, investment and snapshot backends.
    /// * `catalog` - The stock universe purchases are priced against.
    pub fn new(stores: Stores, catalog: StockCatalog) -> Self {
        Self {
            users: stores.users,
            transactions: stores.transactions,
            investments: stores.investments,
            snapshots: stores.snapshots,
            catalog,
            selector: Box::new(RandomSelector),
            config: EngineConfig::default(),
            writes: Mutex::new(()),
        }
    }

    pub fn with_selector(mut self, selector: StockSelectorBox) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &StockCatalog {
        &self.catalog
    }

    pub(crate) async fn require_user(&self, id: UserId) -> Result<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| InvestError::NotFound(format!("user {id}")))
    }

    /// Consumes the engine and returns the final state of all users.
    pub async fn into_users(self) -> Result<Vec<User>> {
        self.users.all().await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::infrastructure::in_memory::{
        InMemoryInvestmentStore, InMemorySnapshotStore, InMemoryTransactionStore, InMemoryUserStore,
    };
    use crate::infrastructure::seed::seed_demo;
    use crate::infrastructure::selector::FixedSelector;
    use chrono::{NaiveDate, NaiveDateTime};

    pub fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 16)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    pub fn empty_engine() -> SavingsEngine {
        SavingsEngine::new(
            Stores {
                users: Box::new(InMemoryUserStore::new()),
                transactions: Box::new(InMemoryTransactionStore::new()),
                investments: Box::new(InMemoryInvestmentStore::new()),
                snapshots: Box::new(InMemorySnapshotStore::new()),
            },
            StockCatalog::demo(),
        )
        .with_selector(Box::new(FixedSelector(0)))
    }

    /// Engine over the demo data set, picking the first eligible stock on auto-invest.
    pub async fn demo_engine() -> SavingsEngine {
        let users = InMemoryUserStore::new();
        let transactions = InMemoryTransactionStore::new();
        let investments = InMemoryInvestmentStore::new();
        let snapshots = InMemorySnapshotStore::new();
        let catalog = StockCatalog::demo();
        seed_demo(&users, &transactions, &investments, &snapshots, &catalog)
            .await
            .unwrap();

        SavingsEngine::new(
            Stores {
                users: Box::new(users),
                transactions: Box::new(transactions),
                investments: Box::new(investments),
                snapshots: Box::new(snapshots),
            },
            catalog,
        )
        .with_selector(Box::new(FixedSelector(0)))
    }
}
