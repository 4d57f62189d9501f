use super::calc::PerformancePoint;
use super::investment::{Investment, InvestmentId};
use super::stock::StockQuote;
use super::transaction::{Transaction, TransactionId};
use super::user::{User, UserId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;
    /// Inserts or replaces the user with the same id.
    async fn update(&self, user: User) -> Result<()>;
    async fn all(&self) -> Result<Vec<User>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>>;
    /// All transactions of a user, in insertion order.
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>>;
    /// Stores a new transaction under a freshly assigned id and returns it.
    async fn append(&self, tx: Transaction) -> Result<Transaction>;
    /// Replaces an existing transaction. Returns `false` if the id is unknown.
    async fn update(&self, tx: Transaction) -> Result<bool>;
    async fn remove(&self, id: TransactionId) -> Result<Option<Transaction>>;
}

#[async_trait]
pub trait InvestmentStore: Send + Sync {
    async fn find_by_id(&self, id: InvestmentId) -> Result<Option<Investment>>;
    /// All investments of a user, in insertion order.
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Investment>>;
    /// Stores a new investment under a freshly assigned id and returns it.
    async fn append(&self, investment: Investment) -> Result<Investment>;
    /// Replaces an existing investment. Returns `false` if the id is unknown.
    async fn update(&self, investment: Investment) -> Result<bool>;
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Valuation snapshots of a user, oldest first.
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<PerformancePoint>>;
    async fn append(&self, user_id: UserId, point: PerformancePoint) -> Result<()>;
}

/// Picks the stock an automatic investment goes into.
pub trait StockSelector: Send + Sync {
    /// Index into `candidates`, which is never empty.
    fn select(&self, candidates: &[StockQuote]) -> usize;
}

pub type UserStoreBox = Box<dyn UserStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type InvestmentStoreBox = Box<dyn InvestmentStore>;
pub type SnapshotStoreBox = Box<dyn SnapshotStore>;
pub type StockSelectorBox = Box<dyn StockSelector>;
