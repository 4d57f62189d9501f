use crate::domain::calc::PerformancePoint;
use crate::domain::investment::{Investment, InvestmentId};
use crate::domain::ports::{InvestmentStore, SnapshotStore, TransactionStore, UserStore};
use crate::domain::transaction::{Transaction, TransactionId};
use crate::domain::user::{User, UserId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Rows in insertion order plus the next id to hand out.
///
/// Ids start at 1 and are never reused, even after a removal.
#[derive(Debug)]
struct Table<T> {
    next_id: u64,
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// A thread-safe in-memory store for users.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn update(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }
}

/// A thread-safe in-memory store for round-up and investment transactions.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    table: Arc<RwLock<Table<Transaction>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn append(&self, mut tx: Transaction) -> Result<Transaction> {
        let mut table = self.table.write().await;
        tx.id = table.allocate_id();
        table.rows.push(tx.clone());
        Ok(tx)
    }

    async fn update(&self, tx: Transaction) -> Result<bool> {
        let mut table = self.table.write().await;
        match table.rows.iter_mut().find(|t| t.id == tx.id) {
            Some(slot) => {
                *slot = tx;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let mut table = self.table.write().await;
        let position = table.rows.iter().position(|t| t.id == id);
        Ok(position.map(|index| table.rows.remove(index)))
    }
}

/// A thread-safe in-memory store for share purchases.
#[derive(Default, Clone)]
pub struct InMemoryInvestmentStore {
    table: Arc<RwLock<Table<Investment>>>,
}

impl InMemoryInvestmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvestmentStore for InMemoryInvestmentStore {
    async fn find_by_id(&self, id: InvestmentId) -> Result<Option<Investment>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Investment>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn append(&self, mut investment: Investment) -> Result<Investment> {
        let mut table = self.table.write().await;
        investment.id = table.allocate_id();
        table.rows.push(investment.clone());
        Ok(investment)
    }

    async fn update(&self, investment: Investment) -> Result<bool> {
        let mut table = self.table.write().await;
        match table.rows.iter_mut().find(|i| i.id == investment.id) {
            Some(slot) => {
                *slot = investment;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// A thread-safe in-memory store for portfolio valuation snapshots.
#[derive(Default, Clone)]
pub struct InMemorySnapshotStore {
    snapshots: Arc<RwLock<HashMap<UserId, Vec<PerformancePoint>>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<PerformancePoint>> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.get(&user_id).cloned().unwrap_or_default())
    }

    async fn append(&self, user_id: UserId, point: PerformancePoint) -> Result<()> {
        let mut snapshots = self.snapshots.write().await;
        snapshots.entry(user_id).or_default().push(point);
        Ok(())
    }
}
