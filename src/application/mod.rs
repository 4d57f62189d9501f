//! Application layer orchestrating stores and calculations.
//!
//! `SavingsEngine` is the single entry point. Its operations are split by
//! concern across the submodules, each adding an `impl SavingsEngine` block.

pub mod engine;
pub mod investing;
pub mod portfolio;
pub mod profile;
pub mod savings;

pub use engine::{SavingsEngine, Stores};
pub use investing::{InvestmentReceipt, PurchaseRequest, SaleReceipt};
pub use portfolio::{Assumptions, PerformanceReport, PortfolioView, ProjectionReport};
pub use savings::{
    RoundUpReceipt, RoundUpRequest, TransactionPage, TransactionQuery, WebhookEvent, WebhookOutcome,
};
