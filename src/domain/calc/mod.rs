//! The financial calculation engine.
//!
//! Every function here is pure: plain numbers and records in, plain numbers
//! and records out. No storage, no clock, no I/O. Monetary arithmetic stays in
//! `Decimal`; only the transcendental steps (fractional powers, logarithms,
//! square roots) go through `f64` and are rounded on the way back.

pub mod performance;
pub mod portfolio;
pub mod projection;
pub mod savings;

pub use performance::{Period, PerformanceMetrics, PerformancePoint, performance};
pub use portfolio::{
    Allocation, AllocationSlice, Holding, HoldingSortKey, HoldingTotals, HoldingsReport,
    PortfolioSummary, SortOrder, allocation, holdings, summarize,
};
pub use projection::{
    Milestone, ProjectionPoint, milestone, milestone_label, monthly_rate, project,
};
pub use savings::{SaleOutcome, UserStats, convert, round_up, sell, shares_for, user_stats};
