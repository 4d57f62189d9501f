use super::engine::SavingsEngine;
use crate::domain::calc::{
    self, Allocation, HoldingSortKey, HoldingsReport, Milestone, PerformanceMetrics, PerformancePoint, Period,
    PortfolioSummary, ProjectionPoint, SortOrder,
};
use crate::domain::investment::{Investment, InvestmentStatus};
use crate::domain::user::UserId;
use crate::error::{InvestError, Result};
use log::debug;
use serde::Serialize;

/// Longest projection horizon accepted, in years.
pub const MAX_PROJECTION_YEARS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioView {
    pub investments: Vec<Investment>,
    pub summary: PortfolioSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub period: Period,
    pub points: Vec<PerformancePoint>,
    pub metrics: PerformanceMetrics,
}

/// Human readable inputs of a projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    pub annual_return: String,
    pub monthly_return: String,
    pub current_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionReport {
    pub projections: Vec<ProjectionPoint>,
    pub milestones: Vec<Milestone>,
    pub assumptions: Assumptions,
}

impl SavingsEngine {
    async fn active_positions(&self, user_id: UserId) -> Result<Vec<Investment>> {
        Ok(self
            .investments
            .find_by_user(user_id)
            .await?
            .into_iter()
            .filter(|i| i.status == InvestmentStatus::Active)
            .collect())
    }

    /// A user's positions, newest purchase first, with their summary.
    ///
    /// `status` of `None` lists active and sold positions alike.
    pub async fn portfolio(&self, user_id: UserId, status: Option<InvestmentStatus>) -> Result<PortfolioView> {
        let mut investments: Vec<Investment> = self
            .investments
            .find_by_user(user_id)
            .await?
            .into_iter()
            .filter(|i| status.is_none_or(|s| i.status == s))
            .collect();
        calc::portfolio::newest_first(&mut investments);
        let summary = calc::summarize(&investments)?;
        Ok(PortfolioView { investments, summary })
    }

    pub async fn holdings(&self, user_id: UserId, sort_by: HoldingSortKey, order: SortOrder) -> Result<HoldingsReport> {
        let positions = self.active_positions(user_id).await?;
        calc::holdings(&positions, sort_by, order)
    }

    pub async fn allocation(&self, user_id: UserId) -> Result<Allocation> {
        let positions = self.active_positions(user_id).await?;
        let report = calc::holdings(&positions, HoldingSortKey::default(), SortOrder::default())?;
        Ok(calc::allocation(&report.holdings, &self.catalog))
    }

    /// Change and volatility over the trailing `period` of valuation snapshots.
    pub async fn performance(&self, user_id: UserId, period: Period) -> Result<PerformanceReport> {
        let series = self.snapshots.find_by_user(user_id).await?;
        if series.is_empty() {
            return Err(InvestError::NotFound(format!("performance history for user {user_id}")));
        }
        let points = period.trailing(&series).to_vec();
        let metrics = calc::performance(&points)?;
        debug!(
            "performance for user {user_id} over {} points: volatility {}",
            points.len(),
            metrics.volatility
        );
        Ok(PerformanceReport { period, points, metrics })
    }

    /// Compounds the current value of the active portfolio over `years`.
    ///
    /// `annual_rate` falls back to the configured return assumption.
    pub async fn projections(&self, user_id: UserId, years: u32, annual_rate: Option<f64>) -> Result<ProjectionReport> {
        if years == 0 || years > MAX_PROJECTION_YEARS {
            return Err(InvestError::invalid(format!(
                "projection horizon must be between 1 and {MAX_PROJECTION_YEARS} years"
            )));
        }
        self.require_user(user_id).await?;

        let annual = annual_rate.unwrap_or(self.config.annual_return);
        let monthly = calc::monthly_rate(annual)?;
        let current_value = calc::summarize(&self.active_positions(user_id).await?)?.total_value;

        let projections = calc::project(current_value, annual, years * 12)?;
        let milestones = self
            .config
            .milestone_targets
            .iter()
            .map(|target| calc::milestone(*target, current_value, monthly))
            .collect::<Result<Vec<_>>>()?;

        Ok(ProjectionReport {
            projections,
            milestones,
            assumptions: Assumptions {
                annual_return: format!("{:.1}%", annual * 100.0),
                monthly_return: format!("{:.2}%", monthly * 100.0),
                current_value: format!("${current_value:.2}"),
            },
        })
    }
}
