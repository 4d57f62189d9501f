use crate::error::{InvestError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tunables of the savings engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Annual return assumed by projections, as a fraction (0.08 = 8%).
    pub annual_return: f64,
    /// Spare change assumed per day when estimating the next investment.
    pub daily_savings: Decimal,
    pub min_purchase: Decimal,
    pub max_purchase: Decimal,
    pub min_threshold: Decimal,
    pub max_threshold: Decimal,
    /// Smallest purchase the round-up endpoint accepts.
    pub min_round_up_purchase: Decimal,
    pub milestone_targets: Vec<Decimal>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            annual_return: 0.08,
            daily_savings: dec!(0.25),
            min_purchase: dec!(5),
            max_purchase: dec!(1000),
            min_threshold: dec!(5),
            max_threshold: dec!(100),
            min_round_up_purchase: dec!(0.01),
            milestone_targets: vec![dec!(50), dec!(100), dec!(250), dec!(500), dec!(1000)],
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.annual_return.is_finite() || self.annual_return <= -1.0 {
            return Err(InvestError::invalid(format!(
                "annual return {} must be greater than -1",
                self.annual_return
            )));
        }
        if self.daily_savings <= Decimal::ZERO {
            return Err(InvestError::invalid("daily savings estimate must be positive"));
        }
        if self.min_purchase > self.max_purchase || self.min_threshold > self.max_threshold {
            return Err(InvestError::invalid("configured bounds are inverted"));
        }
        Ok(())
    }
}
