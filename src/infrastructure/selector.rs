use crate::domain::ports::StockSelector;
use crate::domain::stock::StockQuote;
use rand::Rng;

/// Uniform random pick, unseeded.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl StockSelector for RandomSelector {
    fn select(&self, candidates: &[StockQuote]) -> usize {
        if candidates.len() <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..candidates.len())
    }
}

/// Always picks the same position, clamped to the candidate list.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl StockSelector for FixedSelector {
    fn select(&self, candidates: &[StockQuote]) -> usize {
        self.0.min(candidates.len().saturating_sub(1))
    }
}
