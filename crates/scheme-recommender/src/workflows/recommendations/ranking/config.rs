use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weights for the relevance score. `Default` is the production rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub max_results: usize,
    /// Benefit amount at which the benefit component saturates.
    pub benefit_reference_amount: Decimal,
    pub benefit_weight: f64,
    pub home_state_bonus: f64,
    pub central_scheme_bonus: f64,
    pub category_bonus: f64,
    pub income_ratio_multiplier: f64,
    pub income_ratio_cap: f64,
    pub recency_bonus: f64,
    pub score_ceiling: f64,
}

impl RankingConfig {
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            benefit_reference_amount: Decimal::from(100_000),
            benefit_weight: 30.0,
            home_state_bonus: 25.0,
            central_scheme_bonus: 20.0,
            category_bonus: 20.0,
            income_ratio_multiplier: 10.0,
            income_ratio_cap: 15.0,
            recency_bonus: 10.0,
            score_ceiling: 100.0,
        }
    }
}
