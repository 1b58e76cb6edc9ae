//! Economy-wide aggregate statistics
//!
//! One series per published aggregate, recorded once per tick by the
//! orchestrator after all agents have acted. Collectors read these series;
//! they never mutate agent state.

use crate::finance::TimeSeries;
use serde::{Deserialize, Serialize};

/// Per-tick aggregates across the whole economy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub persons_employed: TimeSeries,
    pub goods_produced: TimeSeries,
    pub goods_sold: TimeSeries,
    pub goods_demanded: TimeSeries,
    pub goods_overstock: TimeSeries,
    pub avg_price: TimeSeries,
    pub min_price: TimeSeries,
    pub max_price: TimeSeries,
    pub corporate_funds: TimeSeries,
    pub household_funds: TimeSeries,
    pub total_revenue: TimeSeries,
    pub avg_costs: TimeSeries,
    pub avg_profit: TimeSeries,
    pub outstanding_loan_principal: TimeSeries,
    pub avg_salary: TimeSeries,
}

impl SimStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export all aggregate series as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
