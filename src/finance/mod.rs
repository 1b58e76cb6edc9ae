//! Corporate finance: time series and the financial-health engine
//!
//! - **series**: per-tick statistic storage (`TimeSeries`, `CorpStats`)
//! - **health**: trend/forecast computation and the finance-action
//!   recommendation, consumed by corporations (to act) and by banks
//!   (to underwrite credit)

pub mod health;
pub mod series;

pub use health::{
    trend, FinanceAction, FinanceError, FinancialHealth, Forecast, DEFAULT_TARGET_RUNWAY,
    FORECAST_WINDOW, MIN_RUNWAY_TICKS, TREND_LOOKBACK,
};
pub use series::{CorpStats, TimeSeries};

/// Round a monetary amount to two decimal places.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
