//! Financial-health engine
//!
//! Pure derivations over a corporation's recorded series plus its current
//! bank balance: trailing-window trend, multi-period forecast (runway, burn,
//! net margin), and the finance-action recommendation. The engine holds no
//! mutable state of its own and only ever reads *completed* ticks: the
//! in-progress tick's half-written values are always excluded, otherwise
//! trend computation would leak the current tick's partial data into the
//! decision it is supposed to inform.

use crate::finance::round_to_cents;
use crate::finance::series::{CorpStats, TimeSeries};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ticks of history both trend and forecast windows require.
pub const TREND_LOOKBACK: usize = 4;

/// Completed ticks summed by the forecast.
pub const FORECAST_WINDOW: usize = 4;

/// Runway (in ticks of survival) a healthy corporation aims to hold.
pub const DEFAULT_TARGET_RUNWAY: f64 = 6.0;

/// Below this runway, cost cuts become forced rather than gradual.
pub const MIN_RUNWAY_TICKS: f64 = 3.0;

/// Errors from trend/forecast/recommendation computation
#[derive(Debug, Error, PartialEq)]
pub enum FinanceError {
    #[error("insufficient history: need {needed} completed ticks, have {available}")]
    InsufficientHistory { needed: usize, available: usize },
}

/// Multi-period financial forecast
///
/// `runway` is `+infinity` when the corporation is not burning money: a
/// non-burning entity has unbounded runway by definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    /// Ticks of survival at the current loss rate (`balance / burn`)
    pub runway: f64,
    /// Excess of windowed costs over windowed revenue, floored at zero
    pub burn: f64,
    /// Windowed revenue minus windowed costs (may be negative)
    pub net_margin: f64,
}

/// Outcome of a finance review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FinanceAction {
    /// Profitable with non-negative sales trend: demand supports a raise
    IncreasePrice,
    /// Profitable but sales are slipping: win volume back
    LowerPrice,
    /// Borrow just enough to close the runway gap at the current burn rate
    BorrowFunds { amount: f64 },
    /// Short runway with a declining trend: cut headcount costs now
    FireEmployees { amount: f64 },
    /// Runway between the floor and the target: throttle cost growth
    LowerSalary,
    /// Runway already meets the target (or nothing is burning)
    Monitor,
}

/// Relative change between the two halves of a trailing window
///
/// Splits the `lookback` values recorded strictly before `current_tick`
/// into a first half of `lookback / 2` values and a second half holding the
/// remainder, then returns `(second_mean - first_mean) / first_mean`.
///
/// A zero first-half mean floors the result to `0.0`: the trend is
/// undefined there, and the reading is neutral, not an error.
///
/// # Example
/// ```
/// use econ_simulator_core_rs::{trend, TimeSeries};
///
/// let mut revenue = TimeSeries::new();
/// for (tick, value) in [(0, 100.0), (1, 150.0), (2, 200.0), (3, 250.0)] {
///     revenue.record(tick, value);
/// }
/// // Halves [100, 150] and [200, 250]: (225 - 125) / 125 = 0.8
/// assert_eq!(trend(&revenue, 4, 4).unwrap(), 0.8);
/// ```
pub fn trend(
    series: &TimeSeries,
    lookback: usize,
    current_tick: usize,
) -> Result<f64, FinanceError> {
    let window =
        series
            .window_before(current_tick, lookback)
            .ok_or(FinanceError::InsufficientHistory {
                needed: lookback,
                available: series.len_before(current_tick),
            })?;

    let (first, second) = window.split_at(lookback / 2);
    let first_mean = mean(first);
    let second_mean = mean(second);

    if first_mean == 0.0 {
        return Ok(0.0);
    }
    Ok((second_mean - first_mean) / first_mean)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Read-only view combining a corporation's series with its bank balance
///
/// Constructed fresh for each review; both the corporation (to decide an
/// action) and the lending bank (to underwrite a loan request) derive their
/// numbers through this same view, so the two sides always agree on what
/// the borrower's history says.
#[derive(Debug, Clone, Copy)]
pub struct FinancialHealth<'a> {
    stats: &'a CorpStats,
    balance: f64,
    current_tick: usize,
}

impl<'a> FinancialHealth<'a> {
    pub fn new(stats: &'a CorpStats, balance: f64, current_tick: usize) -> Self {
        Self {
            stats,
            balance,
            current_tick,
        }
    }

    /// Trend of recorded revenue over the standard lookback.
    pub fn revenue_trend(&self) -> Result<f64, FinanceError> {
        trend(&self.stats.revenue, TREND_LOOKBACK, self.current_tick)
    }

    /// Trend of recorded sales over the standard lookback.
    pub fn sales_trend(&self) -> Result<f64, FinanceError> {
        trend(&self.stats.sales, TREND_LOOKBACK, self.current_tick)
    }

    /// Sum the last completed ticks of costs and revenue into a forecast.
    ///
    /// Fails with `InsufficientHistory` when fewer than [`FORECAST_WINDOW`]
    /// completed ticks of either series exist.
    pub fn forecast(&self) -> Result<Forecast, FinanceError> {
        let costs = self.window(&self.stats.costs)?;
        let revenue = self.window(&self.stats.revenue)?;

        let total_costs: f64 = costs.iter().sum();
        let total_revenue: f64 = revenue.iter().sum();

        let net_margin = total_revenue - total_costs;
        let burn = (total_costs - total_revenue).max(0.0);
        let runway = if burn > 0.0 {
            self.balance / burn
        } else {
            f64::INFINITY
        };

        Ok(Forecast {
            runway,
            burn,
            net_margin,
        })
    }

    /// The finance-action state machine.
    ///
    /// Profitability takes priority: a profitable corporation never borrows,
    /// it tunes price on the sales trend (this gate intentionally differs
    /// from the loss branch, which gates borrowing on the revenue trend).
    /// An unprofitable corporation short of `target_runway` borrows the gap
    /// when its revenue trend is non-negative and `allow_borrow` holds,
    /// cuts headcount when runway is under [`MIN_RUNWAY_TICKS`], and
    /// throttles salary growth otherwise. Anything else is healthy enough
    /// to monitor.
    pub fn recommend(
        &self,
        target_runway: f64,
        allow_borrow: bool,
    ) -> Result<FinanceAction, FinanceError> {
        let forecast = self.forecast()?;
        let revenue_trend = self.revenue_trend()?;
        let sales_trend = self.sales_trend()?;

        let per_tick_burn = forecast.burn / FORECAST_WINDOW as f64;
        // Zero burn means infinite runway; the gap is zero by definition,
        // never NaN from (target - inf) * 0.
        let missing = if per_tick_burn > 0.0 {
            (target_runway - forecast.runway) * per_tick_burn
        } else {
            0.0
        };

        if forecast.net_margin > 0.0 {
            return Ok(if sales_trend >= 0.0 {
                FinanceAction::IncreasePrice
            } else {
                FinanceAction::LowerPrice
            });
        }

        if missing > 0.0 {
            if revenue_trend >= 0.0 && allow_borrow {
                return Ok(FinanceAction::BorrowFunds {
                    amount: round_to_cents(missing),
                });
            }
            if forecast.runway < MIN_RUNWAY_TICKS {
                return Ok(FinanceAction::FireEmployees { amount: missing });
            }
            return Ok(FinanceAction::LowerSalary);
        }

        Ok(FinanceAction::Monitor)
    }

    fn window(&self, series: &TimeSeries) -> Result<Vec<f64>, FinanceError> {
        series
            .window_before(self.current_tick, FORECAST_WINDOW)
            .ok_or(FinanceError::InsufficientHistory {
                needed: FORECAST_WINDOW,
                available: series.len_before(self.current_tick),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(costs: &[f64], revenue: &[f64], sales: &[f64]) -> CorpStats {
        let mut stats = CorpStats::new();
        for (tick, value) in costs.iter().enumerate() {
            stats.costs.record(tick, *value);
        }
        for (tick, value) in revenue.iter().enumerate() {
            stats.revenue.record(tick, *value);
        }
        for (tick, value) in sales.iter().enumerate() {
            stats.sales.record(tick, *value);
        }
        stats
    }

    #[test]
    fn test_trend_insufficient_history() {
        let mut series = TimeSeries::new();
        series.record(0, 1.0);
        series.record(1, 2.0);

        let err = trend(&series, 4, 2).unwrap_err();
        assert_eq!(
            err,
            FinanceError::InsufficientHistory {
                needed: 4,
                available: 2
            }
        );
    }

    #[test]
    fn test_trend_zero_first_half_is_neutral() {
        let mut series = TimeSeries::new();
        for (tick, value) in [(0, 0.0), (1, 0.0), (2, 10.0), (3, 20.0)] {
            series.record(tick, value);
        }
        assert_eq!(trend(&series, 4, 4).unwrap(), 0.0);
    }

    #[test]
    fn test_trend_excludes_in_progress_tick() {
        let mut series = TimeSeries::new();
        for tick in 0..4 {
            series.record(tick, 100.0);
        }
        // A wild partial value on the current tick must not move the trend.
        series.record(4, 1_000_000.0);
        assert_eq!(trend(&series, 4, 4).unwrap(), 0.0);
    }

    #[test]
    fn test_trend_odd_lookback_splits_short_first_half() {
        let mut series = TimeSeries::new();
        for (tick, value) in [(0, 10.0), (1, 10.0), (2, 20.0), (3, 20.0), (4, 20.0)] {
            series.record(tick, value);
        }
        // lookback 5: first half [10, 10], second half [20, 20, 20]
        assert_eq!(trend(&series, 5, 5).unwrap(), 1.0);
    }

    #[test]
    fn test_forecast_profitable_has_infinite_runway() {
        let stats = stats_with(
            &[100.0, 100.0, 100.0, 100.0],
            &[200.0, 200.0, 200.0, 200.0],
            &[1.0; 4],
        );
        let health = FinancialHealth::new(&stats, 1000.0, 4);
        let forecast = health.forecast().unwrap();

        assert_eq!(forecast.burn, 0.0);
        assert_eq!(forecast.net_margin, 400.0);
        assert!(forecast.runway.is_infinite());
    }

    #[test]
    fn test_forecast_runway_scales_with_balance() {
        let costs = [300.0, 300.0, 300.0, 300.0];
        let revenue = [100.0, 100.0, 100.0, 100.0];
        let stats = stats_with(&costs, &revenue, &[1.0; 4]);

        let poor = FinancialHealth::new(&stats, 200.0, 4).forecast().unwrap();
        let rich = FinancialHealth::new(&stats, 400.0, 4).forecast().unwrap();

        assert_eq!(poor.burn, 800.0);
        assert!(rich.runway > poor.runway);
    }

    #[test]
    fn test_recommend_borrows_runway_gap() {
        // burn = 500 over the window, runway = 200/500 = 0.4 ticks,
        // missing = (6 - 0.4) * 125 = 700.
        let stats = stats_with(
            &[300.0, 300.0, 300.0, 300.0],
            &[100.0, 150.0, 200.0, 250.0],
            &[1.0, 1.0, 2.0, 2.0],
        );
        let health = FinancialHealth::new(&stats, 200.0, 4);

        let action = health.recommend(DEFAULT_TARGET_RUNWAY, true).unwrap();
        assert_eq!(action, FinanceAction::BorrowFunds { amount: 700.0 });
    }

    #[test]
    fn test_recommend_profitable_tunes_price_by_sales_trend() {
        let costs = [100.0, 100.0, 100.0, 100.0];
        let revenue = [200.0, 200.0, 200.0, 200.0];

        let growing = stats_with(&costs, &revenue, &[1.0, 1.0, 2.0, 2.0]);
        let health = FinancialHealth::new(&growing, 1000.0, 4);
        assert_eq!(
            health.recommend(DEFAULT_TARGET_RUNWAY, true).unwrap(),
            FinanceAction::IncreasePrice
        );

        let shrinking = stats_with(&costs, &revenue, &[4.0, 4.0, 1.0, 1.0]);
        let health = FinancialHealth::new(&shrinking, 1000.0, 4);
        assert_eq!(
            health.recommend(DEFAULT_TARGET_RUNWAY, true).unwrap(),
            FinanceAction::LowerPrice
        );
    }

    #[test]
    fn test_recommend_fires_when_runway_short_and_trend_negative() {
        // Declining revenue, runway well under the floor.
        let stats = stats_with(
            &[300.0; 4],
            &[250.0, 200.0, 150.0, 100.0],
            &[4.0, 3.0, 2.0, 1.0],
        );
        let health = FinancialHealth::new(&stats, 100.0, 4);

        match health.recommend(DEFAULT_TARGET_RUNWAY, true).unwrap() {
            FinanceAction::FireEmployees { amount } => assert!(amount > 0.0),
            other => panic!("expected FireEmployees, got {:?}", other),
        }
    }

    #[test]
    fn test_recommend_lowers_salary_between_floor_and_target() {
        // burn = 400, per-tick burn 100; balance 400 → runway 4 (between 3 and 6).
        let stats = stats_with(
            &[200.0; 4],
            &[110.0, 105.0, 100.0, 85.0],
            &[2.0, 2.0, 1.0, 1.0],
        );
        let health = FinancialHealth::new(&stats, 1600.0, 4);

        assert_eq!(
            health.recommend(DEFAULT_TARGET_RUNWAY, true).unwrap(),
            FinanceAction::LowerSalary
        );
    }

    #[test]
    fn test_recommend_monitor_when_runway_covers_target() {
        // Unprofitable, but balance covers far more than the target runway.
        let stats = stats_with(
            &[300.0; 4],
            &[280.0, 270.0, 260.0, 250.0],
            &[2.0, 2.0, 1.0, 1.0],
        );
        let health = FinancialHealth::new(&stats, 100_000.0, 4);

        assert_eq!(
            health.recommend(DEFAULT_TARGET_RUNWAY, true).unwrap(),
            FinanceAction::Monitor
        );
    }

    #[test]
    fn test_recommend_respects_allow_borrow() {
        let stats = stats_with(
            &[300.0, 300.0, 300.0, 300.0],
            &[100.0, 150.0, 200.0, 250.0],
            &[1.0, 1.0, 2.0, 2.0],
        );
        let health = FinancialHealth::new(&stats, 200.0, 4);

        // Rising revenue but borrowing forbidden, runway 0.4 < 3: layoffs.
        match health.recommend(DEFAULT_TARGET_RUNWAY, false).unwrap() {
            FinanceAction::FireEmployees { amount } => {
                assert!((amount - 700.0).abs() < 1e-9);
            }
            other => panic!("expected FireEmployees, got {:?}", other),
        }
    }
}
