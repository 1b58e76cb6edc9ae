//! Per-tick statistic storage
//!
//! A `TimeSeries` maps tick numbers to scalar observations. Each agent
//! statistic gets its own series; a tick's entry is seeded with a default
//! at the start of the tick and overwritten (or accumulated into) as events
//! occur during the tick. Entries are never deleted, so the series is the
//! single source of truth for both "latest" reads and trailing-window math.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered tick → value mapping for one tracked statistic
///
/// Ticks are non-negative and strictly increasing as they are recorded, but
/// lookups tolerate sparse keys: window queries operate on recorded entries,
/// not on arithmetic tick ranges.
///
/// # Example
/// ```
/// use econ_simulator_core_rs::TimeSeries;
///
/// let mut sales = TimeSeries::new();
/// sales.record(0, 3.0);
/// sales.record(1, 5.0);
/// sales.add(1, 2.0);
///
/// assert_eq!(sales.get(1), Some(7.0));
/// assert_eq!(sales.latest(), Some((1, 7.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    values: BTreeMap<usize, f64>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the value for a tick.
    pub fn record(&mut self, tick: usize, value: f64) {
        self.values.insert(tick, value);
    }

    /// Accumulate into a tick's value, treating a missing entry as zero.
    pub fn add(&mut self, tick: usize, delta: f64) {
        *self.values.entry(tick).or_insert(0.0) += delta;
    }

    /// Seed a tick with a default value, keeping any value already recorded.
    pub fn seed(&mut self, tick: usize, default: f64) {
        self.values.entry(tick).or_insert(default);
    }

    /// Value recorded for a tick, if any.
    pub fn get(&self, tick: usize) -> Option<f64> {
        self.values.get(&tick).copied()
    }

    /// Most recent (tick, value) pair.
    pub fn latest(&self) -> Option<(usize, f64)> {
        self.values.iter().next_back().map(|(t, v)| (*t, *v))
    }

    /// Most recent value, or `default` when nothing has been recorded.
    pub fn latest_or(&self, default: f64) -> f64 {
        self.latest().map(|(_, v)| v).unwrap_or(default)
    }

    /// The last `len` recorded values strictly before `tick`, oldest first.
    ///
    /// Returns `None` when fewer than `len` entries precede `tick`. The
    /// in-progress tick itself is never part of the window.
    pub fn window_before(&self, tick: usize, len: usize) -> Option<Vec<f64>> {
        let mut window: Vec<f64> = self
            .values
            .range(..tick)
            .rev()
            .take(len)
            .map(|(_, v)| *v)
            .collect();
        if window.len() < len {
            return None;
        }
        window.reverse();
        Some(window)
    }

    /// Up to `max_len` most recent values strictly before `tick`, oldest
    /// first. Unlike [`TimeSeries::window_before`] this returns whatever
    /// history exists, possibly fewer than `max_len` values.
    pub fn recent_before(&self, tick: usize, max_len: usize) -> Vec<f64> {
        let mut window: Vec<f64> = self
            .values
            .range(..tick)
            .rev()
            .take(max_len)
            .map(|(_, v)| *v)
            .collect();
        window.reverse();
        window
    }

    /// Number of entries recorded strictly before `tick`.
    pub fn len_before(&self, tick: usize) -> usize {
        self.values.range(..tick).count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (tick, value) pairs in tick order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().map(|(t, v)| (*t, *v))
    }
}

/// Fixed record of every statistic a corporation tracks
///
/// One field per statistic keeps the tracked set a compile-time-checked
/// structure; `begin_tick` seeds each series from a declarative
/// (field, default) list. Flow statistics default to zero each tick, price
/// and salary carry the previous level forward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpStats {
    pub sales: TimeSeries,
    pub revenue: TimeSeries,
    pub costs: TimeSeries,
    pub demand: TimeSeries,
    pub production: TimeSeries,
    pub price: TimeSeries,
    pub salary: TimeSeries,
    pub overstock: TimeSeries,
}

impl CorpStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every series with its default for the tick now starting.
    ///
    /// Values recorded later in the tick overwrite or accumulate into these
    /// placeholders; a tick that sees no events keeps the defaults, so every
    /// series has an entry for every tick the corporation lived through.
    pub fn begin_tick(&mut self, tick: usize) {
        let carry_price = self.price.latest_or(0.0);
        let carry_salary = self.salary.latest_or(0.0);

        let defaults: [(&mut TimeSeries, f64); 8] = [
            (&mut self.sales, 0.0),
            (&mut self.revenue, 0.0),
            (&mut self.costs, 0.0),
            (&mut self.demand, 0.0),
            (&mut self.production, 0.0),
            (&mut self.overstock, 0.0),
            (&mut self.price, carry_price),
            (&mut self.salary, carry_salary),
        ];
        for (series, default) in defaults {
            series.seed(tick, default);
        }
    }

    /// Current price level (last recorded value).
    pub fn latest_price(&self) -> f64 {
        self.price.latest_or(0.0)
    }

    /// Current salary level (last recorded value).
    pub fn latest_salary(&self) -> f64 {
        self.salary.latest_or(0.0)
    }
}
