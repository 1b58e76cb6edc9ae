//! Bank-side credit check
//!
//! Underwriting re-derives the requesting corporation's forecast and
//! revenue trend from its own recorded series rather than trusting any
//! figure the borrower supplies, then sizes an offer off the current
//! balance. Denial is an expected decision outcome and is returned as a
//! zero offer, never as an error.

use crate::finance::{CorpStats, FinanceError, FinancialHealth, MIN_RUNWAY_TICKS, round_to_cents};

/// Revenue trend below which a loss-making borrower is declined.
pub const DECLINE_TREND: f64 = -0.2;

/// Revenue trend above which strong growth is rewarded.
pub const GROWTH_TREND: f64 = 0.2;

/// Share of the borrower's balance used as the base offer.
pub const BASE_BALANCE_SHARE: f64 = 0.5;

/// Hard ceiling: an offer never exceeds this share of the balance.
pub const MAX_BALANCE_SHARE: f64 = 0.75;

/// Base multiplier applied for strong growth.
pub const GROWTH_MULTIPLIER: f64 = 1.5;

/// Base multiplier applied for strong decline.
pub const DECLINE_MULTIPLIER: f64 = 0.5;

/// Share of a positive net margin added as a profit bonus.
pub const MARGIN_BONUS_SHARE: f64 = 0.2;

/// Score a loan request and size the offer.
///
/// Returns the offered principal, `0.0` meaning denial. Fails only when
/// the borrower lacks the history to be assessed at all.
///
/// Denial rules: a borrower that is both unprofitable and short of
/// [`MIN_RUNWAY_TICKS`] of runway, or both unprofitable and in strong
/// revenue decline, is too risky. Otherwise the offer starts at half the
/// balance, is scaled by the trend, earns a profit bonus, and is capped at
/// 75% of the balance and at the amount requested.
pub fn assess(
    amount_requested: f64,
    borrower: &CorpStats,
    balance: f64,
    current_tick: usize,
) -> Result<f64, FinanceError> {
    let health = FinancialHealth::new(borrower, balance, current_tick);
    let forecast = health.forecast()?;
    let revenue_trend = health.revenue_trend()?;

    if forecast.net_margin < 0.0
        && (forecast.runway < MIN_RUNWAY_TICKS || revenue_trend < DECLINE_TREND)
    {
        return Ok(0.0);
    }

    let mut offer = BASE_BALANCE_SHARE * balance;
    if revenue_trend > GROWTH_TREND {
        offer *= GROWTH_MULTIPLIER;
    } else if revenue_trend < DECLINE_TREND {
        offer *= DECLINE_MULTIPLIER;
    }
    if forecast.net_margin > 0.0 {
        offer += MARGIN_BONUS_SHARE * forecast.net_margin;
    }

    Ok(round_to_cents(
        offer.min(MAX_BALANCE_SHARE * balance).min(amount_requested),
    ))
}
