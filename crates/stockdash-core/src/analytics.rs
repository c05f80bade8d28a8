//! Return and risk statistics over close prices.
//!
//! Ratios are fractions (`0.05` is five percent). Drawdowns are reported as
//! positive fractions of the running peak.

use serde::{Deserialize, Serialize};

use crate::{BarSeries, Interval, Symbol, UtcDateTime};

/// Summary statistics for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub symbol: Symbol,
    pub bars: usize,
    pub first_close: f64,
    pub last_close: f64,
    pub total_return: f64,
    pub annualized_return: Option<f64>,
    pub volatility: Option<f64>,
    pub max_drawdown: f64,
    pub current_drawdown: f64,
    pub last_change: Option<f64>,
    pub last_volume: Option<u64>,
}

impl SeriesStats {
    /// Returns `None` for an empty series.
    pub fn from_series(series: &BarSeries) -> Option<Self> {
        let first = series.first()?;
        let last = series.latest()?;
        let closes = series.closes();

        Some(Self {
            symbol: series.symbol.clone(),
            bars: series.len(),
            first_close: first.close,
            last_close: last.close,
            total_return: total_return(&closes).unwrap_or(0.0),
            annualized_return: annualized_return(&closes, series.interval),
            volatility: annualized_volatility(&closes, series.interval),
            max_drawdown: max_drawdown(&closes),
            current_drawdown: current_drawdown(&closes),
            last_change: simple_returns(&closes).last().copied(),
            last_volume: last.volume,
        })
    }
}

/// Period-over-period simple returns; pairs with a non-positive base are skipped.
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|pair| pair[0] > 0.0)
        .map(|pair| pair[1] / pair[0] - 1.0)
        .collect()
}

pub fn total_return(closes: &[f64]) -> Option<f64> {
    let first = *closes.first()?;
    let last = *closes.last()?;
    (first > 0.0).then(|| last / first - 1.0)
}

/// Shortest history, as a fraction of a year, that is annualized.
const MIN_ANNUALIZED_YEARS: f64 = 0.25;

/// Geometric return scaled to one year of `interval` periods.
///
/// `None` for less than a quarter year of periods, where compounding a few
/// bars up to a year only amplifies noise.
pub fn annualized_return(closes: &[f64], interval: Interval) -> Option<f64> {
    let periods = closes.len().checked_sub(1).filter(|n| *n > 0)?;
    if (periods as f64) < interval.periods_per_year() * MIN_ANNUALIZED_YEARS {
        return None;
    }
    let growth = 1.0 + total_return(closes)?;
    if growth <= 0.0 {
        return Some(-1.0);
    }
    Some(growth.powf(interval.periods_per_year() / periods as f64) - 1.0)
}

/// Sample standard deviation of simple returns, annualized by `sqrt(periods_per_year)`.
pub fn annualized_volatility(closes: &[f64], interval: Interval) -> Option<f64> {
    let returns = simple_returns(closes);
    if returns.len() < 2 {
        return None;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
        / (returns.len() - 1) as f64;
    Some(variance.sqrt() * interval.periods_per_year().sqrt())
}

pub fn max_drawdown(closes: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0_f64;
    for close in closes {
        peak = peak.max(*close);
        if peak > 0.0 {
            worst = worst.max((peak - close) / peak);
        }
    }
    worst
}

/// Distance of the last close below the highest close seen so far.
pub fn current_drawdown(closes: &[f64]) -> f64 {
    let peak = closes.iter().copied().fold(f64::MIN, f64::max);
    match closes.last() {
        Some(last) if peak > 0.0 => (peak - last) / peak,
        _ => 0.0,
    }
}

/// Cumulative return since the first bar, one point per bar.
pub fn cumulative_returns(series: &BarSeries) -> Vec<(UtcDateTime, f64)> {
    let Some(base) = series.first().map(|bar| bar.close).filter(|close| *close > 0.0) else {
        return Vec::new();
    };
    series
        .bars
        .iter()
        .map(|bar| (bar.ts, bar.close / base - 1.0))
        .collect()
}
