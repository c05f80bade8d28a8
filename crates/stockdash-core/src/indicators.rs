//! Technical indicators derived from a [`BarSeries`].
//!
//! The arithmetic is delegated to the `ta` crate; this module feeds closes
//! through each indicator in order and masks the warm-up window so that a
//! column is `None` until the indicator has seen enough bars.

use serde::{Deserialize, Serialize};
use ta::indicators::{
    BollingerBands, ExponentialMovingAverage, MovingAverageConvergenceDivergence,
    RelativeStrengthIndex, SimpleMovingAverage,
};
use ta::Next;
use thiserror::Error;

use crate::{BarSeries, Symbol, UtcDateTime};

/// Indicator parameters. Defaults are the conventional textbook settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_short: usize,
    pub sma_long: usize,
    pub ema: usize,
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_long: 50,
            ema: 12,
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("cannot derive indicators for '{symbol}': series is empty")]
    EmptySeries { symbol: String },
    #[error("invalid {indicator} parameters: {detail}")]
    InvalidParameter {
        indicator: &'static str,
        detail: String,
    },
}

/// Bar close plus every derived column for the same timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub ts: UtcDateTime,
    pub close: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

/// Indicator table aligned one-to-one with the source series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub symbol: Symbol,
    pub config: IndicatorConfig,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    pub fn column(&self, pick: impl Fn(&IndicatorRow) -> Option<f64>) -> Vec<Option<f64>> {
        self.rows.iter().map(pick).collect()
    }
}

/// Compute every configured indicator over the closes of `series`.
pub fn compute(series: &BarSeries, config: &IndicatorConfig) -> Result<IndicatorFrame, IndicatorError> {
    if series.is_empty() {
        return Err(IndicatorError::EmptySeries {
            symbol: series.symbol.to_string(),
        });
    }
    if config.macd_fast >= config.macd_slow {
        return Err(IndicatorError::InvalidParameter {
            indicator: "macd",
            detail: format!(
                "fast period {} must be shorter than slow period {}",
                config.macd_fast, config.macd_slow
            ),
        });
    }

    let mut sma_short = SimpleMovingAverage::new(config.sma_short).map_err(invalid("sma_short"))?;
    let mut sma_long = SimpleMovingAverage::new(config.sma_long).map_err(invalid("sma_long"))?;
    let mut ema = ExponentialMovingAverage::new(config.ema).map_err(invalid("ema"))?;
    let mut rsi = RelativeStrengthIndex::new(config.rsi).map_err(invalid("rsi"))?;
    let mut macd =
        MovingAverageConvergenceDivergence::new(config.macd_fast, config.macd_slow, config.macd_signal)
            .map_err(invalid("macd"))?;
    let mut bollinger = BollingerBands::new(config.bollinger_period, config.bollinger_multiplier)
        .map_err(invalid("bollinger"))?;

    let signal_warmup = config.macd_slow + config.macd_signal - 1;
    let rows = series
        .bars
        .iter()
        .enumerate()
        .map(|(index, bar)| {
            let seen = index + 1;
            let close = bar.close;
            let macd_out = macd.next(close);
            let bands = bollinger.next(close);

            IndicatorRow {
                ts: bar.ts,
                close,
                sma_short: warm(seen, config.sma_short, sma_short.next(close)),
                sma_long: warm(seen, config.sma_long, sma_long.next(close)),
                ema: warm(seen, config.ema, ema.next(close)),
                // RSI needs `period` price changes, i.e. period + 1 closes.
                rsi: warm(seen, config.rsi + 1, rsi.next(close)),
                macd: warm(seen, config.macd_slow, macd_out.macd),
                macd_signal: warm(seen, signal_warmup, macd_out.signal),
                macd_histogram: warm(seen, signal_warmup, macd_out.histogram),
                bollinger_upper: warm(seen, config.bollinger_period, bands.upper),
                bollinger_middle: warm(seen, config.bollinger_period, bands.average),
                bollinger_lower: warm(seen, config.bollinger_period, bands.lower),
            }
        })
        .collect();

    Ok(IndicatorFrame {
        symbol: series.symbol.clone(),
        config: *config,
        rows,
    })
}

fn warm(seen: usize, needed: usize, value: f64) -> Option<f64> {
    (seen >= needed && value.is_finite()).then_some(value)
}

fn invalid<E: std::fmt::Debug>(indicator: &'static str) -> impl Fn(E) -> IndicatorError {
    move |error| IndicatorError::InvalidParameter {
        indicator,
        detail: format!("{error:?}"),
    }
}
