use serde::{Deserialize, Serialize};

use crate::{Interval, Symbol, UtcDateTime, ValidationError};

/// OHLCV bar record for a given interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
    pub vwap: Option<f64>,
}

impl Bar {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
        vwap: Option<f64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;
        validate_optional_non_negative("vwap", vwap)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
            vwap,
        })
    }
}

/// Price/volume time series for one symbol, ordered by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: Symbol,
    pub interval: Interval,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, sorting bars by timestamp and keeping the last bar
    /// reported for any duplicated timestamp.
    pub fn new(symbol: Symbol, interval: Interval, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|bar| bar.ts);
        let mut ordered: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match ordered.last_mut() {
                Some(last) if last.ts == bar.ts => *last = bar,
                _ => ordered.push(bar),
            }
        }

        Self {
            symbol,
            interval,
            bars: ordered,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn timestamps(&self) -> Vec<UtcDateTime> {
        self.bars.iter().map(|bar| bar.ts).collect()
    }

    /// `true` when timestamps never decrease.
    pub fn is_chronological(&self) -> bool {
        self.bars.windows(2).all(|pair| pair[0].ts <= pair[1].ts)
    }
}

pub(crate) fn validate_non_negative(
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn validate_optional_non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        validate_non_negative(field, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: &str, close: f64) -> Bar {
        let ts = UtcDateTime::parse(ts).expect("timestamp");
        Bar::new(ts, close, close + 1.0, close - 1.0, close, Some(10), None).expect("bar")
    }

    #[test]
    fn rejects_invalid_bar_bounds() {
        let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("timestamp");
        let err = Bar::new(ts, 10.0, 12.0, 9.0, 12.5, Some(10), None).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarBounds));
    }

    #[test]
    fn rejects_non_finite_prices() {
        let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("timestamp");
        let err = Bar::new(ts, f64::NAN, 12.0, 9.0, 10.0, None, None).expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { field: "open" }));
    }

    #[test]
    fn series_orders_bars_and_drops_duplicate_timestamps() {
        let symbol = Symbol::parse("AAPL").expect("symbol");
        let series = BarSeries::new(
            symbol,
            Interval::OneDay,
            vec![
                bar("2024-01-03T00:00:00Z", 12.0),
                bar("2024-01-01T00:00:00Z", 10.0),
                bar("2024-01-03T00:00:00Z", 13.0),
                bar("2024-01-02T00:00:00Z", 11.0),
            ],
        );

        assert!(series.is_chronological());
        assert_eq!(series.closes(), vec![10.0, 11.0, 13.0]);
    }
}
