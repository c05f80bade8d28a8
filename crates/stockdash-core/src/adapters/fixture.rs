use std::future::Future;
use std::pin::Pin;

use time::macros::date;
use time::{Date, Duration, Weekday};

use crate::data_source::{BarsRequest, DataSource, SourceError};
use crate::{Bar, BarSeries, Interval, ProviderId, Symbol, UtcDateTime};

const MAX_FIXTURE_BARS: usize = 20_000;
const ANCHOR: Date = date!(2020 - 01 - 01);

/// Catalog entry: ticker, price at the anchor date, annual drift, swing amplitude.
type CatalogEntry = (&'static str, f64, f64, f64);

const CATALOG: &[CatalogEntry] = &[
    ("AAPL", 150.0, 0.15, 0.08),
    ("MSFT", 250.0, 0.14, 0.06),
    ("NVDA", 60.0, 0.35, 0.15),
    ("AMZN", 120.0, 0.10, 0.09),
    ("GOOGL", 110.0, 0.09, 0.07),
    ("TSLA", 200.0, 0.05, 0.20),
    ("META", 200.0, 0.12, 0.12),
    ("JPM", 130.0, 0.07, 0.05),
    ("XOM", 90.0, 0.04, 0.06),
    ("JNJ", 160.0, 0.02, 0.03),
    ("SPY", 400.0, 0.08, 0.04),
    ("QQQ", 320.0, 0.11, 0.06),
    ("VTI", 200.0, 0.08, 0.04),
    ("IWM", 180.0, 0.05, 0.07),
    ("VXUS", 55.0, 0.04, 0.05),
    ("SCHD", 70.0, 0.06, 0.03),
    ("BND", 75.0, 0.00, 0.015),
    ("AGG", 100.0, 0.00, 0.015),
    ("TLT", 100.0, -0.03, 0.05),
    ("GLD", 170.0, 0.07, 0.04),
    ("VNQ", 85.0, 0.03, 0.06),
    ("ARKK", 50.0, -0.05, 0.20),
    ("^GSPC", 4200.0, 0.08, 0.04),
];

/// Deterministic offline market-data source.
///
/// Prices are a closed-form function of symbol and calendar date, so the same
/// request always yields the same bars and overlapping ranges agree. Symbols
/// outside the built-in catalog are reported as not found.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureAdapter;

impl FixtureAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Symbols the fixture can serve.
    pub fn catalog() -> Vec<Symbol> {
        CATALOG
            .iter()
            .filter_map(|(ticker, ..)| Symbol::parse(ticker).ok())
            .collect()
    }

    fn generate(&self, req: &BarsRequest) -> Result<BarSeries, SourceError> {
        let entry = CATALOG
            .iter()
            .find(|(ticker, ..)| *ticker == req.symbol.as_str())
            .ok_or_else(|| {
                SourceError::not_found(format!(
                    "fixture catalog has no symbol '{}'",
                    req.symbol
                ))
            })?;

        let model = PriceModel::new(entry, &req.symbol);
        let mut bars = Vec::new();
        let mut day = req.range.start();
        loop {
            for hour in session_hours(day, req.interval) {
                if bars.len() >= MAX_FIXTURE_BARS {
                    return Err(SourceError::invalid_request(format!(
                        "fixture request for {} {} exceeds {MAX_FIXTURE_BARS} bars",
                        req.symbol, req.interval
                    )));
                }
                bars.push(model.bar(day, hour)?);
            }

            if day >= req.range.end() {
                break;
            }
            match day.next_day() {
                Some(next) => day = next,
                None => break,
            }
        }

        Ok(BarSeries::new(req.symbol.clone(), req.interval, bars))
    }
}

impl DataSource for FixtureAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn bars<'a>(
        &'a self,
        req: BarsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.generate(&req) })
    }
}

/// Hours (UTC) at which `day` produces a bar for `interval`.
fn session_hours(day: Date, interval: Interval) -> Vec<i64> {
    let trading_day = !matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday);
    match interval {
        Interval::OneHour if trading_day => (14..=20).collect(),
        Interval::OneDay if trading_day => vec![0],
        Interval::OneWeek if day.weekday() == Weekday::Monday => vec![0],
        Interval::OneMonth if day.day() == 1 => vec![0],
        _ => Vec::new(),
    }
}

struct PriceModel {
    base: f64,
    drift: f64,
    amplitude: f64,
    phase: f64,
    base_volume: f64,
}

impl PriceModel {
    fn new(entry: &CatalogEntry, symbol: &Symbol) -> Self {
        let (_, base, drift, amplitude) = *entry;
        let seed = symbol_seed(symbol);
        Self {
            base,
            drift,
            amplitude,
            phase: (seed % 628) as f64 / 100.0,
            base_volume: 5_000_000.0 + (seed % 40) as f64 * 1_000_000.0,
        }
    }

    fn price_at(&self, t: f64) -> f64 {
        let trend = (self.drift * t / 365.25).exp();
        let swing = 1.0
            + self.amplitude * (t / 23.0 + self.phase).sin()
            + self.amplitude * 0.4 * (t / 5.3 + 2.0 * self.phase).sin();
        self.base * trend * swing.max(0.05)
    }

    fn bar(&self, day: Date, hour: i64) -> Result<Bar, SourceError> {
        let t = (day - ANCHOR).whole_days() as f64 + hour as f64 / 24.0;
        let open = round_cents(self.price_at(t - 0.4));
        let close = round_cents(self.price_at(t));
        let wick = 0.004 + 0.003 * (t * 1.7 + self.phase).sin().abs();
        let high = round_cents(open.max(close) * (1.0 + wick));
        let low = round_cents(open.min(close) * (1.0 - wick));
        let volume = self.base_volume * (1.0 + 0.3 * (t / 7.0 + self.phase).sin());

        let stamp = (day.midnight() + Duration::hours(hour)).assume_utc();
        let ts = UtcDateTime::from_offset_datetime(stamp)
            .map_err(|e| SourceError::internal(e.to_string()))?;
        Bar::new(ts, open, high, low, close, Some(volume as u64), None)
            .map_err(|e| SourceError::internal(format!("fixture produced invalid bar: {e}")))
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(u64::from(byte))
    })
}
