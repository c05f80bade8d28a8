use std::cmp::Ordering;

use stockdash_core::{indicators, ScannerConfig, SeriesStats, Symbol};

use crate::page::{
    fmt_change, fmt_opt, fmt_price, fmt_volume, Alert, AlertLevel, Chart, ChartKind, ChartSeries,
    Metric, Page, Pane, Table,
};
use crate::request::{ScanFilter, ScanSort, ScannerParams};
use crate::{DashboardError, MenuItem, ViewContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Above,
    Below,
}

#[derive(Debug, Clone)]
struct ScanRow {
    symbol: Symbol,
    last_close: f64,
    change: f64,
    rsi: Option<f64>,
    sma_long: Option<f64>,
    trend: Option<Trend>,
    volume: Option<u64>,
}

impl ScanRow {
    fn matches(&self, filter: ScanFilter, bands: &ScannerConfig) -> bool {
        match filter {
            ScanFilter::All => true,
            ScanFilter::Oversold => self.rsi.is_some_and(|rsi| rsi <= bands.rsi_oversold),
            ScanFilter::Overbought => self.rsi.is_some_and(|rsi| rsi >= bands.rsi_overbought),
            ScanFilter::AboveTrend => self.trend == Some(Trend::Above),
            ScanFilter::BelowTrend => self.trend == Some(Trend::Below),
        }
    }
}

pub(crate) async fn render(ctx: &ViewContext, params: &ScannerParams) -> Result<Page, DashboardError> {
    let mut rows = Vec::with_capacity(params.symbols.len());
    for symbol in &params.symbols {
        let series = ctx.fetch(symbol, params.interval, params.range).await?;
        let frame = indicators::compute(&series, &ctx.config.indicators)?;
        let (Some(stats), Some(latest)) = (SeriesStats::from_series(&series), frame.latest())
        else {
            continue;
        };
        let trend = latest.sma_long.map(|sma| {
            if stats.last_close >= sma {
                Trend::Above
            } else {
                Trend::Below
            }
        });
        rows.push(ScanRow {
            symbol: symbol.clone(),
            last_close: stats.last_close,
            change: stats.total_return,
            rsi: latest.rsi,
            sma_long: latest.sma_long,
            trend,
            volume: stats.last_volume,
        });
    }

    let scanned = rows.len();
    let bands = ctx.config.scanner;
    rows.retain(|row| row.matches(params.filter, &bands));
    sort_rows(&mut rows, params.sort, params.descending);

    let mut page = Page::new(
        MenuItem::Scanner,
        format!("Scanner: {} ({})", params.filter, params.range),
    );
    page.push(Metric::new("Scanned", scanned.to_string()));
    page.push(Metric::new("Matches", rows.len().to_string()));

    if rows.is_empty() {
        page.push(Alert::new(
            AlertLevel::Info,
            "No matches",
            format!("No symbol matches the '{}' filter", params.filter),
        ));
        return Ok(page);
    }

    let mut table = Table::new(
        "Scan results",
        ["Symbol", "Last close", "Change", "RSI", "SMA long", "Trend", "Volume"],
    );
    for row in &rows {
        table.push_row(vec![
            row.symbol.to_string(),
            fmt_price(row.last_close),
            fmt_change(row.change),
            fmt_opt(row.rsi, fmt_price),
            fmt_opt(row.sma_long, fmt_price),
            match row.trend {
                Some(Trend::Above) => "above".to_owned(),
                Some(Trend::Below) => "below".to_owned(),
                None => "-".to_owned(),
            },
            row.volume.map_or_else(|| "-".to_owned(), fmt_volume),
        ]);
    }
    page.push(table);

    page.push(
        Chart::new(
            "Change over range (%)",
            ChartKind::Bar,
            rows.iter().map(|row| row.symbol.to_string()).collect(),
        )
        .with_series(ChartSeries::bars(
            "Change %",
            Pane::Price,
            rows.iter().map(|row| Some(row.change * 100.0)).collect(),
        )),
    );

    Ok(page)
}

fn sort_rows(rows: &mut [ScanRow], sort: ScanSort, descending: bool) {
    rows.sort_by(|a, b| {
        let ordering = match sort {
            ScanSort::Change => a.change.total_cmp(&b.change),
            ScanSort::Rsi => compare_optional(a.rsi, b.rsi),
            ScanSort::Volume => a.volume.cmp(&b.volume),
            ScanSort::Symbol => a.symbol.cmp(&b.symbol),
        };
        let ordering = if descending { ordering.reverse() } else { ordering };
        ordering.then_with(|| a.symbol.cmp(&b.symbol))
    });
}

fn compare_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(symbol: &str, change: f64, rsi: Option<f64>) -> ScanRow {
        ScanRow {
            symbol: Symbol::parse(symbol).expect("symbol"),
            last_close: 10.0,
            change,
            rsi,
            sma_long: None,
            trend: None,
            volume: None,
        }
    }

    #[test]
    fn sorts_by_change_descending_with_symbol_tiebreak() {
        let mut rows = vec![row("B", 0.1, None), row("A", 0.1, None), row("C", 0.3, None)];
        sort_rows(&mut rows, ScanSort::Change, true);
        let order: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, ["C", "A", "B"]);
    }

    #[test]
    fn oversold_filter_uses_configured_band() {
        let bands = ScannerConfig::default();
        assert!(row("A", 0.0, Some(25.0)).matches(ScanFilter::Oversold, &bands));
        assert!(!row("A", 0.0, Some(45.0)).matches(ScanFilter::Oversold, &bands));
        assert!(!row("A", 0.0, None).matches(ScanFilter::Oversold, &bands));
        assert!(row("A", 0.0, Some(75.0)).matches(ScanFilter::Overbought, &bands));
    }
}
