use std::collections::{BTreeMap, BTreeSet};

use stockdash_core::{analytics, BarSeries, SeriesStats, Symbol, UtcDateTime};

use crate::page::{
    fmt_change, fmt_opt, fmt_percent, time_label, Chart, ChartKind, ChartSeries, Metric, Page,
    Pane, Table, Tone,
};
use crate::request::ReturnsParams;
use crate::{DashboardError, MenuItem, ViewContext};

pub(crate) async fn render(ctx: &ViewContext, params: &ReturnsParams) -> Result<Page, DashboardError> {
    let mut symbols: Vec<Symbol> = params.symbols.clone();
    if let Some(benchmark) = &params.benchmark {
        if !symbols.contains(benchmark) {
            symbols.push(benchmark.clone());
        }
    }

    let mut fetched: Vec<BarSeries> = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        fetched.push(ctx.fetch(symbol, params.interval, params.range).await?);
    }

    let dates: BTreeSet<UtcDateTime> = fetched
        .iter()
        .flat_map(|series| series.bars.iter().map(|bar| bar.ts))
        .collect();
    let x: Vec<String> = dates
        .iter()
        .map(|ts| time_label(*ts, params.interval))
        .collect();

    let mut chart = Chart::new("Cumulative return (%)", ChartKind::Line, x);
    let mut stats = Vec::with_capacity(fetched.len());
    for series in &fetched {
        let points: BTreeMap<UtcDateTime, f64> =
            analytics::cumulative_returns(series).into_iter().collect();
        let values = dates
            .iter()
            .map(|ts| points.get(ts).map(|value| value * 100.0))
            .collect();
        chart = chart.with_series(ChartSeries::line(series.symbol.to_string(), Pane::Price, values));
        if let Some(summary) = SeriesStats::from_series(series) {
            stats.push(summary);
        }
    }

    let benchmark_return = params.benchmark.as_ref().and_then(|benchmark| {
        stats
            .iter()
            .find(|summary| &summary.symbol == benchmark)
            .map(|summary| summary.total_return)
    });

    let mut page = Page::new(
        MenuItem::ReturnTracker,
        format!("Returns ({})", params.range),
    );
    if let Some(best) = stats
        .iter()
        .max_by(|a, b| a.total_return.total_cmp(&b.total_return))
    {
        page.push(
            Metric::new("Best performer", best.symbol.to_string())
                .with_delta(fmt_change(best.total_return), Tone::of(best.total_return)),
        );
    }
    if let (Some(benchmark), Some(total)) = (&params.benchmark, benchmark_return) {
        page.push(
            Metric::new("Benchmark", benchmark.to_string())
                .with_delta(fmt_change(total), Tone::of(total)),
        );
    }
    page.push(chart);

    let mut table = Table::new(
        "Performance",
        [
            "Symbol",
            "Total return",
            "Ann. return",
            "Volatility",
            "Max drawdown",
            "vs benchmark",
        ],
    );
    for summary in &stats {
        let is_benchmark = params.benchmark.as_ref() == Some(&summary.symbol);
        let excess = match benchmark_return {
            Some(total) if !is_benchmark => fmt_change(summary.total_return - total),
            _ => "-".to_owned(),
        };
        let name = if is_benchmark {
            format!("{} (benchmark)", summary.symbol)
        } else {
            summary.symbol.to_string()
        };
        table.push_row(vec![
            name,
            fmt_change(summary.total_return),
            fmt_opt(summary.annualized_return, fmt_change),
            fmt_opt(summary.volatility, fmt_percent),
            fmt_percent(summary.max_drawdown),
            excess,
        ]);
    }
    page.push(table);

    Ok(page)
}
