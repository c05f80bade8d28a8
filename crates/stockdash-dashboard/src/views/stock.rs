use stockdash_ai::prompt;
use stockdash_core::{indicators, SeriesStats};

use crate::page::{
    fmt_change, fmt_opt, fmt_percent, fmt_price, fmt_volume, time_label, Candle, Chart, ChartKind,
    ChartSeries, Metric, Page, Pane, Table, Tone, Widget,
};
use crate::request::StockParams;
use crate::{DashboardError, MenuItem, ViewContext};

const RECENT_ROWS: usize = 10;

pub(crate) async fn render(ctx: &ViewContext, params: &StockParams) -> Result<Page, DashboardError> {
    let series = ctx
        .fetch(&params.symbol, params.interval, params.range)
        .await?;
    let config = &ctx.config.indicators;
    let frame = indicators::compute(&series, config)?;
    let (Some(stats), Some(latest)) = (SeriesStats::from_series(&series), frame.latest()) else {
        return Err(DashboardError::EmptySeries {
            symbol: params.symbol.to_string(),
            range: params.range.to_string(),
        });
    };

    let mut page = Page::new(
        MenuItem::Stock,
        format!("{} ({}, {})", params.symbol, params.range, params.interval),
    );
    page.push(Widget::heading(params.symbol.to_string()));

    page.push(
        Metric::new("Last close", fmt_price(stats.last_close))
            .with_delta(fmt_change(stats.total_return), Tone::of(stats.total_return)),
    );
    let bands = &ctx.config.scanner;
    let rsi_tone = match latest.rsi {
        Some(rsi) if rsi <= bands.rsi_oversold => Tone::Positive,
        Some(rsi) if rsi >= bands.rsi_overbought => Tone::Negative,
        _ => Tone::Neutral,
    };
    page.push(
        Metric::new(format!("RSI {}", config.rsi), fmt_opt(latest.rsi, fmt_price))
            .with_tone(rsi_tone),
    );
    page.push(Metric::new(
        "Volume",
        stats.last_volume.map_or_else(|| "-".to_owned(), fmt_volume),
    ));
    page.push(
        Metric::new("Max drawdown", fmt_percent(stats.max_drawdown))
            .with_tone(Tone::of(-stats.max_drawdown)),
    );

    let x: Vec<String> = series
        .bars
        .iter()
        .map(|bar| time_label(bar.ts, series.interval))
        .collect();
    let volumes = series
        .bars
        .iter()
        .map(|bar| bar.volume.map(|v| v as f64))
        .collect();

    page.push(
        Chart::new("Price", ChartKind::Candlestick, x.clone())
            .with_candles(series.bars.iter().map(Candle::from).collect())
            .with_series(ChartSeries::line(
                format!("SMA {}", config.sma_short),
                Pane::Price,
                frame.column(|row| row.sma_short),
            ))
            .with_series(ChartSeries::line(
                format!("SMA {}", config.sma_long),
                Pane::Price,
                frame.column(|row| row.sma_long),
            ))
            .with_series(ChartSeries::line(
                format!("EMA {}", config.ema),
                Pane::Price,
                frame.column(|row| row.ema),
            ))
            .with_series(ChartSeries::line(
                "Bollinger upper",
                Pane::Price,
                frame.column(|row| row.bollinger_upper),
            ))
            .with_series(ChartSeries::line(
                "Bollinger lower",
                Pane::Price,
                frame.column(|row| row.bollinger_lower),
            ))
            .with_series(ChartSeries::bars("Volume", Pane::Volume, volumes)),
    );

    page.push(
        Chart::new("Momentum", ChartKind::Line, x)
            .with_series(ChartSeries::line(
                format!("RSI {}", config.rsi),
                Pane::Oscillator,
                frame.column(|row| row.rsi),
            ))
            .with_series(ChartSeries::line(
                "MACD",
                Pane::Oscillator,
                frame.column(|row| row.macd),
            ))
            .with_series(ChartSeries::line(
                "MACD signal",
                Pane::Oscillator,
                frame.column(|row| row.macd_signal),
            ))
            .with_series(ChartSeries::bars(
                "MACD histogram",
                Pane::Oscillator,
                frame.column(|row| row.macd_histogram),
            )),
    );

    let mut table = Table::new(
        "Recent bars",
        ["Date", "Close", "SMA short", "SMA long", "EMA", "RSI", "MACD"],
    );
    for row in frame.rows.iter().rev().take(RECENT_ROWS) {
        table.push_row(vec![
            time_label(row.ts, series.interval),
            fmt_price(row.close),
            fmt_opt(row.sma_short, fmt_price),
            fmt_opt(row.sma_long, fmt_price),
            fmt_opt(row.ema, fmt_price),
            fmt_opt(row.rsi, fmt_price),
            fmt_opt(row.macd, fmt_price),
        ]);
    }
    page.push(table);

    if params.commentary {
        let provider = ctx.commentary_provider()?;
        let commentary = provider
            .complete(&prompt::stock(&stats, params.range, latest))
            .await?;
        page.push(commentary);
    }

    Ok(page)
}
