use stockdash_core::{format_date, portfolio};

use crate::page::{
    fmt_change, fmt_opt, fmt_percent, fmt_price, Chart, ChartKind, ChartSeries, Metric, Page,
    Pane, Table, Tone,
};
use crate::request::PortfolioParams;
use crate::views::latest_prices;
use crate::{DashboardError, MenuItem, ViewContext};

pub(crate) async fn render(
    ctx: &ViewContext,
    params: &PortfolioParams,
) -> Result<Page, DashboardError> {
    let holdings = &ctx.config.portfolio;
    if holdings.is_empty() {
        return Err(DashboardError::NoHoldings);
    }
    let prices = latest_prices(ctx, &holdings.symbols(), params.range).await?;
    let valuation = portfolio::value(holdings, &prices)?;

    let mut page = Page::new(
        MenuItem::Portfolio,
        format!("Portfolio as of {}", format_date(params.range.end())),
    );
    page.push(Metric::new("Total value", fmt_price(valuation.total_value)));
    page.push(Metric::new("Cash", fmt_price(valuation.cash)).with_delta(
        fmt_percent(valuation.cash_weight),
        Tone::Neutral,
    ));
    let pnl_pct = (valuation.total_cost > 0.0).then(|| valuation.unrealized_pnl / valuation.total_cost);
    page.push(
        Metric::new("Unrealized P&L", fmt_price(valuation.unrealized_pnl)).with_delta(
            fmt_opt(pnl_pct, fmt_change),
            Tone::of(valuation.unrealized_pnl),
        ),
    );
    page.push(Metric::new("Holdings", valuation.positions.len().to_string()));

    let mut table = Table::new(
        "Holdings",
        ["Symbol", "Shares", "Price", "Value", "Cost", "P&L", "P&L %", "Weight"],
    );
    for position in &valuation.positions {
        table.push_row(vec![
            position.symbol.to_string(),
            format!("{}", position.shares),
            fmt_price(position.price),
            fmt_price(position.market_value),
            fmt_price(position.cost),
            fmt_price(position.unrealized_pnl),
            fmt_opt(position.unrealized_pnl_pct, fmt_change),
            fmt_percent(position.weight),
        ]);
    }
    page.push(table);

    let mut labels: Vec<String> = valuation
        .positions
        .iter()
        .map(|position| position.symbol.to_string())
        .collect();
    let mut weights: Vec<Option<f64>> = valuation
        .positions
        .iter()
        .map(|position| Some(position.weight * 100.0))
        .collect();
    labels.push("Cash".to_owned());
    weights.push(Some(valuation.cash_weight * 100.0));
    page.push(
        Chart::new("Allocation (%)", ChartKind::Bar, labels)
            .with_series(ChartSeries::bars("Weight %", Pane::Price, weights)),
    );

    Ok(page)
}
