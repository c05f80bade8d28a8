use stockdash_core::{portfolio, RebalanceAction};

use crate::page::{
    fmt_change, fmt_opt, fmt_percent, fmt_price, Alert, AlertLevel, Chart, ChartKind, ChartSeries,
    Metric, Page, Pane, Table,
};
use crate::request::RebalanceParams;
use crate::views::latest_prices;
use crate::{DashboardError, MenuItem, ViewContext};

pub(crate) async fn render(
    ctx: &ViewContext,
    params: &RebalanceParams,
) -> Result<Page, DashboardError> {
    let holdings = &ctx.config.portfolio;
    if holdings.is_empty() {
        return Err(DashboardError::NoHoldings);
    }
    if !holdings.has_targets() {
        return Err(DashboardError::NoTargets);
    }

    let prices = latest_prices(ctx, &holdings.symbols(), params.range).await?;
    let valuation = portfolio::value(holdings, &prices)?;
    let lines = portfolio::rebalance(&valuation, params.tolerance);

    let mut page = Page::new(
        MenuItem::Rebalance,
        format!("Rebalancing (tolerance {})", fmt_percent(params.tolerance)),
    );
    let cash_target = (1.0 - holdings.target_weight_total()).max(0.0);
    page.push(Metric::new("Total value", fmt_price(valuation.total_value)));
    page.push(Metric::new("Cash weight", fmt_percent(valuation.cash_weight)));
    page.push(Metric::new("Cash target", fmt_percent(cash_target)));

    let outside: Vec<_> = lines.iter().filter(|line| line.outside_tolerance()).collect();
    if outside.is_empty() {
        page.push(Alert::new(
            AlertLevel::Info,
            "On target",
            format!(
                "Every targeted holding is within {} of its target weight",
                fmt_percent(params.tolerance)
            ),
        ));
    }
    for line in &outside {
        let verb = match line.action {
            RebalanceAction::Buy => "Buy",
            RebalanceAction::Sell => "Sell",
            RebalanceAction::Hold => continue,
        };
        page.push(Alert::new(
            AlertLevel::Warning,
            format!("{} drifted {}", line.symbol, fmt_change(line.drift)),
            format!(
                "{verb} {:.2} shares of {} (about {}) to move from {} to {}",
                line.trade_shares.abs(),
                line.symbol,
                fmt_price(line.trade_value.abs()),
                fmt_percent(line.current_weight),
                fmt_opt(line.target_weight, fmt_percent)
            ),
        ));
    }

    let mut table = Table::new(
        "Drift",
        ["Symbol", "Current", "Target", "Drift", "Action", "Trade value", "Shares"],
    );
    for line in &lines {
        table.push_row(vec![
            line.symbol.to_string(),
            fmt_percent(line.current_weight),
            fmt_opt(line.target_weight, fmt_percent),
            match line.target_weight {
                Some(_) => fmt_change(line.drift),
                None => "-".to_owned(),
            },
            line.action.to_string(),
            fmt_price(line.trade_value),
            format!("{:.2}", line.trade_shares),
        ]);
    }
    page.push(table);

    page.push(
        Chart::new(
            "Current vs target weight (%)",
            ChartKind::Bar,
            lines.iter().map(|line| line.symbol.to_string()).collect(),
        )
        .with_series(ChartSeries::bars(
            "Current %",
            Pane::Price,
            lines.iter().map(|line| Some(line.current_weight * 100.0)).collect(),
        ))
        .with_series(ChartSeries::bars(
            "Target %",
            Pane::Price,
            lines
                .iter()
                .map(|line| line.target_weight.map(|weight| weight * 100.0))
                .collect(),
        )),
    );

    Ok(page)
}
