use stockdash_ai::prompt;
use stockdash_core::SeriesStats;

use crate::page::{
    fmt_change, fmt_opt, fmt_percent, Chart, ChartKind, ChartSeries, Metric, Page, Pane, Table,
    Widget,
};
use crate::request::EtfParams;
use crate::{DashboardError, MenuItem, ViewContext};

/// `annualized return - lambda * volatility`. A range too short to annualize
/// scores its total return, and one too short for volatility has no penalty.
pub(crate) fn score(stats: &SeriesStats, lambda: f64) -> f64 {
    let ret = stats.annualized_return.unwrap_or(stats.total_return);
    ret - lambda * stats.volatility.unwrap_or(0.0)
}

pub(crate) async fn render(ctx: &ViewContext, params: &EtfParams) -> Result<Page, DashboardError> {
    let lambda = params.profile.lambda(&ctx.config.etf.lambda);
    let mut ranked = Vec::with_capacity(ctx.config.etf.universe.len());
    for symbol in &ctx.config.etf.universe {
        let series = ctx.fetch(symbol, params.interval, params.range).await?;
        if let Some(stats) = SeriesStats::from_series(&series) {
            let score = score(&stats, lambda);
            ranked.push((stats, score));
        }
    }
    ranked.sort_by(|(a, a_score), (b, b_score)| {
        b_score
            .total_cmp(a_score)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ranked.truncate(params.top);

    let mut page = Page::new(
        MenuItem::EtfRecommender,
        format!("ETF picks for a {} profile ({})", params.profile, params.range),
    );
    page.push(Widget::text(format!(
        "Score = annualized return - {lambda:.2} x annualized volatility"
    )));
    if let Some((best, best_score)) = ranked.first() {
        page.push(Metric::new("Top pick", best.symbol.to_string()));
        page.push(Metric::new("Top score", format!("{best_score:.3}")));
    }

    let mut table = Table::new(
        "Ranking",
        ["Rank", "Symbol", "Ann. return", "Volatility", "Max drawdown", "Score"],
    );
    for (rank, (stats, score)) in ranked.iter().enumerate() {
        table.push_row(vec![
            (rank + 1).to_string(),
            stats.symbol.to_string(),
            fmt_opt(stats.annualized_return, fmt_change),
            fmt_opt(stats.volatility, fmt_percent),
            fmt_percent(stats.max_drawdown),
            format!("{score:.3}"),
        ]);
    }
    page.push(table);

    page.push(
        Chart::new(
            "Score",
            ChartKind::Bar,
            ranked.iter().map(|(stats, _)| stats.symbol.to_string()).collect(),
        )
        .with_series(ChartSeries::bars(
            "Score",
            Pane::Price,
            ranked.iter().map(|(_, score)| Some(*score)).collect(),
        )),
    );

    if params.commentary {
        let provider = ctx.commentary_provider()?;
        let commentary = provider
            .complete(&prompt::etf(params.profile.as_str(), params.range, &ranked))
            .await?;
        page.push(commentary);
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdash_core::Symbol;

    fn stats(annual: Option<f64>, volatility: Option<f64>) -> SeriesStats {
        SeriesStats {
            symbol: Symbol::parse("VTI").expect("symbol"),
            bars: 100,
            first_close: 1.0,
            last_close: 1.0,
            total_return: 0.02,
            annualized_return: annual,
            volatility,
            max_drawdown: 0.0,
            current_drawdown: 0.0,
            last_change: None,
            last_volume: None,
        }
    }

    #[test]
    fn score_penalizes_volatility_by_lambda() {
        let s = stats(Some(0.10), Some(0.20));
        assert!((score(&s, 0.5) - 0.0).abs() < 1e-12);
        assert!((score(&s, 0.25) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn short_range_scores_total_return_without_compounding() {
        let s = stats(None, Some(0.20));
        assert!((score(&s, 0.5) - (0.02 - 0.10)).abs() < 1e-12);
    }

    #[test]
    fn short_series_falls_back_to_total_return() {
        assert!((score(&stats(None, None), 1.5) - 0.02).abs() < 1e-12);
    }
}
