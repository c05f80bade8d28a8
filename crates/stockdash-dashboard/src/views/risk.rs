use stockdash_core::{RiskConfig, SeriesStats};

use crate::page::{
    fmt_change, fmt_opt, fmt_percent, fmt_price, Alert, AlertLevel, Metric, Page, Table, Tone,
};
use crate::request::RiskParams;
use crate::{DashboardError, MenuItem, ViewContext};

/// Threshold breaches for one symbol, most severe first.
pub(crate) fn breaches(stats: &SeriesStats, limits: &RiskConfig) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if stats.current_drawdown >= limits.max_drawdown {
        alerts.push(Alert::new(
            AlertLevel::Critical,
            format!("{} drawdown", stats.symbol),
            format!(
                "{} is {} below its peak in range (limit {})",
                stats.symbol,
                fmt_percent(stats.current_drawdown),
                fmt_percent(limits.max_drawdown)
            ),
        ));
    }
    if let Some(change) = stats.last_change.filter(|change| *change <= -limits.daily_drop) {
        alerts.push(Alert::new(
            AlertLevel::Warning,
            format!("{} daily drop", stats.symbol),
            format!(
                "{} moved {} in the last session (limit -{})",
                stats.symbol,
                fmt_change(change),
                fmt_percent(limits.daily_drop)
            ),
        ));
    }
    if let Some(volatility) = stats.volatility.filter(|vol| *vol >= limits.volatility) {
        alerts.push(Alert::new(
            AlertLevel::Warning,
            format!("{} volatility", stats.symbol),
            format!(
                "{} annualized volatility is {} (limit {})",
                stats.symbol,
                fmt_percent(volatility),
                fmt_percent(limits.volatility)
            ),
        ));
    }
    alerts
}

pub(crate) async fn render(ctx: &ViewContext, params: &RiskParams) -> Result<Page, DashboardError> {
    let limits = ctx.config.risk;
    let mut rows = Vec::with_capacity(params.symbols.len());
    for symbol in &params.symbols {
        let series = ctx.fetch(symbol, params.interval, params.range).await?;
        if let Some(stats) = SeriesStats::from_series(&series) {
            let alerts = breaches(&stats, &limits);
            rows.push((stats, alerts));
        }
    }

    let critical = rows
        .iter()
        .flat_map(|(_, alerts)| alerts)
        .filter(|alert| alert.level == AlertLevel::Critical)
        .count();
    let warnings = rows
        .iter()
        .flat_map(|(_, alerts)| alerts)
        .filter(|alert| alert.level == AlertLevel::Warning)
        .count();

    let mut page = Page::new(MenuItem::RiskAlert, format!("Risk alerts ({})", params.range));
    page.push(Metric::new("Critical", critical.to_string()).with_tone(if critical > 0 {
        Tone::Negative
    } else {
        Tone::Neutral
    }));
    page.push(Metric::new("Warnings", warnings.to_string()).with_tone(if warnings > 0 {
        Tone::Negative
    } else {
        Tone::Neutral
    }));

    if critical + warnings == 0 {
        page.push(Alert::new(
            AlertLevel::Info,
            "All clear",
            format!("No risk thresholds breached across {} symbols", rows.len()),
        ));
    }
    let mut ordered: Vec<&Alert> = rows.iter().flat_map(|(_, alerts)| alerts).collect();
    ordered.sort_by(|a, b| b.level.cmp(&a.level));
    for alert in ordered {
        page.push(alert.clone());
    }

    let mut table = Table::new(
        "Risk statistics",
        ["Symbol", "Last close", "Drawdown", "Daily change", "Volatility", "Status"],
    );
    for (stats, alerts) in &rows {
        let status = alerts
            .iter()
            .map(|alert| alert.level)
            .max()
            .map_or("ok", |level| match level {
                AlertLevel::Critical => "critical",
                AlertLevel::Warning => "warning",
                AlertLevel::Info => "ok",
            });
        table.push_row(vec![
            stats.symbol.to_string(),
            fmt_price(stats.last_close),
            fmt_percent(stats.current_drawdown),
            fmt_opt(stats.last_change, fmt_change),
            fmt_opt(stats.volatility, fmt_percent),
            status.to_owned(),
        ]);
    }
    page.push(table);

    Ok(page)
}
