//! Behaviour tests for the dashboard views.
//!
//! Every scenario runs against the deterministic fixture provider and the
//! canned commentary provider, so no network access is needed.

use std::sync::Arc;

use stockdash_ai::{CannedCommentary, CommentaryError};
use stockdash_core::{DashboardConfig, FixtureAdapter};
use stockdash_dashboard::{
    AlertLevel, ChartKind, Dashboard, DashboardError, ErrorClass, MenuItem, Page, ViewArgs,
    ViewContext, ViewRequest, Widget,
};
use time::macros::date;

const CONFIG: &str = r#"
[watchlist]
symbols = ["AAPL", "MSFT", "NVDA", "SPY"]

[etf]
universe = ["SPY", "QQQ", "BND", "GLD", "TLT"]
top = 3

[portfolio]
cash = 5000.0

[[portfolio.holdings]]
symbol = "VTI"
shares = 50
cost_basis = 180.0
target_weight = 0.5

[[portfolio.holdings]]
symbol = "BND"
shares = 100
cost_basis = 80.0
target_weight = 0.3

[[portfolio.holdings]]
symbol = "GLD"
shares = 5
cost_basis = 150.0
"#;

fn dashboard_with(config: DashboardConfig) -> Dashboard {
    let ctx = ViewContext::new(Arc::new(FixtureAdapter::new()), Arc::new(config))
        .with_commentary(Arc::new(CannedCommentary));
    Dashboard::new(ctx)
}

fn dashboard() -> Dashboard {
    dashboard_with(DashboardConfig::from_toml_str(CONFIG).expect("test config"))
}

fn first_half_of_2024() -> ViewArgs {
    ViewArgs {
        start: Some("2024-01-01".into()),
        end: Some("2024-06-28".into()),
        ..ViewArgs::default()
    }
}

async fn render(dashboard: &Dashboard, item: MenuItem, args: ViewArgs) -> Result<Page, DashboardError> {
    let request = ViewRequest::resolve(
        item,
        &args,
        &dashboard.context().config,
        date!(2024 - 06 - 28),
    )?;
    dashboard.render(&request).await
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test]
async fn every_menu_label_renders_its_own_view() {
    // Given: a dashboard backed by fixture data
    let dashboard = dashboard();

    for item in MenuItem::ALL {
        // When: the user selects the menu entry by its label
        let selected: MenuItem = item.label().parse().expect("label parses");
        let page = render(&dashboard, selected, first_half_of_2024())
            .await
            .unwrap_or_else(|error| panic!("{} failed: {error}", item.slug()));

        // Then: exactly that view is rendered
        assert_eq!(page.view, item, "page for {}", item.label());
        assert!(!page.widgets.is_empty(), "{} rendered no widgets", item.slug());
    }
}

#[test]
fn unknown_menu_label_is_rejected_instead_of_falling_back() {
    let err = "Options Chain".parse::<MenuItem>().expect_err("must fail");
    assert_eq!(err.code(), "menu.unknown_item");
    assert_eq!(err.class(), ErrorClass::NotFound);
}

// =============================================================================
// Individual stock
// =============================================================================

#[tokio::test]
async fn stock_chart_dates_never_decrease() {
    // Given: a valid ticker and range
    let args = ViewArgs {
        symbol: Some("NVDA".into()),
        ..first_half_of_2024()
    };

    // When: the stock view renders
    let page = render(&dashboard(), MenuItem::Stock, args).await.expect("page");

    // Then: every chart's x axis is chronological and aligned with its series
    let charts: Vec<_> = page.charts().collect();
    assert!(charts.iter().any(|chart| chart.kind == ChartKind::Candlestick));
    for chart in charts {
        assert!(chart.x.windows(2).all(|pair| pair[0] <= pair[1]));
        for series in &chart.series {
            assert_eq!(series.values.len(), chart.x.len(), "series {}", series.name);
        }
    }
}

#[tokio::test]
async fn unknown_ticker_surfaces_not_found() {
    let args = ViewArgs {
        symbol: Some("ZZZZ".into()),
        ..first_half_of_2024()
    };

    let err = render(&dashboard(), MenuItem::Stock, args)
        .await
        .expect_err("unknown ticker must fail");

    assert_eq!(err.code(), "source.not_found");
    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[tokio::test]
async fn identical_requests_give_identical_indicator_values() {
    let dashboard = dashboard();
    let args = ViewArgs {
        symbol: Some("MSFT".into()),
        commentary: Some(true),
        ..first_half_of_2024()
    };

    let first = render(&dashboard, MenuItem::Stock, args.clone()).await.expect("first");
    let second = render(&dashboard, MenuItem::Stock, args).await.expect("second");

    assert_eq!(first, second);
}

#[tokio::test]
async fn commentary_is_rendered_verbatim_when_requested() {
    let args = ViewArgs {
        symbol: Some("AAPL".into()),
        commentary: Some(true),
        ..first_half_of_2024()
    };

    let page = render(&dashboard(), MenuItem::Stock, args).await.expect("page");

    let commentary = page.commentary().expect("commentary widget");
    assert_eq!(commentary.model, "canned");
    assert!(commentary.text.contains("AAPL"));
}

#[tokio::test]
async fn commentary_without_a_provider_is_unavailable() {
    let ctx = ViewContext::new(
        Arc::new(FixtureAdapter::new()),
        Arc::new(DashboardConfig::default()),
    );
    let dashboard = Dashboard::new(ctx);
    let args = ViewArgs {
        symbol: Some("AAPL".into()),
        commentary: Some(true),
        ..first_half_of_2024()
    };

    let err = render(&dashboard, MenuItem::Stock, args)
        .await
        .expect_err("must fail");

    assert_eq!(err.class(), ErrorClass::Unavailable);
}

#[tokio::test]
async fn commentary_reports_why_the_provider_is_missing() {
    let ctx = ViewContext::new(
        Arc::new(FixtureAdapter::new()),
        Arc::new(DashboardConfig::default()),
    )
    .without_commentary(CommentaryError::MissingApiKey {
        env: "OPENAI_API_KEY".into(),
    });
    let args = ViewArgs {
        symbol: Some("AAPL".into()),
        commentary: Some(true),
        ..first_half_of_2024()
    };

    let err = render(&Dashboard::new(ctx), MenuItem::Stock, args)
        .await
        .expect_err("must fail");

    assert_eq!(err.code(), "commentary.missing_key");
    assert_eq!(err.class(), ErrorClass::Unavailable);
    assert!(err.to_string().contains("OPENAI_API_KEY"));
}

// =============================================================================
// Scanner, ETF, returns
// =============================================================================

#[tokio::test]
async fn scanner_sorted_by_symbol_lists_tickers_alphabetically() {
    let args = ViewArgs {
        sort: Some("symbol".into()),
        ..first_half_of_2024()
    };

    let page = render(&dashboard(), MenuItem::Scanner, args).await.expect("page");

    let table = page.tables().next().expect("results table");
    let symbols = table.column("Symbol").expect("symbol column");
    assert_eq!(symbols, ["AAPL", "MSFT", "NVDA", "SPY"]);
}

#[tokio::test]
async fn etf_ranking_respects_top_n_and_descending_scores() {
    let page = render(&dashboard(), MenuItem::EtfRecommender, first_half_of_2024())
        .await
        .expect("page");

    let table = page.tables().next().expect("ranking table");
    assert_eq!(table.rows.len(), 3);
    let scores: Vec<f64> = table
        .column("Score")
        .expect("score column")
        .iter()
        .map(|cell| cell.parse().expect("numeric score"))
        .collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn return_tracker_includes_benchmark_series() {
    let args = ViewArgs {
        symbols: Some("AAPL,MSFT".into()),
        benchmark: Some("SPY".into()),
        ..first_half_of_2024()
    };

    let page = render(&dashboard(), MenuItem::ReturnTracker, args).await.expect("page");

    let chart = page.charts().next().expect("returns chart");
    assert!(chart.series_named("SPY").is_some());
    let aapl = chart.series_named("AAPL").expect("aapl series");
    assert_eq!(aapl.values.first().copied().flatten(), Some(0.0));
}

// =============================================================================
// Portfolio, risk, rebalance
// =============================================================================

#[tokio::test]
async fn portfolio_weights_and_cash_sum_to_one_hundred_percent() {
    let page = render(&dashboard(), MenuItem::Portfolio, first_half_of_2024())
        .await
        .expect("page");

    let chart = page.charts().next().expect("allocation chart");
    let total: f64 = chart.series[0].values.iter().flatten().sum();
    assert!((total - 100.0).abs() < 1e-6, "weights sum to {total}");
    assert_eq!(chart.x.last().map(String::as_str), Some("Cash"));
}

#[tokio::test]
async fn tight_risk_limits_raise_alerts() {
    let mut config = DashboardConfig::from_toml_str(CONFIG).expect("config");
    config.risk.volatility = 0.0;

    let page = render(&dashboard_with(config), MenuItem::RiskAlert, first_half_of_2024())
        .await
        .expect("page");

    assert!(page.alerts().any(|alert| alert.level == AlertLevel::Warning));
    assert!(page.alerts().all(|alert| alert.level != AlertLevel::Info));
}

#[tokio::test]
async fn loose_rebalance_tolerance_reports_on_target() {
    let args = ViewArgs {
        tolerance: Some(1.0),
        ..first_half_of_2024()
    };

    let page = render(&dashboard(), MenuItem::Rebalance, args).await.expect("page");

    let alerts: Vec<_> = page.alerts().collect();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Info);
}

#[tokio::test]
async fn zero_tolerance_warns_once_per_drifted_holding() {
    // Given: no drift is tolerated
    let args = ViewArgs {
        tolerance: Some(0.0),
        ..first_half_of_2024()
    };

    // When: the rebalancing reminder renders
    let page = render(&dashboard(), MenuItem::Rebalance, args).await.expect("page");

    // Then: each targeted holding gets one warning; GLD has no target
    let alerts: Vec<_> = page.alerts().collect();
    assert!(alerts.iter().all(|alert| alert.level == AlertLevel::Warning));
    let mut titled: Vec<&str> = alerts
        .iter()
        .filter_map(|alert| alert.title.split_whitespace().next())
        .collect();
    titled.sort_unstable();
    assert_eq!(titled, ["BND", "VTI"]);

    // And: each message states the trade that restores the target
    let table = page.tables().next().expect("drift table");
    let symbols = table.column("Symbol").expect("symbol column");
    let actions = table.column("Action").expect("action column");
    let shares = table.column("Shares").expect("shares column");
    for alert in &alerts {
        let symbol = alert.title.split_whitespace().next().expect("symbol");
        let row = symbols.iter().position(|cell| *cell == symbol).expect("row");
        let verb = match actions[row] {
            "buy" => "Buy",
            "sell" => "Sell",
            other => panic!("unexpected action {other}"),
        };
        let share_count = shares[row].trim_start_matches('-');
        assert!(
            alert
                .message
                .starts_with(&format!("{verb} {share_count} shares of {symbol}")),
            "message: {}",
            alert.message
        );
    }
}

#[tokio::test]
async fn rebalance_without_targets_is_a_validation_error() {
    let err = render(
        &dashboard_with(DashboardConfig::default()),
        MenuItem::Rebalance,
        first_half_of_2024(),
    )
    .await
    .expect_err("must fail");

    assert_eq!(err.code(), "portfolio.no_holdings");
    assert_eq!(err.class(), ErrorClass::Validation);
}

#[tokio::test]
async fn pages_serialize_with_tagged_widgets() {
    let page = render(&dashboard(), MenuItem::RiskAlert, first_half_of_2024())
        .await
        .expect("page");

    let json = serde_json::to_value(&page).expect("json");
    assert_eq!(json["view"], "risk");
    assert!(json["widgets"]
        .as_array()
        .expect("widgets")
        .iter()
        .all(|widget| widget["type"].is_string()));
    assert!(page
        .widgets
        .iter()
        .any(|widget| matches!(widget, Widget::Table(_))));
}
