//! View branches, one module per menu item. Every branch fetches its data
//! sequentially and returns on the first failure.

mod etf;
mod portfolio;
mod rebalance;
mod returns;
mod risk;
mod scanner;
mod stock;

use std::collections::BTreeMap;

use stockdash_core::{DateRange, Symbol};

use crate::page::Page;
use crate::request::ViewRequest;
use crate::{DashboardError, ViewContext};

pub(crate) async fn render(ctx: &ViewContext, request: &ViewRequest) -> Result<Page, DashboardError> {
    match request {
        ViewRequest::Stock(params) => stock::render(ctx, params).await,
        ViewRequest::Scanner(params) => scanner::render(ctx, params).await,
        ViewRequest::Portfolio(params) => portfolio::render(ctx, params).await,
        ViewRequest::EtfRecommender(params) => etf::render(ctx, params).await,
        ViewRequest::ReturnTracker(params) => returns::render(ctx, params).await,
        ViewRequest::RiskAlert(params) => risk::render(ctx, params).await,
        ViewRequest::Rebalance(params) => rebalance::render(ctx, params).await,
    }
}

/// Last close in `range` for each symbol, fetched at the configured default interval.
pub(crate) async fn latest_prices(
    ctx: &ViewContext,
    symbols: &[Symbol],
    range: DateRange,
) -> Result<BTreeMap<Symbol, f64>, DashboardError> {
    let mut prices = BTreeMap::new();
    for symbol in symbols {
        let series = ctx
            .fetch(symbol, ctx.config.defaults.interval, range)
            .await?;
        if let Some(bar) = series.latest() {
            prices.insert(symbol.clone(), bar.close);
        }
    }
    Ok(prices)
}
