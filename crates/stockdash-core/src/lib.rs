//! Core contracts for stockdash.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The [`DataSource`] trait with Yahoo and fixture adapters
//! - Technical indicators, return/risk analytics and portfolio arithmetic
//! - Dashboard configuration and the response envelope
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | symbols, intervals, date ranges, bars |
//! | [`data_source`] | provider trait, requests, classified errors |
//! | [`adapters`] | [`YahooAdapter`], [`FixtureAdapter`] |
//! | [`indicators`] | SMA, EMA, RSI, MACD, Bollinger via `ta` |
//! | [`analytics`] | returns, volatility, drawdown |
//! | [`portfolio`] | holdings, valuation, rebalancing |
//! | [`config`] | TOML configuration |
//! | [`envelope`] | `{meta, data, errors}` wrapper |

pub mod adapters;
pub mod analytics;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod indicators;
pub mod portfolio;
pub mod source;

pub use adapters::{FixtureAdapter, YahooAdapter};
pub use analytics::SeriesStats;
pub use config::{
    AiConfig, ConfigError, DashboardConfig, DefaultsConfig, EtfConfig, ProviderConfig,
    RebalanceConfig, RiskConfig, RiskLambdas, ScannerConfig, ServerConfig, WatchlistConfig,
};
pub use data_source::{BarsRequest, DataSource, SourceError, SourceErrorKind};
pub use domain::{
    format_date, parse_date, Bar, BarSeries, DateRange, Interval, Symbol, UtcDateTime,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::ValidationError;
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use indicators::{IndicatorConfig, IndicatorError, IndicatorFrame, IndicatorRow};
pub use portfolio::{
    Holding, Portfolio, PortfolioError, PositionValue, RebalanceAction, RebalanceLine, Valuation,
};
pub use source::ProviderId;

use std::sync::Arc;

/// Builds the market-data source selected by `config`.
pub fn build_source(config: &ProviderConfig) -> Arc<dyn DataSource> {
    match config.source {
        ProviderId::Fixture => Arc::new(FixtureAdapter::new()),
        ProviderId::Yahoo => {
            let mut adapter = YahooAdapter::default().with_timeout_ms(config.timeout_ms);
            if let Some(base_url) = &config.base_url {
                adapter = adapter.with_base_url(base_url.clone());
            }
            Arc::new(adapter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_source_honours_provider_choice() {
        let fixture = build_source(&ProviderConfig {
            source: ProviderId::Fixture,
            ..ProviderConfig::default()
        });
        assert_eq!(fixture.id(), ProviderId::Fixture);
        assert_eq!(build_source(&ProviderConfig::default()).id(), ProviderId::Yahoo);
    }
}
