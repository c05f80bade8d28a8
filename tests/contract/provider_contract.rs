//! Contract every `DataSource` must honour, checked against the fixture
//! provider and against the Yahoo adapter over a canned transport.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use stockdash_core::{
    BarsRequest, DataSource, DateRange, FixtureAdapter, HttpClient, HttpError, HttpRequest,
    HttpResponse, Interval, ProviderId, SourceErrorKind, Symbol, YahooAdapter,
};

const CHART_BODY: &str = r#"{
    "chart": {
        "result": [{
            "meta": {"currency": "USD", "symbol": "MSFT"},
            "timestamp": [1703860200, 1704205800, 1704292200, 1704378600],
            "indicators": {
                "quote": [{
                    "open":   [375.37, 373.86, 369.01, 370.67],
                    "high":   [376.04, 375.90, 373.26, 372.06],
                    "low":    [372.81, 366.77, 368.51, 366.50],
                    "close":  [376.04, 370.87, 370.60, 367.94],
                    "volume": [18730000, 25258600, 23083500, 20901500]
                }]
            }
        }],
        "error": null
    }
}"#;

const NOT_FOUND_BODY: &str = r#"{
    "chart": {
        "result": null,
        "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
    }
}"#;

struct StaticHttpClient {
    status: u16,
    body: &'static str,
}

impl HttpClient for StaticHttpClient {
    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = HttpResponse::new(self.status, self.body);
        Box::pin(async move { Ok(response) })
    }
}

fn yahoo(status: u16, body: &'static str) -> YahooAdapter {
    YahooAdapter::new(Arc::new(StaticHttpClient { status, body }))
}

fn request(symbol: &str, start: &str, end: &str) -> BarsRequest {
    BarsRequest::new(
        Symbol::parse(symbol).expect("valid symbol"),
        Interval::OneDay,
        DateRange::parse(start, end).expect("valid range"),
    )
}

async fn assert_bars_contract(source: &dyn DataSource, req: BarsRequest) {
    let series = source.bars(req.clone()).await.expect("bars for a known symbol");

    assert_eq!(series.symbol, req.symbol, "{} echoes the symbol", source.id());
    assert_eq!(series.interval, req.interval);
    assert!(!series.is_empty(), "{} returned no bars", source.id());
    assert!(series.is_chronological(), "{} bars out of order", source.id());
    for bar in &series.bars {
        assert!(req.range.contains(bar.ts), "{} bar outside range", source.id());
        assert!(bar.low <= bar.high);
        assert!(bar.close > 0.0);
    }
}

#[tokio::test]
async fn fixture_provider_honours_the_bars_contract() {
    let adapter = FixtureAdapter::new();
    assert_eq!(adapter.id(), ProviderId::Fixture);

    for symbol in FixtureAdapter::catalog() {
        assert_bars_contract(
            &adapter,
            request(symbol.as_str(), "2024-01-01", "2024-03-31"),
        )
        .await;
    }
}

#[tokio::test]
async fn yahoo_adapter_honours_the_bars_contract() {
    let adapter = yahoo(200, CHART_BODY);
    assert_eq!(adapter.id(), ProviderId::Yahoo);

    assert_bars_contract(&adapter, request("MSFT", "2024-01-01", "2024-01-31")).await;
}

#[tokio::test]
async fn yahoo_drops_bars_outside_the_requested_range() {
    let series = yahoo(200, CHART_BODY)
        .bars(request("MSFT", "2024-01-01", "2024-01-31"))
        .await
        .expect("chart parses");

    assert_eq!(series.len(), 3);
}

#[tokio::test]
async fn unknown_symbols_are_not_found_for_every_provider() {
    let fixture = FixtureAdapter::new();
    let remote = yahoo(404, NOT_FOUND_BODY);
    let sources: [&dyn DataSource; 2] = [&fixture, &remote];

    for source in sources {
        let error = source
            .bars(request("ZZZZ", "2024-01-01", "2024-01-31"))
            .await
            .expect_err("unknown symbol must fail");

        assert_eq!(error.kind(), SourceErrorKind::NotFound, "{}", source.id());
        assert_eq!(error.code(), "source.not_found");
    }
}

#[tokio::test]
async fn upstream_failures_are_not_hidden() {
    let error = yahoo(503, "")
        .bars(request("MSFT", "2024-01-01", "2024-01-31"))
        .await
        .expect_err("server error must surface");
    assert_eq!(error.kind(), SourceErrorKind::Unavailable);

    let error = yahoo(429, "")
        .bars(request("MSFT", "2024-01-01", "2024-01-31"))
        .await
        .expect_err("rate limit must surface");
    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
}
