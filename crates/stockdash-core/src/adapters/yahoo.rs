use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{BarsRequest, DataSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::{Bar, BarSeries, Interval, ProviderId, Symbol, UtcDateTime};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Yahoo Finance chart adapter (`/v8/finance/chart/{symbol}`).
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::default()))
    }
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn chart_endpoint(&self, req: &BarsRequest) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval={}&events=history&includePrePost=false",
            self.base_url,
            urlencoding::encode(req.symbol.as_str()),
            req.range.start_timestamp().unix_timestamp(),
            req.range.end_timestamp_exclusive().unix_timestamp(),
            yahoo_interval(req.interval),
        )
    }

    async fn fetch_bars(&self, req: BarsRequest) -> Result<BarSeries, SourceError> {
        let endpoint = self.chart_endpoint(&req);
        tracing::debug!(symbol = %req.symbol, range = %req.range, "requesting yahoo chart");

        let request = HttpRequest::get(endpoint)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            let what = if error.is_timeout() { "timed out" } else { "transport error" };
            SourceError::unavailable(format!("yahoo {what}: {}", error.message()))
        })?;

        if !response.is_success() {
            return Err(status_error(&req.symbol, &response));
        }

        let series = parse_chart(&req, &response.body)?;
        tracing::debug!(symbol = %req.symbol, bars = series.len(), "yahoo chart parsed");
        Ok(series)
    }
}

impl DataSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn bars<'a>(
        &'a self,
        req: BarsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_bars(req))
    }
}

const fn yahoo_interval(interval: Interval) -> &'static str {
    match interval {
        Interval::OneHour => "60m",
        Interval::OneDay => "1d",
        Interval::OneWeek => "1wk",
        Interval::OneMonth => "1mo",
    }
}

fn status_error(symbol: &Symbol, response: &HttpResponse) -> SourceError {
    let description = serde_json::from_str::<YahooChartResponse>(&response.body)
        .ok()
        .and_then(|payload| payload.chart.error)
        .map(|error| error.description);

    match response.status {
        404 => SourceError::not_found(format!(
            "yahoo has no data for '{symbol}': {}",
            description.unwrap_or_else(|| String::from("symbol not found"))
        )),
        429 => SourceError::rate_limited("yahoo rate limited the chart request"),
        status if status >= 500 => {
            SourceError::unavailable(format!("yahoo returned status {status}"))
        }
        status => SourceError::invalid_request(format!(
            "yahoo rejected chart request for '{symbol}' with status {status}{}",
            description
                .map(|text| format!(": {text}"))
                .unwrap_or_default()
        )),
    }
}

fn parse_chart(req: &BarsRequest, body: &str) -> Result<BarSeries, SourceError> {
    let payload: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = payload.chart.error {
        return Err(match error.code.as_str() {
            "Not Found" => SourceError::not_found(format!(
                "yahoo has no data for '{}': {}",
                req.symbol, error.description
            )),
            _ => SourceError::unavailable(format!(
                "yahoo chart API error {}: {}",
                error.code, error.description
            )),
        });
    }

    let result = payload
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::not_found(format!("yahoo returned no chart for '{}'", req.symbol)))?;

    let Some(timestamps) = result.timestamp else {
        return Ok(BarSeries::new(req.symbol.clone(), req.interval, Vec::new()));
    };
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::internal("yahoo chart has no quote block"))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0_usize;
    for (i, ts_value) in timestamps.into_iter().enumerate() {
        let ts = UtcDateTime::from_unix_timestamp(ts_value)
            .map_err(|e| SourceError::internal(format!("invalid yahoo timestamp: {e}")))?;
        if !req.range.contains(ts) {
            continue;
        }

        let row = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = row else {
            skipped += 1;
            continue;
        };

        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .and_then(|v| u64::try_from(v).ok());

        match Bar::new(ts, open, high, low, close, volume, None) {
            Ok(bar) => bars.push(bar),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(symbol = %req.symbol, skipped, "dropped incomplete yahoo rows");
    }

    Ok(BarSeries::new(req.symbol.clone(), req.interval, bars))
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::HttpError;
    use crate::DateRange;
    use std::sync::Mutex;

    const CHART_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "USD", "symbol": "AAPL"},
                "timestamp": [1704205800, 1704292200, 1704378600, 1704465000],
                "indicators": {
                    "quote": [{
                        "open":   [187.15, 184.22, null, 181.99],
                        "high":   [188.44, 185.88, 183.09, 182.76],
                        "low":    [183.89, 183.43, 180.88, 180.17],
                        "close":  [185.64, 184.25, 181.91, 181.18],
                        "volume": [82488700, 58414500, 71983600, 62303300]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    struct CannedHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl CannedHttpClient {
        fn new(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .iter()
                .map(|request| request.url.clone())
                .collect()
        }
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn request(symbol: &str) -> BarsRequest {
        BarsRequest::new(
            Symbol::parse(symbol).expect("valid symbol"),
            Interval::OneDay,
            DateRange::parse("2024-01-01", "2024-01-31").expect("valid range"),
        )
    }

    #[tokio::test]
    async fn parses_chart_and_skips_null_rows() {
        let client = Arc::new(CannedHttpClient::new(Ok(HttpResponse::ok_json(CHART_BODY))));
        let adapter = YahooAdapter::new(client.clone());

        let series = adapter.bars(request("aapl")).await.expect("chart parses");

        assert_eq!(series.symbol.as_str(), "AAPL");
        assert_eq!(series.closes(), vec![185.64, 184.25, 181.18]);
        assert_eq!(series.bars[0].volume, Some(82_488_700));
        assert!(series.is_chronological());

        let urls = client.recorded_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("/v8/finance/chart/AAPL?period1=1704067200"));
        assert!(urls[0].contains("period2=1706745600"));
        assert!(urls[0].contains("interval=1d"));
    }

    #[tokio::test]
    async fn not_found_status_maps_to_not_found_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let client = Arc::new(CannedHttpClient::new(Ok(HttpResponse::new(404, body))));
        let adapter = YahooAdapter::new(client);

        let error = adapter.bars(request("ZZZZ")).await.expect_err("must fail");

        assert_eq!(error.kind(), SourceErrorKind::NotFound);
        assert!(error.message().contains("delisted"));
    }

    #[tokio::test]
    async fn rate_limit_and_server_errors_are_classified() {
        let client = Arc::new(CannedHttpClient::new(Ok(HttpResponse::new(429, "Too Many Requests"))));
        let error = YahooAdapter::new(client)
            .bars(request("AAPL"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::RateLimited);

        let client = Arc::new(CannedHttpClient::new(Ok(HttpResponse::new(503, ""))));
        let error = YahooAdapter::new(client)
            .bars(request("AAPL"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable() {
        let client = Arc::new(CannedHttpClient::new(Err(HttpError::timeout("request timeout"))));
        let error = YahooAdapter::new(client)
            .bars(request("AAPL"))
            .await
            .expect_err("must fail");

        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("timeout"));
    }

    #[tokio::test]
    async fn chart_without_timestamps_is_an_empty_series() {
        let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let client = Arc::new(CannedHttpClient::new(Ok(HttpResponse::ok_json(body))));

        let series = YahooAdapter::new(client)
            .bars(request("AAPL"))
            .await
            .expect("empty chart parses");

        assert!(series.is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = Arc::new(CannedHttpClient::new(Ok(HttpResponse::ok_json("{}"))));
        let adapter = YahooAdapter::new(client).with_base_url("http://localhost:9000/");
        assert!(adapter
            .chart_endpoint(&request("SPY"))
            .starts_with("http://localhost:9000/v8/finance/chart/SPY?"));
    }
}
