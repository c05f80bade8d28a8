//! Market-data source trait and request/error types.
//!
//! Every view fetches price history through [`DataSource::bars`]. Adapters
//! translate provider payloads into the canonical [`BarSeries`] and classify
//! failures into [`SourceError`] kinds; they never retry or fall back.
//!
//! ```rust,ignore
//! use stockdash_core::{
//!     BarsRequest, DataSource, DateRange, FixtureAdapter, Interval, SourceError, Symbol,
//! };
//!
//! async fn last_close(adapter: &FixtureAdapter) -> Result<f64, SourceError> {
//!     let request = BarsRequest::new(
//!         Symbol::parse("AAPL")?,
//!         Interval::OneDay,
//!         DateRange::parse("2024-01-01", "2024-03-31")?,
//!     );
//!     let series = adapter.bars(request).await?;
//!     Ok(series.latest().map(|bar| bar.close).unwrap_or_default())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{BarSeries, DateRange, Interval, ProviderId, Symbol, ValidationError};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    NotFound,
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured error returned by market-data adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_request(error.to_string())
    }
}

/// Request payload for bar endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarsRequest {
    pub symbol: Symbol,
    pub interval: Interval,
    pub range: DateRange,
}

impl BarsRequest {
    pub fn new(symbol: Symbol, interval: Interval, range: DateRange) -> Self {
        Self {
            symbol,
            interval,
            range,
        }
    }
}

/// Market-data adapter contract.
///
/// Implementations must be `Send + Sync`; the web host shares one adapter
/// across request handlers.
pub trait DataSource: Send + Sync {
    /// Returns the provider identifier recorded in envelope metadata.
    fn id(&self) -> ProviderId;

    /// Fetches OHLCV bars for the requested symbol, interval and date range.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if:
    /// - the symbol is unknown to the provider (`NotFound`)
    /// - the provider is unreachable or answers with a server error
    /// - the payload cannot be parsed
    fn bars<'a>(
        &'a self,
        req: BarsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_namespaced() {
        assert_eq!(SourceError::not_found("x").code(), "source.not_found");
        assert_eq!(SourceError::rate_limited("x").code(), "source.rate_limited");
        assert_eq!(
            SourceError::unavailable("down").to_string(),
            "down (source.unavailable)"
        );
    }

    #[test]
    fn validation_errors_become_invalid_requests() {
        let error = SourceError::from(ValidationError::EmptySymbol);
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
    }
}
