use stockdash_ai::CommentaryError;
use stockdash_core::{IndicatorError, PortfolioError, SourceError, SourceErrorKind, ValidationError};
use thiserror::Error;

/// Broad failure class used by hosts to pick an HTTP status or exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request itself is malformed.
    Validation,
    /// The view, symbol or data does not exist.
    NotFound,
    /// The market-data or commentary provider failed.
    Upstream,
    /// A required collaborator is not configured.
    Unavailable,
    Internal,
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),
    #[error(transparent)]
    Commentary(#[from] CommentaryError),
    #[error("unknown menu item '{value}'")]
    UnknownMenuItem { value: String },
    #[error("missing required parameter '{name}'")]
    MissingParameter { name: &'static str },
    #[error("invalid value '{value}' for parameter '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("no data returned for '{symbol}' in {range}")]
    EmptySeries { symbol: String, range: String },
    #[error("commentary was requested but no commentary provider is configured")]
    CommentaryUnavailable,
    #[error("portfolio has no holdings; add [[portfolio.holdings]] entries to the config")]
    NoHoldings,
    #[error("no holding has a target_weight; nothing to rebalance")]
    NoTargets,
}

impl DashboardError {
    pub fn invalid_parameter(
        name: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation.invalid",
            Self::Source(error) => error.code(),
            Self::Indicator(IndicatorError::EmptySeries { .. }) => "indicator.empty_series",
            Self::Indicator(IndicatorError::InvalidParameter { .. }) => "indicator.invalid_parameter",
            Self::Portfolio(error) => error.code(),
            Self::Commentary(error) => error.code(),
            Self::UnknownMenuItem { .. } => "menu.unknown_item",
            Self::MissingParameter { .. } => "request.missing_parameter",
            Self::InvalidParameter { .. } => "request.invalid_parameter",
            Self::EmptySeries { .. } => "view.empty_series",
            Self::CommentaryUnavailable => "commentary.unavailable",
            Self::NoHoldings => "portfolio.no_holdings",
            Self::NoTargets => "portfolio.no_targets",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_)
            | Self::Indicator(IndicatorError::InvalidParameter { .. })
            | Self::Portfolio(_)
            | Self::MissingParameter { .. }
            | Self::InvalidParameter { .. }
            | Self::NoHoldings
            | Self::NoTargets => ErrorClass::Validation,
            Self::Source(error) => match error.kind() {
                SourceErrorKind::NotFound => ErrorClass::NotFound,
                SourceErrorKind::InvalidRequest => ErrorClass::Validation,
                SourceErrorKind::Unavailable | SourceErrorKind::RateLimited => {
                    ErrorClass::Upstream
                }
                SourceErrorKind::Internal => ErrorClass::Internal,
            },
            Self::Indicator(IndicatorError::EmptySeries { .. })
            | Self::UnknownMenuItem { .. }
            | Self::EmptySeries { .. } => ErrorClass::NotFound,
            Self::Commentary(CommentaryError::MissingApiKey { .. }) | Self::CommentaryUnavailable => {
                ErrorClass::Unavailable
            }
            Self::Commentary(CommentaryError::InvalidRequest(_)) => ErrorClass::Internal,
            Self::Commentary(_) => ErrorClass::Upstream,
        }
    }
}
