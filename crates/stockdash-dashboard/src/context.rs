use std::sync::Arc;

use stockdash_ai::{CommentaryError, CommentaryProvider};
use stockdash_core::{
    BarSeries, BarsRequest, DashboardConfig, DataSource, DateRange, Interval, Symbol,
};

use crate::DashboardError;

/// Immutable collaborators shared by every view render.
#[derive(Clone)]
pub struct ViewContext {
    pub source: Arc<dyn DataSource>,
    pub commentary: Option<Arc<dyn CommentaryProvider>>,
    /// Why no provider could be built; reported when commentary is requested.
    pub commentary_error: Option<CommentaryError>,
    pub config: Arc<DashboardConfig>,
}

impl ViewContext {
    pub fn new(source: Arc<dyn DataSource>, config: Arc<DashboardConfig>) -> Self {
        Self {
            source,
            commentary: None,
            commentary_error: None,
            config,
        }
    }

    pub fn with_commentary(mut self, provider: Arc<dyn CommentaryProvider>) -> Self {
        self.commentary = Some(provider);
        self.commentary_error = None;
        self
    }

    pub fn without_commentary(mut self, reason: CommentaryError) -> Self {
        self.commentary = None;
        self.commentary_error = Some(reason);
        self
    }

    /// Fetches bars and rejects an empty series.
    pub async fn fetch(
        &self,
        symbol: &Symbol,
        interval: Interval,
        range: DateRange,
    ) -> Result<BarSeries, DashboardError> {
        let request = BarsRequest::new(symbol.clone(), interval, range);
        let series = self.source.bars(request).await.map_err(|error| {
            tracing::debug!(%symbol, %range, code = error.code(), "bar fetch failed");
            error
        })?;
        if series.is_empty() {
            return Err(DashboardError::EmptySeries {
                symbol: symbol.to_string(),
                range: range.to_string(),
            });
        }
        tracing::debug!(%symbol, bars = series.len(), "bars fetched");
        Ok(series)
    }

    pub fn commentary_provider(&self) -> Result<&dyn CommentaryProvider, DashboardError> {
        match (&self.commentary, &self.commentary_error) {
            (Some(provider), _) => Ok(provider.as_ref()),
            (None, Some(reason)) => Err(DashboardError::Commentary(reason.clone())),
            (None, None) => Err(DashboardError::CommentaryUnavailable),
        }
    }
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext")
            .field("source", &self.source.id())
            .field(
                "commentary",
                &self.commentary.as_ref().map(|provider| provider.model()),
            )
            .finish_non_exhaustive()
    }
}
