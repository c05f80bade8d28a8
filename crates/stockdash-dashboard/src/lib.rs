//! Menu-driven market dashboard.
//!
//! A host picks a [`MenuItem`], resolves its arguments into a
//! [`ViewRequest`] and asks [`Dashboard::render`] for a [`Page`]:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockdash_core::{DashboardConfig, FixtureAdapter};
//! use stockdash_dashboard::{Dashboard, MenuItem, ViewArgs, ViewContext};
//!
//! let ctx = ViewContext::new(Arc::new(FixtureAdapter::new()), Arc::new(DashboardConfig::default()));
//! let dashboard = Dashboard::new(ctx);
//! let page = dashboard.render_args(MenuItem::Scanner, &ViewArgs::default()).await?;
//! assert_eq!(page.view, MenuItem::Scanner);
//! ```
//!
//! Renders are stateless: nothing is cached between calls and the same
//! request against the same data yields the same page.

mod context;
mod error;
mod menu;
pub mod page;
pub mod request;
mod views;

use std::time::Instant;

use stockdash_core::UtcDateTime;

pub use context::ViewContext;
pub use error::{DashboardError, ErrorClass};
pub use menu::{menu_entries, MenuEntry, MenuItem};
pub use page::{Alert, AlertLevel, Chart, ChartKind, ChartSeries, Metric, Page, Pane, Table, Widget};
pub use request::{RiskProfile, ScanFilter, ScanSort, ViewArgs, ViewRequest};

/// Dispatches view requests to their renderers.
#[derive(Debug, Clone)]
pub struct Dashboard {
    ctx: ViewContext,
}

impl Dashboard {
    pub fn new(ctx: ViewContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    /// Renders exactly the view named by `request`.
    pub async fn render(&self, request: &ViewRequest) -> Result<Page, DashboardError> {
        let item = request.item();
        let started = Instant::now();
        tracing::info!(view = item.slug(), "rendering view");

        let result = views::render(&self.ctx, request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(page) => tracing::info!(
                view = item.slug(),
                widgets = page.widgets.len(),
                elapsed_ms,
                "view rendered"
            ),
            Err(error) => tracing::debug!(
                view = item.slug(),
                code = error.code(),
                %error,
                elapsed_ms,
                "view failed"
            ),
        }
        result
    }

    /// Resolves raw arguments against today's date, then renders.
    pub async fn render_args(&self, item: MenuItem, args: &ViewArgs) -> Result<Page, DashboardError> {
        let today = UtcDateTime::now().date();
        let request = ViewRequest::resolve(item, args, &self.ctx.config, today)?;
        self.render(&request).await
    }
}
