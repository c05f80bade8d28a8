//! HTTP host for the dashboard.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | single-page dashboard (HTML, CSS and JS inline) |
//! | `GET /health` | `{"status":"ok"}` |
//! | `GET /api/menu` | envelope of [`MenuEntry`] |
//! | `GET /api/views/:view` | envelope of [`Page`], arguments in the query string |
//!
//! Errors are returned as `{code, message}` with a status derived from the
//! dashboard error class; see [`ApiError`].

mod error;
mod ui;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::Method;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use stockdash_core::{Envelope, EnvelopeMeta};
use stockdash_dashboard::{menu_entries, Dashboard, MenuEntry, MenuItem, Page, ViewArgs};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use error::ApiError;
pub use ui::dashboard_html;

#[derive(Debug, Clone)]
struct AppState {
    dashboard: Arc<Dashboard>,
}

/// Builds the application router around a shared dashboard.
pub fn router(dashboard: Dashboard) -> Router {
    let state = AppState {
        dashboard: Arc::new(dashboard),
    };
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/menu", get(menu))
        .route("/api/views/:view", get(view))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: &str, dashboard: Dashboard) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "dashboard listening");
    axum::serve(listener, router(dashboard)).await
}

async fn index() -> Html<String> {
    Html(dashboard_html())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn menu(State(state): State<AppState>) -> Result<Json<Envelope<Vec<MenuEntry>>>, ApiError> {
    let meta = metadata(&state, 0)?;
    Ok(Json(Envelope::success(meta, menu_entries())))
}

async fn view(
    State(state): State<AppState>,
    Path(view): Path<String>,
    query: Result<Query<ViewArgs>, QueryRejection>,
) -> Result<Json<Envelope<Page>>, ApiError> {
    let started = Instant::now();
    let item: MenuItem = view.parse()?;
    let Query(args) = query.map_err(|rejection| ApiError::Query(rejection.body_text()))?;

    let page = state.dashboard.render_args(item, &args).await?;
    let meta = metadata(&state, started.elapsed().as_millis() as u64)?;
    Ok(Json(Envelope::success(meta, page)))
}

fn metadata(state: &AppState, latency_ms: u64) -> Result<EnvelopeMeta, ApiError> {
    let source = state.dashboard.context().source.id();
    EnvelopeMeta::new(Uuid::new_v4().hyphenated().to_string(), vec![source], latency_ms)
        .and_then(|meta| meta.with_trace_id(Uuid::new_v4().simple().to_string()))
        .map_err(|error| ApiError::Metadata(error.to_string()))
}
