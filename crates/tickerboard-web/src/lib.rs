//! # Tickerboard Web
//!
//! Serves the dashboard page and the JSON API it talks to.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | Dashboard page (dropdown, chart, quote table, news list) |
//! | `GET /api/symbols` | Dropdown options and default selection |
//! | `GET /api/dashboard?symbol=XYZ` | [`DashboardView`] for one selection |

mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};
use tickerboard_core::{DashboardService, DashboardView, Symbol};
use tower_http::cors::CorsLayer;

pub use error::ApiError;

const DASHBOARD_PAGE: &str = include_str!("../static/dashboard.html");

/// Shared handler state: the dashboard service owns the catalog.
#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(dashboard: DashboardService) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

/// Dropdown option as the page expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolsResponse {
    pub options: Vec<DropdownOption>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    symbol: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/symbols", get(symbols))
        .route("/api/dashboard", get(dashboard))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("dashboard running at http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler: run until the process is killed
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn index() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

async fn symbols(State(state): State<AppState>) -> Json<SymbolsResponse> {
    let catalog = state.dashboard.catalog();
    Json(SymbolsResponse {
        options: catalog
            .entries()
            .iter()
            .map(|entry| DropdownOption {
                label: entry.name.clone(),
                value: entry.symbol.to_string(),
            })
            .collect(),
        value: catalog.default_symbol().map(Symbol::to_string),
    })
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let raw = query
        .symbol
        .filter(|value| !value.trim().is_empty())
        .ok_or(ApiError::MissingSymbol)?;
    let symbol = Symbol::parse(&raw)?;

    let view = state.dashboard.render(&symbol).await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tickerboard_core::{
        ListingRow, MarketData, NewsItem, QuoteTable, SeriesOutcome, SourceError, SourceFuture,
        SymbolCatalog, SymbolOverview,
    };
    use tower::ServiceExt;

    /// Provider that must never be called.
    struct UnreachableProvider;

    impl MarketData for UnreachableProvider {
        fn listing_status(&self) -> SourceFuture<'_, Vec<ListingRow>> {
            Box::pin(async { Err(SourceError::unavailable("unexpected listing call")) })
        }

        fn daily_adjusted<'a>(&'a self, _symbol: &'a Symbol) -> SourceFuture<'a, SeriesOutcome> {
            Box::pin(async { Err(SourceError::unavailable("unexpected series call")) })
        }

        fn global_quote<'a>(&'a self, _symbol: &'a Symbol) -> SourceFuture<'a, QuoteTable> {
            Box::pin(async { Err(SourceError::unavailable("unexpected quote call")) })
        }

        fn news_sentiment<'a>(&'a self, _symbol: &'a Symbol) -> SourceFuture<'a, Vec<NewsItem>> {
            Box::pin(async { Err(SourceError::unavailable("unexpected news call")) })
        }

        fn symbol_overview<'a>(
            &'a self,
            _symbol: &'a Symbol,
        ) -> SourceFuture<'a, Option<SymbolOverview>> {
            Box::pin(async { Err(SourceError::unavailable("unexpected lookup call")) })
        }
    }

    fn app() -> Router {
        let catalog = SymbolCatalog::from_entries([
            (Symbol::parse("IBM").expect("valid"), String::from("IBM Corp")),
            (Symbol::parse("AMD").expect("valid"), String::from("AMD Inc")),
        ]);
        let service = DashboardService::new(Arc::new(UnreachableProvider), Arc::new(catalog));
        router(AppState::new(service))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn index_serves_the_page() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let page = String::from_utf8(bytes.to_vec()).expect("utf8 page");
        assert!(page.contains("Stock Data Visualization"));
    }

    #[test]
    fn page_drops_responses_for_superseded_selections() {
        let (_, update) = DASHBOARD_PAGE
            .split_once("async function update(symbol)")
            .expect("update function");
        let guard = update
            .find("if (symbol !== dropdown.value) return;")
            .expect("selection guard");
        let first_render = update.find("renderFigure(").expect("render call");
        assert!(guard < first_render);
    }

    #[tokio::test]
    async fn symbols_lists_catalog_in_order() {
        let (status, json) = get_body(app(), "/api/symbols").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["options"][0]["label"], "IBM Corp");
        assert_eq!(json["options"][0]["value"], "IBM");
        assert_eq!(json["options"][1]["value"], "AMD");
        assert_eq!(json["value"], "IBM");
    }

    #[tokio::test]
    async fn dashboard_requires_symbol() {
        let (status, json) = get_body(app(), "/api/dashboard").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "missing query parameter 'symbol'");
    }

    #[tokio::test]
    async fn dashboard_rejects_invalid_symbol() {
        let (status, _) = get_body(app(), "/api/dashboard?symbol=1BAD").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_unknown_symbol_is_not_found() {
        let (status, json) = get_body(app(), "/api/dashboard?symbol=TSLA").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "symbol 'TSLA' is not in the catalog");
    }

    #[tokio::test]
    async fn provider_failures_are_bad_gateway() {
        let (status, json) = get_body(app(), "/api/dashboard?symbol=ibm").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["error"]
            .as_str()
            .is_some_and(|message| message.contains("unexpected series call")));
    }
}
