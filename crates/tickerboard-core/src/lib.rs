//! # Tickerboard Core
//!
//! Domain types, provider adapter and the request → transform pipeline
//! behind the tickerboard stock dashboard.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Alpha Vantage adapter |
//! | [`catalog`] | Ticker → name catalog and its three sources |
//! | [`chat`] | Chat message sources (Telegram bot, Telegram export, static) |
//! | [`dashboard`] | Chart / quote / news view for one selection |
//! | [`data_source`] | Provider trait and structured errors |
//! | [`domain`] | Symbol, daily bars, quote table, news items |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP transport seam (reqwest in production) |
//! | [`scan`] | Ticker candidate extraction from chat text |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐
//! │ Chat source  │──▶│ Ticker scan│──┐
//! └──────────────┘   └────────────┘  │   ┌───────────────┐
//!                                    ├──▶│ SymbolCatalog │ (built once)
//! ┌──────────────┐                   │   └───────┬───────┘
//! │ Listing feed │───────────────────┘           │
//! └──────────────┘                               ▼
//!                  selection ──▶ ┌──────────────────────┐     ┌─────────────┐
//!                                │ DashboardService     │────▶│ MarketData  │
//!                                │ series → quote → news│     │ (adapter)   │
//!                                └──────────┬───────────┘     └─────────────┘
//!                                           ▼
//!                                     DashboardView
//! ```
//!
//! ## Security
//!
//! - API keys come from the environment and are masked in every logged URL
//!   (see [`http_client::redact_url`]).

pub mod adapters;
pub mod catalog;
pub mod chat;
pub mod dashboard;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod scan;

pub use adapters::AlphaVantageAdapter;

pub use catalog::{build_catalog, CatalogEntry, CatalogError, ChatScan, SymbolCatalog, SymbolSource};

pub use chat::{
    ChatMessage, ChatSource, StaticChatSource, TelegramBotSource, TelegramExportSource,
    DEFAULT_MESSAGE_LIMIT,
};

pub use dashboard::{
    ChartFigure, ChartSeries, DashboardError, DashboardService, DashboardView, NewsPanel,
    QuotePanel, NO_DATA_MESSAGE, NO_NEWS_MESSAGE,
};

pub use data_source::{MarketData, SourceError, SourceErrorKind, SourceFuture};

pub use domain::{
    ChartField, DailyBar, ListingRow, NewsItem, QuoteTable, SeriesOutcome, Symbol, SymbolOverview,
    TimeSeries, TradingDate,
};

pub use error::ValidationError;

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
