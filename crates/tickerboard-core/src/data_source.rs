//! Market data trait and the structured error shared by provider calls.
//!
//! # Endpoints
//!
//! | Operation | Response | Description |
//! |-----------|----------|-------------|
//! | [`MarketData::listing_status`] | `Vec<ListingRow>` | Every listed symbol with its status |
//! | [`MarketData::daily_adjusted`] | [`SeriesOutcome`] | Daily bars, oldest first |
//! | [`MarketData::global_quote`] | [`QuoteTable`] | Quote snapshot as a raw table |
//! | [`MarketData::news_sentiment`] | `Vec<NewsItem>` | Recent headlines |
//! | [`MarketData::symbol_overview`] | `Option<SymbolOverview>` | Per-symbol lookup |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{ListingRow, NewsItem, QuoteTable, SeriesOutcome, Symbol, SymbolOverview};

/// Boxed future returned by [`MarketData`] operations.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure or non-success status.
    Unavailable,
    /// The provider answered with a rate-limit or quota notice.
    RateLimited,
    /// The request could not be built (bad symbol, bad credentials).
    InvalidRequest,
    /// The provider answered with a body that could not be parsed.
    Malformed,
}

impl SourceErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::RateLimited => "rate_limited",
            Self::InvalidRequest => "invalid_request",
            Self::Malformed => "malformed",
        }
    }
}

/// Structured error for provider and chat transport calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
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

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for SourceError {}

/// Financial data provider contract used by the catalog and the dashboard.
pub trait MarketData: Send + Sync {
    /// Every symbol known to the provider, with its listing status.
    fn listing_status(&self) -> SourceFuture<'_, Vec<ListingRow>>;

    /// Daily adjusted bars. A response without a `timestamp` column is
    /// reported as [`SeriesOutcome::NoData`] rather than an error.
    fn daily_adjusted<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, SeriesOutcome>;

    fn global_quote<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, QuoteTable>;

    fn news_sentiment<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Vec<NewsItem>>;

    /// `Ok(None)` when the provider does not know the symbol.
    fn symbol_overview<'a>(&'a self, symbol: &'a Symbol)
        -> SourceFuture<'a, Option<SymbolOverview>>;
}
