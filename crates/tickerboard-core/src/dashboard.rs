//! Selection → fetch → transform pipeline behind the dashboard widgets.
//!
//! Each selection issues up to three provider calls in sequence (time
//! series, quote, news) and reshapes the answers into a [`DashboardView`].
//! Nothing is cached: selecting the same symbol twice fetches twice.

use std::sync::Arc;

use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::SymbolCatalog;
use crate::data_source::{MarketData, SourceError};
use crate::{ChartField, NewsItem, QuoteTable, SeriesOutcome, Symbol, TimeSeries};

pub const NO_DATA_MESSAGE: &str = "No data found for the specified symbol.";
pub const NO_NEWS_MESSAGE: &str = "No news found for the specified symbol.";

const X_AXIS_TITLE: &str = "Date";
const Y_AXIS_TITLE: &str = "Price";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("symbol '{0}' is not in the catalog")]
    UnknownSymbol(Symbol),
    #[error("time series request failed: {0}")]
    Series(SourceError),
    #[error("quote request failed: {0}")]
    Quote(SourceError),
    #[error("news request failed: {0}")]
    News(SourceError),
}

impl DashboardError {
    /// Provider error behind this failure, if any.
    pub fn source_error(&self) -> Option<&SourceError> {
        match self {
            Self::UnknownSymbol(_) => None,
            Self::Series(error) | Self::Quote(error) | Self::News(error) => Some(error),
        }
    }
}

/// One chart line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub mode: &'static str,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

/// Chart contents; an empty figure has no title and no series.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartFigure {
    pub title: Option<String>,
    pub x_axis_title: Option<String>,
    pub y_axis_title: Option<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartFigure {
    pub fn empty() -> Self {
        Self::default()
    }

    /// One `lines` series per field, in field order. Bars without a value
    /// for a field are skipped for that line.
    pub fn from_series(title: &str, series: &TimeSeries, fields: &[ChartField]) -> Self {
        let lines = fields
            .iter()
            .map(|&field| {
                let (x, y) = series
                    .bars
                    .iter()
                    .filter_map(|bar| bar.value(field).map(|value| (bar.date.format_iso(), value)))
                    .unzip();
                ChartSeries {
                    name: field.label().to_owned(),
                    mode: "lines",
                    x,
                    y,
                }
            })
            .collect();

        Self {
            title: Some(title.to_owned()),
            x_axis_title: Some(X_AXIS_TITLE.to_owned()),
            y_axis_title: Some(Y_AXIS_TITLE.to_owned()),
            series: lines,
        }
    }
}

/// Content of the quote area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuotePanel {
    Table(QuoteTable),
    Message { text: String },
}

/// Content of the news area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NewsPanel {
    Headlines { items: Vec<NewsItem> },
    Message { text: String },
    Empty,
}

impl NewsPanel {
    pub fn from_items(items: Vec<NewsItem>) -> Self {
        if items.is_empty() {
            Self::Message {
                text: NO_NEWS_MESSAGE.to_owned(),
            }
        } else {
            Self::Headlines { items }
        }
    }
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub symbol: Symbol,
    pub figure: ChartFigure,
    pub quote: QuotePanel,
    pub news: NewsPanel,
}

impl DashboardView {
    /// Placeholder shown when the provider has no time series.
    pub fn no_data(symbol: Symbol) -> Self {
        Self {
            symbol,
            figure: ChartFigure::empty(),
            quote: QuotePanel::Message {
                text: NO_DATA_MESSAGE.to_owned(),
            },
            news: NewsPanel::Empty,
        }
    }
}

/// Renders dashboard views against a shared catalog and provider.
#[derive(Clone)]
pub struct DashboardService {
    provider: Arc<dyn MarketData>,
    catalog: Arc<SymbolCatalog>,
    chart_fields: Vec<ChartField>,
}

impl DashboardService {
    pub fn new(provider: Arc<dyn MarketData>, catalog: Arc<SymbolCatalog>) -> Self {
        Self {
            provider,
            catalog,
            chart_fields: ChartField::DEFAULT.to_vec(),
        }
    }

    /// Empty lists keep the current fields.
    pub fn with_chart_fields(mut self, fields: Vec<ChartField>) -> Self {
        if !fields.is_empty() {
            self.chart_fields = fields;
        }
        self
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn chart_fields(&self) -> &[ChartField] {
        &self.chart_fields
    }

    pub async fn render(&self, symbol: &Symbol) -> Result<DashboardView, DashboardError> {
        let title = self
            .catalog
            .name_of(symbol)
            .ok_or_else(|| DashboardError::UnknownSymbol(symbol.clone()))?
            .to_owned();

        let series = match self
            .provider
            .daily_adjusted(symbol)
            .await
            .map_err(DashboardError::Series)?
        {
            SeriesOutcome::Series(series) => series,
            SeriesOutcome::NoData => return Ok(DashboardView::no_data(symbol.clone())),
        };

        let quote = self
            .provider
            .global_quote(symbol)
            .await
            .map_err(DashboardError::Quote)?;

        let figure = ChartFigure::from_series(&title, &series, &self.chart_fields);

        let news = self
            .provider
            .news_sentiment(symbol)
            .await
            .map_err(DashboardError::News)?;

        info!(
            "rendered {symbol}: {} bars, price {}, {} headlines",
            series.bars.len(),
            quote.first_value("price").unwrap_or("n/a"),
            news.len()
        );

        Ok(DashboardView {
            symbol: symbol.clone(),
            figure,
            quote: QuotePanel::Table(quote),
            news: NewsPanel::from_items(news),
        })
    }
}
