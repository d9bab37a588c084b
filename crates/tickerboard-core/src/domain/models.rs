use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate, ValidationError};

/// Price column plotted as one chart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartField {
    Open,
    High,
    Low,
    Close,
    AdjustedClose,
}

impl ChartField {
    /// Fields plotted when nothing else is configured.
    pub const DEFAULT: [ChartField; 4] = [Self::Open, Self::High, Self::Low, Self::Close];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::AdjustedClose => "adjusted-close",
        }
    }

    /// Legend label shown next to the line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::AdjustedClose => "Adjusted Close",
        }
    }

    /// Parses a comma-separated list such as `open,close,adjusted-close`.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ValidationError> {
        let fields = input
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Self::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        if fields.is_empty() {
            return Err(ValidationError::EmptyChartFields);
        }
        Ok(fields)
    }
}

impl FromStr for ChartField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "close" => Ok(Self::Close),
            "adjusted-close" | "adjusted_close" | "adj-close" => Ok(Self::AdjustedClose),
            _ => Err(ValidationError::InvalidChartField {
                value: value.to_owned(),
            }),
        }
    }
}

impl Display for ChartField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a daily adjusted time series. Prices are taken as reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: Option<f64>,
}

impl DailyBar {
    pub fn value(&self, field: ChartField) -> Option<f64> {
        match field {
            ChartField::Open => Some(self.open),
            ChartField::High => Some(self.high),
            ChartField::Low => Some(self.low),
            ChartField::Close => Some(self.close),
            ChartField::AdjustedClose => self.adjusted_close,
        }
    }
}

/// Daily bars for one symbol, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub symbol: Symbol,
    pub bars: Vec<DailyBar>,
}

impl TimeSeries {
    /// Builds a series and sorts it ascending by date. Duplicate dates are kept.
    pub fn new(symbol: Symbol, mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        Self { symbol, bars }
    }
}

/// Result of a time series fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOutcome {
    Series(TimeSeries),
    /// The provider answered without a `timestamp` column.
    NoData,
}

/// Quote snapshot as an untyped table, columns in provider order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QuoteTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by column name in the first row.
    pub fn first_value(&self, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.rows.first()?.get(index).map(String::as_str)
    }
}

/// Headline from the provider's news feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Raw row of the provider's listing status feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRow {
    pub symbol: String,
    pub name: String,
    pub exchange: Option<String>,
    pub asset_type: Option<String>,
    pub status: String,
}

impl ListingRow {
    pub fn is_active(&self) -> bool {
        self.status == "Active"
    }
}

/// Company overview returned by a per-symbol lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolOverview {
    pub symbol: String,
    pub name: Option<String>,
}
