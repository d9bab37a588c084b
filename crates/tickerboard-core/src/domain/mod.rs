//! # Domain Models
//!
//! Types shared by the symbol catalog, the provider adapter and the
//! dashboard pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`TradingDate`] | Calendar date of a daily bar |
//! | [`DailyBar`] | Open/high/low/close/adjusted close for one day |
//! | [`TimeSeries`] | Daily bars for one symbol, oldest first |
//! | [`QuoteTable`] | Quote snapshot rendered verbatim |
//! | [`NewsItem`] | Headline from the news feed |
//! | [`ListingRow`] | Raw row of the listing status feed |
//! | [`SymbolOverview`] | Result of a per-symbol lookup |
//! | [`ChartField`] | Price column plotted on the chart |
//!
//! Prices are not validated against each other: the provider's numbers are
//! plotted as reported.

mod models;
mod symbol;
mod trading_date;

pub use models::{
    ChartField, DailyBar, ListingRow, NewsItem, QuoteTable, SeriesOutcome, SymbolOverview,
    TimeSeries,
};
pub use symbol::Symbol;
pub use trading_date::TradingDate;
