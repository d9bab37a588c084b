//! Provider adapters implementing [`MarketData`](crate::MarketData).

pub mod alphavantage;

pub use alphavantage::AlphaVantageAdapter;
