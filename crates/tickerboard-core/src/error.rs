use thiserror::Error;

/// Validation and contract errors exposed by `tickerboard-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid chart field '{value}', expected one of open, high, low, close, adjusted-close")]
    InvalidChartField { value: String },
    #[error("chart field list cannot be empty")]
    EmptyChartFields,

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("message limit must be greater than zero")]
    ZeroMessageLimit,
    #[error("chat channel cannot be empty")]
    EmptyChannel,
}
