use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickerboard_core::ValidationError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Catalog(#[from] tickerboard_core::CatalogError),

    #[error(transparent)]
    Dashboard(#[from] tickerboard_core::DashboardError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 2,
            Self::Catalog(_) => 3,
            Self::Dashboard(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
