use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tickerboard_core::{DashboardError, SourceErrorKind, ValidationError};

/// API-level failures mapped to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing query parameter 'symbol'")]
    MissingSymbol,

    #[error(transparent)]
    InvalidSymbol(#[from] ValidationError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingSymbol | Self::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            Self::Dashboard(DashboardError::UnknownSymbol(_)) => StatusCode::NOT_FOUND,
            Self::Dashboard(error) => match error.source_error().map(|e| e.kind()) {
                Some(SourceErrorKind::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("dashboard request failed: {self}");
        } else {
            log::debug!("rejected dashboard request: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
