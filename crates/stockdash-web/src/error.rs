use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stockdash_dashboard::{DashboardError, ErrorClass};
use thiserror::Error;

/// Failure returned by an API handler, rendered as `{code, message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error("invalid query string: {0}")]
    Query(String),
    #[error("failed to build response metadata: {0}")]
    Metadata(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Dashboard(error) => error.code(),
            Self::Query(_) => "request.invalid_query",
            Self::Metadata(_) => "internal.metadata",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Dashboard(error) => match error.class() {
                ErrorClass::Validation => StatusCode::BAD_REQUEST,
                ErrorClass::NotFound => StatusCode::NOT_FOUND,
                ErrorClass::Upstream => StatusCode::BAD_GATEWAY,
                ErrorClass::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Query(_) => StatusCode::BAD_REQUEST,
            Self::Metadata(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.code(), error = %self, "request rejected");
        }
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_classes_map_to_statuses() {
        let unknown = ApiError::from(DashboardError::UnknownMenuItem {
            value: "options".into(),
        });
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let offline = ApiError::from(DashboardError::CommentaryUnavailable);
        assert_eq!(offline.status(), StatusCode::SERVICE_UNAVAILABLE);

        let no_holdings = ApiError::from(DashboardError::NoHoldings);
        assert_eq!(no_holdings.status(), StatusCode::BAD_REQUEST);
        assert_eq!(no_holdings.code(), "portfolio.no_holdings");
    }

    #[test]
    fn query_errors_are_bad_requests() {
        let error = ApiError::Query("top: invalid digit".into());
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), "request.invalid_query");
    }
}
