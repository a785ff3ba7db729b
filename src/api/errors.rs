use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::analysis::AnalysisError;
use crate::api::dtos::ErrorResponse;

pub enum ApiError {
    Validation(String),
    Analysis(AnalysisError),
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        ApiError::Analysis(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(err) => match err {
                AnalysisError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
                AnalysisError::Extraction(_) | AnalysisError::Evaluation(_) => {
                    StatusCode::BAD_GATEWAY
                }
                AnalysisError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Analysis(err) => err.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = match self {
            ApiError::Validation(message) => message,
            ApiError::Analysis(err) => err.to_string(),
        };

        if status.is_server_error() {
            error!(status = %status, kind, error = %message, "Request failed");
        } else {
            warn!(status = %status, kind, error = %message, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: message,
                kind: kind.to_string(),
            }),
        )
            .into_response()
    }
}
