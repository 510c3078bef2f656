use actix_web::{error, http::header, http::StatusCode, HttpRequest, HttpResponse};
use crate::models::ErrorResponse;
use crate::services::{PlacesError, RecommendError, SelectionError};
use thiserror::Error;

/// Realm announced in the basic auth challenge
pub const AUTH_REALM: &str = "cafe-picks";

/// Errors surfaced at the HTTP boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Incorrect username or password")]
    Unauthorized,

    #[error("{0}")]
    PlacesUpstream(String),

    #[error("{0}")]
    PlacesTimeout(String),

    #[error("{0}")]
    SelectionFailed(String),

    #[error("{0}")]
    SelectionTimeout(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::InvalidJson(_) => "invalid_json",
            ApiError::Unauthorized => "unauthorized",
            ApiError::PlacesUpstream(_) => "places_upstream_error",
            ApiError::PlacesTimeout(_) => "places_timeout",
            ApiError::SelectionFailed(_) => "selection_failed",
            ApiError::SelectionTimeout(_) => "selection_timeout",
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::PlacesUpstream(_) | ApiError::SelectionFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::PlacesTimeout(_) | ApiError::SelectionTimeout(_) => {
                StatusCode::GATEWAY_TIMEOUT
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);

        if let ApiError::Unauthorized = self {
            builder.insert_header((
                header::WWW_AUTHENTICATE,
                format!("Basic realm=\"{}\"", AUTH_REALM),
            ));
        }

        builder.json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

impl From<PlacesError> for ApiError {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::Timeout(_) => ApiError::PlacesTimeout(err.to_string()),
            _ => ApiError::PlacesUpstream(err.to_string()),
        }
    }
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::Timeout(_) => ApiError::SelectionTimeout(err.to_string()),
            _ => ApiError::SelectionFailed(err.to_string()),
        }
    }
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::Places(e) => e.into(),
            RecommendError::Selection(e) => e.into(),
        }
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::InvalidJson(err.to_string()).into()
}
