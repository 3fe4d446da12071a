//! # API Errors
//!
//! Maps core errors onto HTTP statuses and renders them as envelopes.

use crate::envelope::Envelope;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use oasprobe_core::AppError;

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Display)]
pub enum ApiError {
    /// Client or document error (400).
    #[display("{_0}")]
    BadRequest(String),

    /// Unknown endpoint id (404).
    #[display("{_0}")]
    NotFound(String),

    /// Network failure that escaped the test runner (502).
    #[display("{_0}")]
    BadGateway(String),

    /// Storage or internal fault (500).
    #[display("{_0}")]
    Internal(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for ApiError {}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::UnsupportedFormat(_)
            | AppError::UnsupportedSpecVersion(_)
            | AppError::MalformedDocument(_)
            | AppError::MissingRequiredParameter(_)
            | AppError::InvalidBaseUrl(_)
            | AppError::InvalidRequest(_) => ApiError::BadRequest(err.to_string()),
            AppError::EndpointNotFound(_) => ApiError::NotFound(err.to_string()),
            AppError::Network(_) => ApiError::BadGateway(err.to_string()),
            AppError::Storage(_) | AppError::Io(_) => {
                log::error!("{}", err);
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(Envelope::<()>::failure(status.as_u16(), self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::InvalidBaseUrl("x".into()), 400),
            (AppError::MissingRequiredParameter("id".into()), 400),
            (AppError::EndpointNotFound(3), 404),
            (AppError::Network("refused".into()), 502),
            (AppError::Storage("locked".into()), 500),
        ];
        for (err, status) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status_code().as_u16(), status);
        }
    }

    #[test]
    fn test_message_keeps_core_prefix() {
        let api: ApiError = AppError::EndpointNotFound(9).into();
        assert_eq!(api.to_string(), "Endpoint not found: 9");
    }
}
