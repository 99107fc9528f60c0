//! HTTP mapping for failed operations.
//!
//! Only real failures reach this type. They are logged with their cause and
//! answered with a 500 and a fixed, per-operation message.

use std::fmt;

use ab_core::AppError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};

#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    source: AppError,
}

impl ApiError {
    /// Returns a `map_err` adapter that tags the failure with `message`.
    pub fn context(message: &'static str) -> impl FnOnce(AppError) -> ApiError {
        move |source| {
            log::error!("{}: {}", message, source);
            ApiError { message, source }
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn source_error(&self) -> &AppError {
        &self.source
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.source)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn internal_failure_hides_cause() {
        let cause = AppError::Internal(anyhow::anyhow!("disk on fire"));
        let err = ApiError::context("Could not report thread")(cause);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Could not report thread" }));
    }

    #[actix_web::test]
    async fn validation_failure_uses_same_generic_payload() {
        let cause = AppError::Validation("text is required".into());
        let err = ApiError::context("Could not create thread")(cause);
        assert!(err.source_error().is_validation());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Could not create thread");
    }
}
