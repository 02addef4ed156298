use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::{convert::ConvertError, render::RenderError},
    infra::error::InfraError,
};

const MISSING_DATA: &str = "Missing data";
const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Diagnostic detail attached to error responses for the logging middleware.
/// Never written to the response body.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Plain-text HTTP failure: a fixed public message plus an attached report.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

impl From<ConvertError> for HttpError {
    fn from(error: ConvertError) -> Self {
        let status = match error {
            ConvertError::Decode(_) => StatusCode::BAD_REQUEST,
            ConvertError::Render(_) | ConvertError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let public_message = if status == StatusCode::BAD_REQUEST {
            MISSING_DATA
        } else {
            INTERNAL_SERVER_ERROR
        };
        HttpError::from_error(
            "application::convert::convert_error_to_http_error",
            status,
            public_message,
            &error,
        )
    }
}

/// Top-level failure of the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> ConvertError {
        let err = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        ConvertError::Decode(err)
    }

    #[test]
    fn decode_errors_map_to_missing_data() {
        let error = HttpError::from(decode_error());
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert!(report.messages[0].starts_with("request body is not a valid conversion request"));
    }

    #[test]
    fn render_errors_map_to_internal_error() {
        let error = HttpError::from(ConvertError::Render(RenderError::Document {
            message: "rewriter failed".to_string(),
        }));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn report_collects_source_chain() {
        let report = ErrorReport::from_error(
            "test",
            StatusCode::BAD_REQUEST,
            &decode_error(),
        );
        assert_eq!(report.messages.len(), 2);
    }
}
