//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while giving Actix handlers
//! consistent JSON responses and status codes. Body extraction failures are
//! routed through the same envelope.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use actix_multipart::MultipartError;
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(self.redacted())
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

/// `JsonConfig` error handler producing the standard 400 envelope.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, path = req.path(), "rejected JSON body");
    let code = match err {
        JsonPayloadError::ContentType => "unsupported_media_type",
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "too_large"
        }
        _ => "invalid_json",
    };
    Error::invalid_request("Request body must be valid JSON")
        .with_details(json!({ "code": code }))
        .into()
}

/// 400 envelope for bodies that are not a usable multipart form.
pub(crate) fn invalid_multipart_error() -> Error {
    Error::invalid_request("Request body must be a valid multipart form")
        .with_details(json!({ "code": "invalid_multipart" }))
}

/// `MultipartFormConfig` error handler producing the standard 400 envelope.
pub fn multipart_error_handler(err: MultipartError, req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, path = req.path(), "rejected multipart body");
    invalid_multipart_error().into()
}
