use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::ValidationErrors;
use serde::Serialize;
use service::ServiceError;
use tracing::error;

/// Error response body: `{"message": .., "errors": [..], "error": ..}` with
/// the last two omitted when empty.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Vec<String>,
    pub error: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error: Option<String>) -> Self {
        Self { status, message: message.into(), errors: Vec::new(), error }
    }

    pub fn bad_request(errors: Vec<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: "Validation failed".into(), errors, error: None }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), message = %self.message, error = ?self.error, "request failed");
        }
        let status = self.status;
        let body = ErrorBody { message: self.message, errors: self.errors, error: self.error };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errs) => Self::bad_request(errs.into_messages()),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg, None),
            ServiceError::UpstreamUnavailable(detail) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to validate user",
                Some(detail),
            ),
            ServiceError::Internal(detail) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(detail))
            }
        }
    }
}

impl From<ValidationErrors> for JsonApiError {
    fn from(errs: ValidationErrors) -> Self {
        Self::bad_request(errs.into_messages())
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        Self::bad_request(vec![r.body_text()])
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(_: PathRejection) -> Self {
        Self::bad_request(vec!["id must be an integer".into()])
    }
}
