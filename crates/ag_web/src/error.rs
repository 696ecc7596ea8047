use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    /// A request body that could not be extracted, with the extractor's status.
    Rejected(StatusCode, String),
    Pipeline(ag_core::Error),
}

impl From<ag_core::Error> for ApiError {
    fn from(err: ag_core::Error) -> Self {
        ApiError::Pipeline(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected(status, _) => *status,
            ApiError::Pipeline(ag_core::Error::Auth(_)) => StatusCode::UNAUTHORIZED,
            ApiError::Pipeline(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Unauthorized(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Rejected(_, msg) => msg.clone(),
            ApiError::Pipeline(e) => {
                error!("Request failed: {}", e);
                e.to_string()
            }
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
