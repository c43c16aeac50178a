use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::protocol::ErrorBody;

use crate::score_store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(detail) | ApiError::NotFound(detail) | ApiError::Conflict(detail) => detail,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let detail = err.to_string();
        match err {
            StoreError::BlankUsername | StoreError::UserNotFound(_) => ApiError::BadRequest(detail),
            StoreError::UserExists(_) => ApiError::Conflict(detail),
            StoreError::GameNotFound(_) => ApiError::NotFound(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { detail: self.detail().to_string() };
        (self.status_code(), Json(body)).into_response()
    }
}
