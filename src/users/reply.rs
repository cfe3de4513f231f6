use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `{code, message}` envelope returned by every user endpoint. The HTTP
/// status always equals `code`.
#[derive(Debug, Serialize)]
pub struct Reply<T> {
    pub code: u16,
    pub message: T,
}

impl<T> Reply<T> {
    pub fn new(status: StatusCode, message: T) -> Self {
        Self {
            code: status.as_u16(),
            message,
        }
    }

    pub fn ok(message: T) -> Self {
        Self::new(StatusCode::OK, message)
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
