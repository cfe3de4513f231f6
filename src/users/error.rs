use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use super::{reply::Reply, store::StoreError};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("User already exists")]
    AlreadyExists,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("User not found")]
    NotFound,
    #[error("No matches found")]
    NoMatches,
    #[error("store error: {0}")]
    Store(anyhow::Error),
    #[error("password hashing failed: {0}")]
    Hash(anyhow::Error),
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => UserError::AlreadyExists,
            StoreError::Backend(e) => UserError::Store(e),
        }
    }
}

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            UserError::PasswordMismatch
            | UserError::AlreadyExists
            | UserError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            UserError::NotFound | UserError::NoMatches => StatusCode::NOT_FOUND,
            UserError::Store(_) | UserError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> u16 {
        self.status().as_u16()
    }

    /// Message safe to hand back to the caller.
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            "Internal server error".into()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            error!(error = %self, "request failed");
        }
        Reply {
            code: self.code(),
            message: self.public_message(),
        }
        .into_response()
    }
}
