//! Error contract for the auth endpoints.
//!
//! Every variant maps to one status code and one human-readable message.
//! Infrastructure failures keep their source for logging, but the response
//! body only ever carries the generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use super::types::ErrorResponse;
use crate::store::StoreError;

const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable. Please try again.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("Request body must be valid JSON.")]
    MalformedBody,
    #[error("Email is already registered.")]
    Conflict,
    #[error("No account found for this email.")]
    NotFound,
    #[error("Incorrect password.")]
    IncorrectPassword,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("credential store failure: {0}")]
    Store(#[from] StoreError),
    #[error("password hashing failure: {0}")]
    PasswordHash(String),
    #[error("session token failure: {0}")]
    Token(#[from] session_token::Error),
    #[error("session cookie failure: {0}")]
    Cookie(#[from] InvalidHeaderValue),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::IncorrectPassword | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::PasswordHash(_) | Self::Token(_) | Self::Cookie(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    /// Message safe to return to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Store(_) | Self::PasswordHash(_) | Self::Token(_) | Self::Cookie(_) => {
                UNAVAILABLE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Unwraps a JSON request body. A request without a JSON content type is
/// treated as an empty object so it reaches field validation.
pub(crate) fn request_body<T: Default>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, AuthError> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => {
            debug!("Rejected request body: {rejection}");
            Err(AuthError::MalformedBody)
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            error!("Auth request failed: {self}");
        }
        let body = ErrorResponse {
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
