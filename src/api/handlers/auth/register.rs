use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

use super::{
    error::{AuthError, request_body},
    state::AuthState,
    types::{ErrorResponse, RegisterRequest, UserResponse},
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email is already registered", body = ErrorResponse),
        (status = 503, description = "Service temporarily unavailable", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let request = request_body(payload)?;

    let user = auth_state
        .service()
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}
