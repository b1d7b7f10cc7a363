use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

use super::{
    error::{AuthError, request_body},
    session::session_cookie,
    state::AuthState,
    types::{ErrorResponse, LoginRequest, UserResponse},
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Incorrect password", body = ErrorResponse),
        (status = 404, description = "No account for this email", body = ErrorResponse),
        (status = 503, description = "Service temporarily unavailable", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let request = request_body(payload)?;

    let outcome = auth_state
        .service()
        .login(&request.email, &request.password)
        .await?;

    let cookie = session_cookie(auth_state.config(), &outcome.token)?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    Ok((StatusCode::OK, headers, Json(outcome.user)))
}
