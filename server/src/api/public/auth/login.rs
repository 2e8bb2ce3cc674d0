use crate::api::{ErrorResponse, JsonBody};
use crate::auth::{create_session, verify_password};
use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"username": "user", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Body is not valid JSON", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credentials = state
        .users
        .find_credentials(req.username.trim())
        .await?
        .ok_or(ApiError::Unauthorized("Invalid credentials"))?;

    if !verify_password(&req.password, &credentials.password_hash) {
        tracing::warn!(username = %credentials.user.username, "rejected login");
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    let token = create_session(state.users.as_ref(), credentials.user.id).await?;

    Ok(Json(LoginResponse { token }))
}
