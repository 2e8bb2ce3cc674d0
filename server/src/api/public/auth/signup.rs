use crate::api::{ErrorResponse, JsonBody, ValidationErrorResponse};
use crate::auth::{create_session, hash_password};
use crate::error::ApiError;
use crate::store::StoreError;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use dapur_core::{Role, ValidationErrors};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub user_id: Uuid,
    pub token: String,
}

fn validate(req: &SignupRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if req.username.trim().is_empty() {
        errors.add("username", "The username field is required.");
    } else if req.username.trim().chars().count() > 255 {
        errors.add(
            "username",
            "The username field must not be greater than 255 characters.",
        );
    }
    if req.password.is_empty() {
        errors.add("password", "The password field is required.");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    tag = "auth",
    request_body(content = SignupRequest, example = json!({"username": "user", "password": "password"})),
    responses(
        (status = 201, description = "User created successfully", body = SignupResponse),
        (status = 400, description = "Body is not valid JSON", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 422, description = "Missing username or password", body = ValidationErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    validate(&req)?;

    let password_hash = hash_password(&req.password)?;

    let user = match state
        .users
        .create_user(req.username.trim(), &password_hash, Role::User)
        .await
    {
        Ok(user) => user,
        Err(StoreError::UsernameTaken(_)) => {
            return Err(ApiError::Conflict("Username already exists"))
        }
        Err(e) => return Err(e.into()),
    };

    let token = create_session(state.users.as_ref(), user.id).await?;
    tracing::info!(user_id = %user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user_id: user.id,
            token,
        }),
    ))
}
