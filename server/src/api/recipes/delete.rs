use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use dapur_core::can_delete;

#[utoipa::path(
    delete,
    path = "/v1/recipes/{slug}",
    tag = "recipes",
    params(
        ("slug" = String, Path, description = "Recipe slug")
    ),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is neither the author nor an administrator", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let recipe = state
        .recipes
        .find_recipe(&slug)
        .await?
        .ok_or_else(ApiError::recipe_not_found)?;

    if !can_delete(&user, &recipe) {
        tracing::warn!(
            user_id = %user.id,
            slug = %recipe.slug,
            "rejected delete by non-owner"
        );
        return Err(ApiError::Forbidden);
    }

    if !state.recipes.delete_recipe(recipe.id).await? {
        return Err(ApiError::recipe_not_found());
    }

    if let Some(url) = &recipe.thumbnail {
        state.thumbnails.discard(url).await;
    }

    tracing::info!(user_id = %user.id, slug = %recipe.slug, "recipe deleted");

    Ok(Json(MessageResponse {
        message: "Recipe deleted successful".to_string(),
    }))
}
