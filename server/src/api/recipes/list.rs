use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use dapur_core::RecipeWithCategory;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeWithCategory>,
}

#[utoipa::path(
    get,
    path = "/v1/recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "Every recipe with its category, newest first", body = ListRecipesResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<ListRecipesResponse>, ApiError> {
    let recipes = state.recipes.list_recipes().await?;
    Ok(Json(ListRecipesResponse { recipes }))
}
