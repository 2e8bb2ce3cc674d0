use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use dapur_core::RecipeDetail;

#[utoipa::path(
    get,
    path = "/v1/recipes/{slug}",
    tag = "recipes",
    params(
        ("slug" = String, Path, description = "Recipe slug")
    ),
    responses(
        (status = 200, description = "Recipe with category, comments, ratings and mean rating", body = RecipeDetail),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<RecipeDetail>, ApiError> {
    let loaded = state
        .recipes
        .load_recipe(&slug)
        .await?
        .ok_or_else(ApiError::recipe_not_found)?;

    Ok(Json(RecipeDetail::from(loaded)))
}
