use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use dapur_core::Category;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListCategoriesResponse {
    pub categories: Vec<Category>,
}

#[utoipa::path(
    get,
    path = "/v1/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories ordered by name", body = ListCategoriesResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ListCategoriesResponse>, ApiError> {
    let categories = state.recipes.list_categories().await?;
    Ok(Json(ListCategoriesResponse { categories }))
}
