use crate::api::{ErrorResponse, ValidationErrorResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::store::StoreError;
use crate::AppState;
use axum::{extract::State, Json};
use dapur_core::{Recipe, ValidationErrors};
use serde::Serialize;
use utoipa::ToSchema;

use super::form::RecipeFormBody;

/// Body limit for the create route. Larger than the thumbnail limit so an
/// oversized image still reaches validation.
pub const MAX_BODY_SIZE: usize = 8 * 1024 * 1024;

/// Documented shape of the create form. The handler reads the fields
/// through [`RecipeFormBody`] so the same rules apply to every encoding.
#[derive(Debug, Clone, ToSchema)]
pub struct CreateRecipeRequest {
    /// At most 255 characters
    pub title: String,
    pub category_id: i64,
    pub energy: f64,
    pub carbohydrate: f64,
    pub protein: f64,
    pub ingredients: String,
    pub method: String,
    pub tips: String,
    /// JPEG or PNG, at most 2048 KB. Multipart only.
    #[schema(value_type = Option<String>, format = Binary)]
    pub thumbnail: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub message: String,
    pub recipe: Recipe,
}

#[utoipa::path(
    post,
    path = "/v1/recipes",
    tag = "recipes",
    request_body(
        content(
            (CreateRecipeRequest = "multipart/form-data"),
            (CreateRecipeRequest = "application/json")
        )
    ),
    responses(
        (status = 200, description = "Recipe created", body = CreateRecipeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ValidationErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    RecipeFormBody(form): RecipeFormBody,
) -> Result<Json<CreateRecipeResponse>, ApiError> {
    let category_exists = match form.category_id() {
        Some(id) => state.recipes.category_exists(id).await?,
        None => false,
    };

    let draft = form.validate(category_exists)?;

    let thumbnail_url = match &draft.thumbnail {
        Some(thumbnail) => Some(state.thumbnails.store(thumbnail).await?),
        None => None,
    };

    let new_recipe = draft.into_new_recipe(user.id, thumbnail_url.clone());

    match state.recipes.insert_recipe(new_recipe).await {
        Ok(recipe) => {
            tracing::info!(user_id = %user.id, slug = %recipe.slug, "recipe created");
            Ok(Json(CreateRecipeResponse {
                message: "Recipe created successful".to_string(),
                recipe,
            }))
        }
        Err(e) => {
            if let Some(url) = &thumbnail_url {
                state.thumbnails.discard(url).await;
            }
            match e {
                StoreError::SlugTaken(_) => Err(ValidationErrors::single(
                    "title",
                    "A recipe with this title already exists.",
                )
                .into()),
                StoreError::UnknownCategory(_) => Err(ValidationErrors::single(
                    "category_id",
                    "The selected category id is invalid.",
                )
                .into()),
                e => Err(e.into()),
            }
        }
    }
}
