pub mod create;
pub mod delete;
pub mod form;
pub mod get;
pub mod list;

use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /v1/recipes endpoints (mounted at /v1/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_recipes)
                .post(create::create_recipe)
                .layer(DefaultBodyLimit::max(create::MAX_BODY_SIZE)),
        )
        .route(
            "/{slug}",
            get(get::get_recipe).delete(delete::delete_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        get::get_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        list::ListRecipesResponse,
        create::CreateRecipeRequest,
        create::CreateRecipeResponse,
        dapur_core::Recipe,
        dapur_core::RecipeWithCategory,
        dapur_core::RecipeDetail,
        dapur_core::Category,
        dapur_core::Comment,
        dapur_core::Rating,
    ))
)]
pub struct ApiDoc;
