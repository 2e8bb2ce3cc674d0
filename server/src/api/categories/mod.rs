pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /v1/categories endpoints (mounted at /v1/categories)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list::list_categories))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_categories),
    components(schemas(list::ListCategoriesResponse, dapur_core::Category))
)]
pub struct ApiDoc;
