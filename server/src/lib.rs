//! HTTP service for sharing recipes.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
mod raw_sql;
pub mod schema;
pub mod storage;
pub mod store;
pub mod telemetry;

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

use crate::storage::ThumbnailStorage;
use crate::store::{RecipeStore, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<dyn RecipeStore>,
    pub users: Arc<dyn UserStore>,
    pub thumbnails: Arc<ThumbnailStorage>,
}

impl AppState {
    /// State backed by a single store that holds both recipes and users.
    pub fn new<S>(store: Arc<S>, thumbnails: ThumbnailStorage) -> Self
    where
        S: RecipeStore + UserStore + 'static,
    {
        AppState {
            recipes: store.clone(),
            users: store,
            thumbnails: Arc::new(thumbnails),
        }
    }
}

/// Build the full router: API routes, public storage, API docs and request tracing.
pub fn app(state: AppState) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());
    let storage = ServeDir::new(state.thumbnails.root());

    Router::new()
        .merge(api::public::router())
        .nest("/v1/recipes", api::recipes::router())
        .nest("/v1/categories", api::categories::router())
        .merge(swagger_ui)
        .nest_service("/storage", storage)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}
