use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{
        get_config, index, only_data_no_cache, only_data_no_cache_with_object,
        only_data_with_cache, patch_config,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/only-data-no-cache", get(only_data_no_cache))
        .route(
            "/only-data-no-cache-with-object",
            get(only_data_no_cache_with_object),
        )
        .route("/only-data-with-cache", get(only_data_with_cache))
        .route("/config", get(get_config).patch(patch_config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
