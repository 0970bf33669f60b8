//! Demo routes exercising every render path.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use pagerender::{RenderError, Renderer};
use serde_json::{json, Value};

use crate::{error::AppError, response::TeraResponse, state::AppState};

/// Run `f` against the shared renderer and a fresh response.
fn respond<F>(state: &AppState, f: F) -> Result<Response, AppError>
where
    F: FnOnce(&Renderer, &mut TeraResponse<'_>) -> pagerender::Result<()>,
{
    let renderer = state.renderer.read().expect("Failed to acquire read lock");
    let mut res = TeraResponse::new(&state.templates);
    f(&renderer, &mut res)?;
    Ok(res.into_response())
}

/// Full page through the `index` template (GET /).
pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    respond(&state, |renderer, res| {
        renderer.render(res, "index", Some(&json!({})), false)
    })
}

/// Raw string with no-cache headers (GET /only-data-no-cache).
pub async fn only_data_no_cache(State(state): State<AppState>) -> Result<Response, AppError> {
    respond(&state, |renderer, res| {
        renderer.render_only_data(res, Some(json!("a")), true)
    })
}

/// Object payload with no-cache headers (GET /only-data-no-cache-with-object).
pub async fn only_data_no_cache_with_object(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let payload = json!({
        "data": "a",
        "b": { "c": [{ "z": 1, "e": 2 }] }
    });
    respond(&state, |renderer, res| {
        renderer.render_only_data(res, Some(payload), true)
    })
}

/// Object payload, cacheable (GET /only-data-with-cache).
pub async fn only_data_with_cache(State(state): State<AppState>) -> Result<Response, AppError> {
    respond(&state, |renderer, res| {
        renderer.render_only_data(res, Some(json!({ "data": { "a": "b" } })), false)
    })
}

/// Live page configuration (GET /config).
pub async fn get_config(State(state): State<AppState>) -> Json<Value> {
    let renderer = state.renderer.read().expect("Failed to acquire read lock");
    Json(json!(renderer.config()))
}

/// Merge a partial page configuration (PATCH /config).
pub async fn patch_config(
    State(state): State<AppState>,
    Json(partial): Json<Value>,
) -> Result<Response, AppError> {
    let mut renderer = state
        .renderer
        .write()
        .expect("Failed to acquire write lock");

    match renderer.update_config(&partial) {
        Ok(()) => Ok(Json(json!({ "ok": true })).into_response()),
        Err(RenderError::Invalid(errors)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "ok": false, "errors": errors })),
        )
            .into_response()),
        Err(err) => Err(err.into()),
    }
}
