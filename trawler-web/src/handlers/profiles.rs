//! Profile CRUD and lifecycle handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::json;
use trawler_core::profile::QualityProfile;

use super::store_error_response;
use crate::server::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

/// Body for profile creation.
#[derive(Deserialize)]
pub struct CreateProfileRequest {
    /// Name of the new profile
    name: String,
}

/// Body for tier reordering.
#[derive(Deserialize)]
pub struct ReorderRequest {
    /// Permutation of the profile's enabled tier ids
    tier_ids: Vec<String>,
}

/// GET /api/stats - store counters and uptime.
pub async fn api_stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.store.read().await;
    Json(json!({
        "profiles": store.len(),
        "default_profile": store.default_profile().map(|p| p.id.clone()),
        "custom_formats": state.formats.len(),
        "uptime_seconds": state.server_started_at.elapsed().as_secs(),
    }))
}

/// GET /api/profiles - every profile, default first.
pub async fn api_profiles(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.store.read().await;
    let profiles: Vec<&QualityProfile> = store.list();
    Json(json!({
        "profiles": profiles,
        "total": profiles.len(),
    }))
}

/// POST /api/profiles - create a named profile with seeded defaults.
pub async fn api_create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut store = state.store.write().await;
    let profile = store.create(&request.name);
    (StatusCode::CREATED, Json(json!({ "profile": profile })))
}

/// GET /api/profiles/{id}
pub async fn api_get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store.read().await;
    match store.get(&id) {
        Some(profile) => Ok(Json(json!({ "profile": profile }))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": format!("Profile {id} not found") })),
        )),
    }
}

/// PUT /api/profiles/{id} - full update; validation warnings ride along.
pub async fn api_update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut profile): Json<QualityProfile>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // The path wins over whatever id the body carries
    profile.id = id;
    let mut store = state.store.write().await;
    let warnings = store.update(profile.clone()).map_err(store_error_response)?;
    let saved = store.get(&profile.id);
    Ok(Json(json!({
        "profile": saved,
        "warnings": warnings,
    })))
}

/// DELETE /api/profiles/{id}
pub async fn api_delete_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = state.store.write().await;
    let removed = store.delete(&id).map_err(store_error_response)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Deleted profile '{}'", removed.name),
    })))
}

/// POST /api/profiles/{id}/clone
pub async fn api_clone_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let mut store = state.store.write().await;
    let copy = store.clone_profile(&id).map_err(store_error_response)?;
    Ok((StatusCode::CREATED, Json(json!({ "profile": copy }))))
}

/// POST /api/profiles/{id}/default
pub async fn api_make_default(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = state.store.write().await;
    store.set_default(&id).map_err(store_error_response)?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/profiles/{id}/reorder - apply a user-chosen tier ordering.
pub async fn api_reorder_tiers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = state.store.write().await;
    let profile = store
        .get(&id)
        .cloned()
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": format!("Profile {id} not found") })),
            )
        })?;

    let reordered = trawler_core::profile::tiers::reorder_tiers(&profile, &request.tier_ids)
        .map_err(|e| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "success": false, "message": e.to_string() })),
            )
        })?;

    let warnings = store
        .update(reordered.clone())
        .map_err(store_error_response)?;
    Ok(Json(json!({
        "profile": store.get(&reordered.id),
        "warnings": warnings,
    })))
}
