//! HTTP handlers for the Trawler API.

mod evaluate;
mod profiles;

pub use evaluate::api_evaluate;
pub use profiles::{
    api_clone_profile, api_create_profile, api_delete_profile, api_get_profile, api_make_default,
    api_profiles, api_reorder_tiers, api_stats, api_update_profile,
};

use axum::http::StatusCode;
use axum::response::Json;
use serde_json::json;
use trawler_core::profile::StoreError;

/// Maps a store error onto an HTTP status and JSON body.
pub(crate) fn store_error_response(error: StoreError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &error {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::LastProfile { .. } | StoreError::DefaultInUse { .. } => StatusCode::CONFLICT,
        StoreError::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    let body = match &error {
        StoreError::Invalid { issues } => json!({
            "success": false,
            "message": error.to_string(),
            "issues": issues,
        }),
        _ => json!({
            "success": false,
            "message": error.to_string(),
        }),
    };
    (status, Json(body))
}
