//! Release evaluation handler.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::json;
use trawler_core::formats::candidate_from_release;
use trawler_core::profile::evaluator::evaluate;
use trawler_core::profile::{HeldItem, ReleaseCandidate};

use crate::server::AppState;

/// Evaluation request: either a raw release name to parse or an already
/// assembled candidate, plus the optionally held release.
#[derive(Deserialize)]
pub struct EvaluateRequest {
    /// Raw release name to parse into a candidate
    release: Option<String>,
    /// Pre-assembled candidate; ignored when `release` is present
    candidate: Option<ReleaseCandidate>,
    /// The currently held release, if any
    held: Option<HeldItem>,
}

/// POST /api/profiles/{id}/evaluate
///
/// Decides acceptability and upgrade-worthiness of a release under one
/// profile, returning the full report with rejection reasons.
pub async fn api_evaluate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let candidate = match (&request.release, request.candidate) {
        (Some(release), _) => candidate_from_release(release, &state.formats),
        (None, Some(candidate)) => candidate,
        (None, None) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": "provide either 'release' or 'candidate'",
                })),
            ));
        }
    };

    let store = state.store.read().await;
    let profile = store.get(&id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": format!("Profile {id} not found") })),
        )
    })?;

    let report = evaluate(profile, request.held.as_ref(), &candidate);
    Ok(Json(json!({
        "candidate": candidate,
        "evaluation": report,
    })))
}
