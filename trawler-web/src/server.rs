//! API server wiring for Trawler.
//!
//! Builds the router over shared profile-store state and serves it.
//! Development mode seeds demo profiles so every endpoint is explorable
//! without a configured instance.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use trawler_core::config::TrawlerConfig;
use trawler_core::formats::{CustomFormat, default_format_set};
use trawler_core::mode::RuntimeMode;
use trawler_core::profile::ProfileStore;
use trawler_core::profile::types::FormatScore;

use crate::handlers::{
    api_clone_profile, api_create_profile, api_delete_profile, api_evaluate, api_get_profile,
    api_make_default, api_profiles, api_reorder_tiers, api_stats, api_update_profile,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The profile collection behind an async lock
    pub store: Arc<RwLock<ProfileStore>>,
    /// Custom formats available for release matching
    pub formats: Arc<Vec<CustomFormat>>,
    /// Server start instant, for the stats endpoint
    pub server_started_at: std::time::Instant,
}

impl AppState {
    /// Creates state over an existing store.
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            formats: Arc::new(default_format_set()),
            server_started_at: std::time::Instant::now(),
        }
    }
}

/// Builds the API router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // JSON API endpoints
        .route("/api/stats", get(api_stats))
        .route("/api/profiles", get(api_profiles).post(api_create_profile))
        .route(
            "/api/profiles/{id}",
            get(api_get_profile)
                .put(api_update_profile)
                .delete(api_delete_profile),
        )
        .route("/api/profiles/{id}/clone", post(api_clone_profile))
        .route("/api/profiles/{id}/default", post(api_make_default))
        .route("/api/profiles/{id}/reorder", post(api_reorder_tiers))
        .route("/api/profiles/{id}/evaluate", post(api_evaluate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Seeds demo profiles for offline development and tests.
///
/// One permissive default, one upgrade-chasing HD profile with scored
/// formats, and one frozen archive profile with upgrades disabled.
pub fn seed_demo_profiles(store: &mut ProfileStore) {
    store.create("Any");

    let mut hd = store.create("HD Upgrades").clone();
    hd.upgrade_until_quality = Some("web-2160p".to_string());
    hd.upgrade_score_increment = 100;
    hd.upgrade_until_format_score = 5500;
    hd.min_format_score = -1000;
    hd.format_scores = vec![
        FormatScore::new("x265", 100),
        FormatScore::new("hdr10", 500),
        FormatScore {
            format_id: "dolby-vision".to_string(),
            score: 750,
            recommended: Some(750),
        },
        FormatScore::new("atmos", 250),
        FormatScore::new("repack", 25),
        FormatScore::new("upscaled", -2000),
    ];
    // The seed data is produced by the store itself and always saves
    let _ = store.update(hd);

    let mut archive = store.create("720p Archive").clone();
    archive.upgrades_allowed = false;
    let _ = store.update(archive);
}

/// Runs the API server until shutdown.
///
/// # Errors
/// - `Box<dyn std::error::Error>` - binding the listener or serving failed
pub async fn run_server(
    mut config: TrawlerConfig,
    mode: RuntimeMode,
) -> Result<(), Box<dyn std::error::Error>> {
    config.runtime_mode = mode;

    let mut store = ProfileStore::new(config.profiles.clone());
    if mode.is_development() {
        seed_demo_profiles(&mut store);
        tracing::info!(profiles = store.len(), "seeded demo profiles");
    }

    let state = AppState::new(store);
    let app = build_router(state);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, %mode, "trawler API server running");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use trawler_core::profile::QualityProfile;

    use super::*;

    fn profile_named<'a>(store: &'a ProfileStore, name: &str) -> &'a QualityProfile {
        store
            .list()
            .into_iter()
            .find(|p| p.name == name)
            .expect("seeded profile missing")
    }

    #[test]
    fn test_demo_seed_shape() {
        let mut store = ProfileStore::with_defaults();
        seed_demo_profiles(&mut store);

        assert_eq!(store.len(), 3);
        assert_eq!(store.default_profile().unwrap().name, "Any");

        let hd = profile_named(&store, "HD Upgrades");
        assert_eq!(hd.upgrade_until_quality.as_deref(), Some("web-2160p"));
        assert_eq!(hd.format_scores.len(), 6);

        let archive = profile_named(&store, "720p Archive");
        assert!(!archive.upgrades_allowed);
    }

    #[test]
    fn test_demo_seed_survives_validation() {
        let mut store = ProfileStore::with_defaults();
        seed_demo_profiles(&mut store);

        for profile in store.list() {
            assert!(trawler_core::profile::validate(profile).is_empty());
        }
    }
}
