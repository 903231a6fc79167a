//! REST lifecycle tests against a live API server.

use serde_json::{Value, json};
use trawler_core::profile::ProfileStore;
use trawler_web::{AppState, build_router, seed_demo_profiles};

/// Binds the router on an ephemeral port and returns its base URL.
async fn spawn_server(store: ProfileStore) -> String {
    let app = build_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn spawn_demo_server() -> String {
    let mut store = ProfileStore::with_defaults();
    seed_demo_profiles(&mut store);
    spawn_server(store).await
}

#[tokio::test]
async fn test_full_profile_lifecycle_over_rest() {
    let base = spawn_demo_server().await;
    let client = reqwest::Client::new();

    // Create
    let created: Value = client
        .post(format!("{base}/api/profiles"))
        .json(&json!({ "name": "Lifecycle" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["profile"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["profile"]["name"], "Lifecycle");
    assert_eq!(created["profile"]["is_default"], false);

    // Fetch it back
    let fetched: Value = client
        .get(format!("{base}/api/profiles/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["profile"]["tiers"].as_array().unwrap().len(), 13);

    // Update: rename and bump thresholds
    let mut profile = fetched["profile"].clone();
    profile["name"] = json!("Lifecycle v2");
    profile["upgrade_score_increment"] = json!(50);
    let updated: Value = client
        .put(format!("{base}/api/profiles/{id}"))
        .json(&profile)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["profile"]["name"], "Lifecycle v2");
    assert_eq!(updated["warnings"].as_array().unwrap().len(), 0);

    // Clone
    let response = client
        .post(format!("{base}/api/profiles/{id}/clone"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let cloned: Value = response.json().await.unwrap();
    assert_eq!(cloned["profile"]["name"], "Lifecycle v2 (Copy)");
    let clone_id = cloned["profile"]["id"].as_str().unwrap().to_string();
    assert_ne!(clone_id, id);

    // Delete the clone
    let deleted: Value = client
        .delete(format!("{base}/api/profiles/{clone_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted["success"], true);

    // Gone now
    let status = client
        .get(format!("{base}/api/profiles/{clone_id}"))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reorder_tiers_over_rest() {
    let base = spawn_demo_server().await;
    let client = reqwest::Client::new();

    let listing: Value = client
        .get(format!("{base}/api/profiles"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let profile = &listing["profiles"][0];
    let id = profile["id"].as_str().unwrap();

    // Reverse the enabled tiers
    let mut enabled: Vec<String> = profile["tiers"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["enabled"] == true)
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    enabled.reverse();

    let reordered: Value = client
        .post(format!("{base}/api/profiles/{id}/reorder"))
        .json(&json!({ "tier_ids": enabled }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let tiers = reordered["profile"]["tiers"].as_array().unwrap();
    assert_eq!(tiers[0]["id"].as_str().unwrap(), enabled[0]);
    assert_eq!(tiers[0]["order"], 0);

    // A bogus reorder is rejected without changing the profile
    let status = client
        .post(format!("{base}/api/profiles/{id}/reorder"))
        .json(&json!({ "tier_ids": ["betamax"] }))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, reqwest::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_default_promotion_and_delete_guards() {
    let base = spawn_demo_server().await;
    let client = reqwest::Client::new();

    let listing: Value = client
        .get(format!("{base}/api/profiles"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let profiles = listing["profiles"].as_array().unwrap();
    let default_id = profiles[0]["id"].as_str().unwrap();
    assert_eq!(profiles[0]["is_default"], true);
    let other_id = profiles[1]["id"].as_str().unwrap();

    // The default profile refuses deletion
    let status = client
        .delete(format!("{base}/api/profiles/{default_id}"))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, reqwest::StatusCode::CONFLICT);

    // Promote another, then the old default deletes fine
    client
        .post(format!("{base}/api/profiles/{other_id}/default"))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();
    let status = client
        .delete(format!("{base}/api/profiles/{default_id}"))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, reqwest::StatusCode::OK);
}

#[tokio::test]
async fn test_last_profile_cannot_be_deleted() {
    let mut store = ProfileStore::with_defaults();
    store.create("Only");
    let base = spawn_server(store).await;
    let client = reqwest::Client::new();

    let listing: Value = client
        .get(format!("{base}/api/profiles"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = listing["profiles"][0]["id"].as_str().unwrap();

    let status = client
        .delete(format!("{base}/api/profiles/{id}"))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, reqwest::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_stats_reflect_store_contents() {
    let base = spawn_demo_server().await;
    let client = reqwest::Client::new();

    let stats: Value = client
        .get(format!("{base}/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats["profiles"], 3);
    assert!(stats["default_profile"].is_string());
    assert!(stats["custom_formats"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_update_surfaces_validation_warnings() {
    let base = spawn_demo_server().await;
    let client = reqwest::Client::new();

    let listing: Value = client
        .get(format!("{base}/api/profiles"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mut profile = listing["profiles"][0].clone();
    let id = profile["id"].as_str().unwrap().to_string();

    // Score the same format twice: saved, but flagged
    profile["format_scores"] = json!([
        { "format_id": "x265", "score": 100 },
        { "format_id": "x265", "score": 250 },
    ]);

    let updated: Value = client
        .put(format!("{base}/api/profiles/{id}"))
        .json(&profile)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["warnings"].as_array().unwrap().len(), 1);

    // An out-of-range floor is rejected outright
    profile["min_format_score"] = json!(5_000_000);
    let status = client
        .put(format!("{base}/api/profiles/{id}"))
        .json(&profile)
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, reqwest::StatusCode::UNPROCESSABLE_ENTITY);
}
