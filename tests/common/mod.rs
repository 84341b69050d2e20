// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{Request, Response};
use std::sync::Arc;
use strava_elevation::config::Config;
use strava_elevation::routes::create_router;
use strava_elevation::AppState;
use wiremock::MockServer;

/// Config pointing both Strava base URLs at a mock server.
#[allow(dead_code)]
pub fn mock_config(server: &MockServer) -> Config {
    Config {
        strava_api_url: format!("{}/api/v3", server.uri()),
        strava_oauth_url: format!("{}/oauth", server.uri()),
        ..Config::default()
    }
}

/// Create a test app from a config.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Create a test app that never talks to a real Strava.
#[allow(dead_code)]
pub fn create_offline_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app(Config {
        strava_api_url: "http://127.0.0.1:9/api/v3".to_string(),
        strava_oauth_url: "http://127.0.0.1:9/oauth".to_string(),
        ..Config::default()
    })
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
