// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth routes.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::error::Result;
use crate::models::summarize_now;
use crate::views;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/strava", get(auth_start))
}

/// Start OAuth flow - redirect to Strava authorization.
///
/// Strava sends the user back to the configured callback URL
/// (`/exchange_token`) with a `code` parameter.
async fn auth_start(State(state): State<Arc<AppState>>) -> Redirect {
    let auth_url = state.strava.authorize_url(&state.config.callback_url);

    tracing::info!(
        client_id = %state.strava.client_id(),
        "Starting OAuth flow, redirecting to Strava"
    );

    Redirect::temporary(&auth_url)
}

/// OAuth redirect: exchange the code, fetch recent activities and render
/// the elevation summary. Failures render an error page.
pub(crate) async fn complete_oauth(state: &AppState, code: &str) -> Response {
    match summary_page(state, code).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, status = ?e.upstream_status(), "OAuth flow failed");
            (e.status_code(), Html(views::render_error(&e.to_string()))).into_response()
        }
    }
}

async fn summary_page(state: &AppState, code: &str) -> Result<String> {
    tracing::info!("Exchanging authorization code for tokens");
    let tokens = state.strava.exchange_code(code).await?;

    let activities = state
        .strava
        .fetch_recent_activities(&tokens.access_token, state.config.activity_days_back)
        .await?;

    let report = summarize_now(&activities);

    Ok(views::render_summary(&tokens, &activities, &report))
}
