// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook callback routes for Strava.
//!
//! Strava uses the same URL as OAuth redirect target and webhook callback,
//! so `GET /exchange_token` dispatches on the query parameters present.

use crate::error::AppError;
use crate::routes::auth::complete_oauth;
use crate::views;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/exchange_token", get(exchange_token).post(handle_event))
}

/// Query parameters of the callback URL. Any combination may be present.
#[derive(Deserialize, Default)]
struct CallbackParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    code: Option<String>,
    error: Option<String>,
}

/// Verification response.
#[derive(Serialize)]
pub struct ChallengeResponse {
    #[serde(rename = "hub.challenge")]
    pub challenge: String,
}

/// Answer Strava's subscription handshake.
pub fn verify_challenge(
    expected_token: &str,
    challenge: String,
    verify_token: Option<&str>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let matches = verify_token
        .map(|t| bool::from(t.as_bytes().ct_eq(expected_token.as_bytes())))
        .unwrap_or(false);

    if matches {
        tracing::info!("Webhook subscription verified");
        Ok(Json(ChallengeResponse { challenge }))
    } else {
        tracing::warn!("Webhook verification failed: invalid token");
        Err(AppError::InvalidVerifyToken)
    }
}

/// Handshake, OAuth redirect, or plain health check (GET).
///
/// A GET without `hub.challenge` must answer 2xx or Strava refuses to keep
/// the subscription.
async fn exchange_token(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unparseable callback query, treating as bare GET");
            CallbackParams::default()
        }
    };

    if let Some(challenge) = params.challenge {
        tracing::debug!(mode = ?params.mode, "Webhook handshake received");
        return verify_challenge(
            &state.config.webhook_verify_token,
            challenge,
            params.verify_token.as_deref(),
        )
        .into_response();
    }

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Strava");
        return (
            StatusCode::BAD_REQUEST,
            Html(views::render_error(&format!(
                "Strava authorization was not granted ({}).",
                error
            ))),
        )
            .into_response();
    }

    if let Some(code) = params.code {
        return complete_oauth(&state, &code).await;
    }

    (StatusCode::OK, "Webhook endpoint").into_response()
}

/// Strava webhook event payload.
#[derive(Deserialize, Debug)]
struct WebhookEvent {
    object_type: String, // "activity" or "athlete"
    object_id: u64,
    aspect_type: String, // "create", "update", "delete"
    owner_id: u64,
    subscription_id: u64,
    #[serde(default)]
    updates: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Handle incoming webhook events (POST).
///
/// Events are only logged. Always answers 200 so Strava doesn't retry.
async fn handle_event(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse webhook event");
            return StatusCode::OK;
        }
    };

    let current = state.subscriptions.current().await;
    if current.map(|s| s.id) != Some(event.subscription_id) {
        tracing::warn!(
            received_id = event.subscription_id,
            expected_id = ?current.map(|s| s.id),
            "Webhook event for unknown subscription"
        );
    }

    tracing::info!(
        object_type = %event.object_type,
        object_id = event.object_id,
        aspect_type = %event.aspect_type,
        owner_id = event.owner_id,
        updates = ?event.updates,
        "Webhook event received"
    );

    StatusCode::OK
}
