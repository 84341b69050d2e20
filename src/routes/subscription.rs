// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Manual webhook subscription management.

use crate::error::Result;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/subscribe", post(subscribe))
        .route("/unsubscribe", post(unsubscribe))
        .route("/subscription", get(status))
}

#[derive(Serialize)]
pub struct SubscribeResponse {
    pub subscription_id: u64,
}

#[derive(Serialize)]
pub struct UnsubscribeResponse {
    pub message: String,
    pub subscription_id: u64,
}

#[derive(Serialize)]
pub struct SubscriptionStatus {
    pub active: bool,
    pub subscription_id: Option<u64>,
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SubscribeResponse>)> {
    let subscription_id = state.subscriptions.subscribe().await?;
    Ok((StatusCode::CREATED, Json(SubscribeResponse { subscription_id })))
}

async fn unsubscribe(State(state): State<Arc<AppState>>) -> Result<Json<UnsubscribeResponse>> {
    let subscription_id = state.subscriptions.unsubscribe().await?;
    Ok(Json(UnsubscribeResponse {
        message: "Unsubscribed from webhook".to_string(),
        subscription_id,
    }))
}

async fn status(State(state): State<Arc<AppState>>) -> Json<SubscriptionStatus> {
    let current = state.subscriptions.current().await;
    Json(SubscriptionStatus {
        active: current.is_some_and(|s| s.active),
        subscription_id: current.map(|s| s.id),
    })
}
