// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! First-request hook that kicks off the webhook subscription.

use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Schedule the delayed webhook subscribe on the first inbound request.
///
/// The request itself never waits for the subscription.
pub async fn schedule_subscription(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if state.subscriptions.ensure_started().await {
        tracing::debug!(path = %request.uri().path(), "First request seen");
    }

    next.run(request).await
}
