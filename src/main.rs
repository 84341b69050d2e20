// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Elevation API Server
//!
//! Registers a Strava webhook subscription, handles the OAuth redirect and
//! shows a 7/30-day elevation summary of the athlete's recent activities.

use std::sync::Arc;
use strava_elevation::{config::Config, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        callback_url = %config.callback_url,
        auto_subscribe = config.auto_subscribe,
        "Starting Strava-Elevation API"
    );

    let shutdown_grace = config.shutdown_grace;
    let addr = format!("0.0.0.0:{}", config.port);

    // Build shared state
    let state = Arc::new(AppState::new(config));

    // Build router
    let app = strava_elevation::routes::create_router(state.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Best effort: the unsubscribe may not finish before we exit.
    let unsubscribe = state.subscriptions.schedule_unsubscribe();
    if tokio::time::timeout(shutdown_grace, unsubscribe)
        .await
        .is_err()
    {
        tracing::warn!(
            grace_secs = shutdown_grace.as_secs(),
            "Webhook unsubscribe did not finish before shutdown"
        );
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_elevation=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
