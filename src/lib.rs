// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Elevation: elevation-gain summaries for Strava athletes
//!
//! This crate provides the backend for the Strava OAuth flow, the webhook
//! subscription lifecycle, and the 7/30-day elevation summary.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use services::{StravaClient, SubscriptionManager};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub strava: StravaClient,
    pub subscriptions: SubscriptionManager,
}

impl AppState {
    /// Build the Strava client and subscription manager from `config`.
    pub fn new(config: Config) -> Self {
        let strava = StravaClient::from_config(&config);
        let subscriptions = SubscriptionManager::new(strava.clone(), &config);
        Self {
            config,
            strava,
            subscriptions,
        }
    }
}
