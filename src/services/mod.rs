// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - Strava calls and subscription state.

pub mod strava;
pub mod subscription;

pub use strava::{StravaActivitySummary, StravaClient};
pub use subscription::SubscriptionManager;
