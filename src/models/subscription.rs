// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava push subscription (webhook) registration.

use serde::Serialize;

/// The one webhook subscription this process holds with Strava.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subscription {
    /// Strava push subscription ID
    pub id: u64,
    pub active: bool,
}

impl Subscription {
    pub fn new(id: u64) -> Self {
        Self { id, active: true }
    }
}
