// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OAuth token set returned by the authorization-code exchange.

use chrono::{DateTime, Utc};

/// Tokens for one athlete. Lives only for the request that produced it.
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    /// Athlete summary Strava includes with the exchange response.
    pub athlete: Option<AthleteSummary>,
}

/// Minimal athlete profile for greeting the user.
#[derive(Debug, Clone)]
pub struct AthleteSummary {
    pub id: u64,
    pub firstname: String,
    pub lastname: String,
}
