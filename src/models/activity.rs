// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Normalized activity record used by the summarizer and the result page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Activity type, as reported by Strava's `type`/`sport_type` fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    Run,
    Walk,
    Hike,
    Ride,
    Swim,
    Other(String),
}

impl ActivityType {
    /// Types that count towards the elevation summary.
    pub fn is_on_foot(&self) -> bool {
        matches!(self, ActivityType::Run | ActivityType::Walk | ActivityType::Hike)
    }
}

impl From<&str> for ActivityType {
    fn from(value: &str) -> Self {
        match value {
            "Run" | "TrailRun" => ActivityType::Run,
            "Walk" => ActivityType::Walk,
            "Hike" => ActivityType::Hike,
            "Ride" => ActivityType::Ride,
            "Swim" => ActivityType::Swim,
            other => ActivityType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityType::Run => f.write_str("Run"),
            ActivityType::Walk => f.write_str("Walk"),
            ActivityType::Hike => f.write_str("Hike"),
            ActivityType::Ride => f.write_str("Ride"),
            ActivityType::Swim => f.write_str("Swim"),
            ActivityType::Other(name) => f.write_str(name),
        }
    }
}

/// One activity, normalized from Strava's summary representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Activity name/title
    pub name: String,
    pub activity_type: ActivityType,
    /// Local start date; `None` when Strava omitted or garbled it
    pub date: Option<NaiveDate>,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Total elevation gain in meters
    pub elevation_gain_m: f64,
}
