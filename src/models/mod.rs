// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod subscription;
pub mod summary;
pub mod token;

pub use activity::{ActivityRecord, ActivityType};
pub use subscription::Subscription;
pub use summary::{summarize, summarize_now, DailyElevation, ElevationReport, ElevationSummary};
pub use token::{AthleteSummary, TokenSet};
