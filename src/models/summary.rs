//! Elevation-gain summary over recent on-foot activities.
//!
//! Recomputed from the fetched activities on every request; nothing here is
//! cached or stored.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::ActivityRecord;

/// Elevation gained on one calendar day within the 30-day window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyElevation {
    pub date: NaiveDate,
    /// Sum of elevation gain over the day's activities (meters)
    pub elevation_gain_m: f64,
    /// Running total from the start of the 30-day window (meters)
    pub cumulative_m: f64,
}

/// Elevation totals and per-active-day means. All values are meters,
/// rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationSummary {
    pub total_7d: f64,
    pub avg_7d: f64,
    pub total_30d: f64,
    pub avg_30d: f64,
    /// Running total as of the latest day in the 30-day window (0 if empty)
    pub cumulative_30d: f64,
    /// Per-day breakdown of the 30-day window, oldest first
    pub daily: Vec<DailyElevation>,
}

/// Outcome of summarizing a batch of activities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElevationReport {
    /// No Run/Walk/Hike activity with a usable date.
    NoRelevantActivity,
    Summary(ElevationSummary),
}

/// Summarize relative to today's local calendar date.
pub fn summarize_now(records: &[ActivityRecord]) -> ElevationReport {
    summarize(records, Local::now().date_naive())
}

/// Summarize elevation gain for the 7 and 30 days ending on `today`.
///
/// Windows are inclusive on both ends: the 7-day window covers
/// `today - 7 days ..= today`. Means are taken over days that actually have
/// an activity, not over calendar days.
pub fn summarize(records: &[ActivityRecord], today: NaiveDate) -> ElevationReport {
    let by_date = elevation_by_date(records);
    if by_date.is_empty() {
        return ElevationReport::NoRelevantActivity;
    }

    let (total_7d, avg_7d) = window_stats(&by_date, today, 7);
    let (total_30d, avg_30d) = window_stats(&by_date, today, 30);

    let mut cumulative = 0.0;
    let daily: Vec<DailyElevation> = by_date
        .range(window_start(today, 30)..=today)
        .map(|(date, gain)| {
            cumulative += gain;
            DailyElevation {
                date: *date,
                elevation_gain_m: round2(*gain),
                cumulative_m: round2(cumulative),
            }
        })
        .collect();

    let cumulative_30d = daily.last().map(|d| d.cumulative_m).unwrap_or(0.0);

    ElevationReport::Summary(ElevationSummary {
        total_7d: round2(total_7d),
        avg_7d: round2(avg_7d),
        total_30d: round2(total_30d),
        avg_30d: round2(avg_30d),
        cumulative_30d,
        daily,
    })
}

/// Sum elevation per calendar date over on-foot activities.
fn elevation_by_date(records: &[ActivityRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut by_date = BTreeMap::new();
    for record in records.iter().filter(|r| r.activity_type.is_on_foot()) {
        // Undated records can't be placed in a window
        if let Some(date) = record.date {
            *by_date.entry(date).or_insert(0.0) += record.elevation_gain_m;
        }
    }
    by_date
}

fn window_start(today: NaiveDate, days: i64) -> NaiveDate {
    today - Duration::days(days)
}

/// Total and per-active-day mean over `[today - days, today]`.
fn window_stats(by_date: &BTreeMap<NaiveDate, f64>, today: NaiveDate, days: i64) -> (f64, f64) {
    let (total, count) = by_date
        .range(window_start(today, days)..=today)
        .fold((0.0, 0usize), |(total, count), (_, gain)| {
            (total + gain, count + 1)
        });

    if count == 0 {
        (0.0, 0.0)
    } else {
        (total, total / count as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
