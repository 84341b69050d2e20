// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Minimal HTML pages shown at the end of the OAuth flow.

use crate::models::{ActivityRecord, ElevationReport, TokenSet};
use crate::time_utils::format_utc_rfc3339;
use std::fmt::Write;

/// Page shown after a successful OAuth exchange.
pub fn render_summary(
    tokens: &TokenSet,
    activities: &[ActivityRecord],
    report: &ElevationReport,
) -> String {
    let mut body = String::new();

    let greeting = tokens
        .athlete
        .as_ref()
        .map(|a| format!("Hello, {}!", escape(&a.firstname)))
        .unwrap_or_else(|| "Hello!".to_string());
    let _ = writeln!(body, "<h1>{}</h1>", greeting);
    let _ = writeln!(
        body,
        "<p>Access token valid until {}.</p>",
        format_utc_rfc3339(tokens.expires_at)
    );

    match report {
        ElevationReport::NoRelevantActivity => {
            body.push_str("<p>No relevant activity (Run, Walk, Hike) found.</p>\n");
        }
        ElevationReport::Summary(summary) => {
            body.push_str("<h2>Elevation gain</h2>\n<table>\n");
            let rows = [
                ("Total, last 7 days", summary.total_7d),
                ("Average per active day, last 7 days", summary.avg_7d),
                ("Total, last 30 days", summary.total_30d),
                ("Average per active day, last 30 days", summary.avg_30d),
                ("Cumulative, last 30 days", summary.cumulative_30d),
            ];
            for (label, value) in rows {
                let _ = writeln!(body, "<tr><th>{}</th><td>{:.2} m</td></tr>", label, value);
            }
            body.push_str("</table>\n");

            if !summary.daily.is_empty() {
                body.push_str(
                    "<h2>Daily</h2>\n<table>\n<tr><th>Date</th><th>Gain</th><th>Cumulative</th></tr>\n",
                );
                for day in &summary.daily {
                    let _ = writeln!(
                        body,
                        "<tr><td>{}</td><td>{:.2} m</td><td>{:.2} m</td></tr>",
                        day.date, day.elevation_gain_m, day.cumulative_m
                    );
                }
                body.push_str("</table>\n");
            }
        }
    }

    let _ = writeln!(body, "<h2>Activities ({})</h2>", activities.len());
    body.push_str(
        "<table>\n<tr><th>Date</th><th>Name</th><th>Type</th><th>Distance</th><th>Elevation</th></tr>\n",
    );
    for activity in activities {
        let date = activity
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2} km</td><td>{:.2} m</td></tr>",
            date,
            escape(&activity.name),
            escape(&activity.activity_type.to_string()),
            activity.distance_km,
            activity.elevation_gain_m
        );
    }
    body.push_str("</table>\n");

    page("Elevation summary", &body)
}

/// Page shown when the OAuth flow fails.
pub fn render_error(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p>{}</p>\n<p><a href=\"/auth/strava\">Try again</a></p>\n",
        escape(message)
    );
    page("Error", &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Replace the five HTML-special characters with entities.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
