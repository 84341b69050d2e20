// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client.
//!
//! Handles:
//! - OAuth authorization-code exchange
//! - Listing recent activities (first page only)
//! - Creating and deleting the push subscription (webhook)

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ActivityRecord, ActivityType, AthleteSummary, TokenSet};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Largest page Strava serves from `/athlete/activities`.
pub const MAX_PER_PAGE: u32 = 200;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(
        api_url: String,
        oauth_url: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            oauth_url,
            client_id,
            client_secret,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.strava_api_url.clone(),
            config.strava_oauth_url.clone(),
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        )
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// URL of Strava's consent page, redirecting back to `redirect_uri`.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/authorize?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             approval_prompt=auto&\
             scope=activity:read_all",
            self.oauth_url,
            self.client_id,
            urlencoding::encode(redirect_uri),
        )
    }

    // ─── OAuth ───────────────────────────────────────────────────────────────

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::strava_transport("Token exchange failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token exchange failed");
            return Err(AppError::strava_status(status, &body));
        }

        let token_response: StravaTokenExchangeResponse =
            response.json().await.map_err(|e| AppError::StravaApi {
                status: None,
                message: format!("Failed to parse token response: {}", e),
            })?;

        let expires_at = DateTime::<Utc>::from_timestamp(token_response.expires_at, 0)
            .ok_or_else(|| AppError::StravaApi {
                status: None,
                message: format!("Invalid token expiry: {}", token_response.expires_at),
            })?;

        tracing::info!(
            athlete_id = token_response.athlete.as_ref().map(|a| a.id),
            "Authorization code exchanged"
        );

        Ok(TokenSet {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            expires_at,
            athlete: token_response.athlete.map(|a| AthleteSummary {
                id: a.id,
                firstname: a.firstname.unwrap_or_default(),
                lastname: a.lastname.unwrap_or_default(),
            }),
        })
    }

    // ─── Activities ──────────────────────────────────────────────────────────

    /// List one page of activities started after `after` (Unix timestamp).
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("after", after.to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::strava_transport("Activity list request failed", e))?;

        let raw: Vec<Value> = self.check_response_json(response).await?;
        Ok(raw
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping activity that is not an object");
                    None
                }
            })
            .collect())
    }

    /// Fetch activities from the last `days_back` days, normalized.
    ///
    /// Only the first page (up to 200 activities) is retrieved.
    pub async fn fetch_recent_activities(
        &self,
        access_token: &str,
        days_back: i64,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        let window = Duration::try_days(days_back).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("days_back out of range: {}", days_back))
        })?;
        let after = (Utc::now() - window).timestamp();

        let activities = self
            .list_activities(access_token, after, 1, MAX_PER_PAGE)
            .await?;

        if activities.len() as u32 >= MAX_PER_PAGE {
            tracing::warn!(
                count = activities.len(),
                "Activity page is full; older activities in range were not fetched"
            );
        }

        tracing::info!(count = activities.len(), days_back, "Fetched activities");

        Ok(activities
            .into_iter()
            .map(StravaActivitySummary::into_record)
            .collect())
    }

    // ─── Push Subscriptions ──────────────────────────────────────────────────

    /// Register a push subscription. Strava answers 201 with the new ID.
    pub async fn create_push_subscription(
        &self,
        callback_url: &str,
        verify_token: &str,
    ) -> Result<u64, AppError> {
        let response = self
            .http
            .post(format!("{}/push_subscriptions", self.api_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("callback_url", callback_url),
                ("verify_token", verify_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::strava_transport("Subscription request failed", e))?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::strava_status(status, &body));
        }

        let created: PushSubscriptionCreated =
            response.json().await.map_err(|e| AppError::StravaApi {
                status: Some(status.as_u16()),
                message: format!("Failed to parse subscription response: {}", e),
            })?;

        Ok(created.id)
    }

    /// Delete a push subscription. Strava answers 204 on success.
    pub async fn delete_push_subscription(&self, subscription_id: u64) -> Result<(), AppError> {
        let response = self
            .http
            .delete(format!(
                "{}/push_subscriptions/{}",
                self.api_url, subscription_id
            ))
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::strava_transport("Unsubscribe request failed", e))?;

        let status = response.status();
        if status != reqwest::StatusCode::NO_CONTENT {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::strava_status(status, &body));
        }

        Ok(())
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
            }

            return Err(AppError::strava_status(status, &body));
        }

        response.json().await.map_err(|e| AppError::StravaApi {
            status: None,
            message: format!("JSON parse error: {}", e),
        })
    }
}

/// Token exchange response from Strava OAuth (includes athlete info).
#[derive(Debug, Clone, Deserialize)]
struct StravaTokenExchangeResponse {
    access_token: String,
    refresh_token: String,
    expires_at: i64,
    #[serde(default)]
    athlete: Option<StravaAthlete>,
}

/// Athlete info from OAuth token exchange.
#[derive(Debug, Clone, Deserialize)]
struct StravaAthlete {
    id: u64,
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PushSubscriptionCreated {
    id: u64,
}

/// Summary activity for list endpoints. Every field is optional and a
/// missing or wrongly typed value becomes `None`, so one odd record is
/// defaulted instead of failing the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StravaActivitySummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Legacy type ("Run" also for trail runs)
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub activity_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sport_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date_local: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    /// Meters
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
    /// Meters
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_elevation_gain: Option<f64>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Numbers, or numeric strings; anything else is treated as missing.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok().filter(|v: &f64| v.is_finite()),
        _ => None,
    })
}

impl StravaActivitySummary {
    /// Normalize into an [`ActivityRecord`], defaulting missing fields.
    pub fn into_record(self) -> ActivityRecord {
        let activity_type = self
            .activity_type
            .as_deref()
            .or(self.sport_type.as_deref())
            .map(ActivityType::from)
            .unwrap_or_else(|| ActivityType::Other("Unknown".to_string()));

        let date = self
            .start_date_local
            .as_deref()
            .or(self.start_date.as_deref())
            .and_then(parse_start_date);

        ActivityRecord {
            name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Unnamed activity".to_string()),
            activity_type,
            date,
            distance_km: self.distance.unwrap_or(0.0) / 1000.0,
            elevation_gain_m: self.total_elevation_gain.unwrap_or(0.0),
        }
    }
}

/// Calendar date of a Strava timestamp ("2024-01-15T10:30:00Z").
///
/// `start_date_local` carries a `Z` even though it is local wall time, so
/// only the date portion is meaningful.
fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    raw.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_record_full() {
        let summary = StravaActivitySummary {
            name: Some("Morning Run".to_string()),
            activity_type: Some("Run".to_string()),
            sport_type: Some("TrailRun".to_string()),
            start_date_local: Some("2024-01-15T06:30:00Z".to_string()),
            start_date: Some("2024-01-15T14:30:00Z".to_string()),
            distance: Some(10500.0),
            total_elevation_gain: Some(321.5),
        };

        let record = summary.into_record();

        assert_eq!(record.name, "Morning Run");
        assert_eq!(record.activity_type, ActivityType::Run);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(record.distance_km, 10.5);
        assert_eq!(record.elevation_gain_m, 321.5);
    }

    #[test]
    fn test_into_record_defaults() {
        let record = StravaActivitySummary::default().into_record();

        assert_eq!(record.name, "Unnamed activity");
        assert_eq!(
            record.activity_type,
            ActivityType::Other("Unknown".to_string())
        );
        assert_eq!(record.date, None);
        assert_eq!(record.distance_km, 0.0);
        assert_eq!(record.elevation_gain_m, 0.0);
    }

    #[test]
    fn test_into_record_falls_back_to_sport_type_and_utc_date() {
        let summary = StravaActivitySummary {
            sport_type: Some("Hike".to_string()),
            start_date: Some("2024-03-02T18:00:00Z".to_string()),
            ..Default::default()
        };

        let record = summary.into_record();

        assert_eq!(record.activity_type, ActivityType::Hike);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 2));
    }

    #[test]
    fn test_wrongly_typed_fields_are_defaulted() {
        let raw = serde_json::json!({
            "name": 42,
            "type": ["Run"],
            "sport_type": "Hike",
            "start_date_local": null,
            "start_date": "2024-05-04T09:00:00Z",
            "distance": "far",
            "total_elevation_gain": "312.5",
        });

        let summary: StravaActivitySummary = serde_json::from_value(raw).unwrap();
        let record = summary.into_record();

        assert_eq!(record.name, "Unnamed activity");
        assert_eq!(record.activity_type, ActivityType::Hike);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 5, 4));
        assert_eq!(record.distance_km, 0.0);
        assert_eq!(record.elevation_gain_m, 312.5);
    }

    #[test]
    fn test_parse_start_date_garbage() {
        assert_eq!(parse_start_date("yesterday"), None);
        assert_eq!(parse_start_date(""), None);
    }

    #[test]
    fn test_authorize_url_encodes_redirect() {
        let client = StravaClient::new(
            "https://api.example".to_string(),
            "https://www.strava.com/oauth".to_string(),
            "42".to_string(),
            "secret".to_string(),
        );

        let url = client.authorize_url("https://example.com/exchange_token");

        assert!(url.starts_with("https://www.strava.com/oauth/authorize?client_id=42&"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fexchange_token"));
        assert!(url.contains("scope=activity:read_all"));
        assert!(!url.contains("secret"));
    }
}
