// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid verify token")]
    InvalidVerifyToken,

    #[error("No active webhook subscription")]
    NoActiveSubscription,

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Non-success status or transport failure talking to Strava.
    /// `status` is `None` when no response was received at all.
    #[error("Strava API error: {message}")]
    StravaApi {
        status: Option<u16>,
        message: String,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a Strava error from a response status and body.
    pub fn strava_status(status: reqwest::StatusCode, body: &str) -> Self {
        AppError::StravaApi {
            status: Some(status.as_u16()),
            message: format!("HTTP {}: {}", status, body),
        }
    }

    /// Build a Strava error for a request that never got a response.
    pub fn strava_transport(context: &str, err: reqwest::Error) -> Self {
        AppError::StravaApi {
            status: None,
            message: format!("{}: {}", context, err),
        }
    }

    /// HTTP status Strava answered with, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::StravaApi { status, .. } => *status,
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidVerifyToken => StatusCode::FORBIDDEN,
            AppError::NoActiveSubscription => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::StravaApi { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error, details) = match &self {
            AppError::InvalidVerifyToken => ("Invalid verify token", None),
            AppError::NoActiveSubscription => (
                "no_active_subscription",
                Some("There is no webhook subscription to remove".to_string()),
            ),
            AppError::Conflict(msg) => ("conflict", Some(msg.clone())),
            AppError::StravaApi { message, .. } => {
                tracing::warn!(error = %message, "Strava API error");
                ("strava_error", Some(message.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                ("internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
