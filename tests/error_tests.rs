// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use strava_elevation::error::AppError;

#[test]
fn test_status_codes() {
    assert_eq!(
        AppError::InvalidVerifyToken.status_code(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        AppError::NoActiveSubscription.status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::Conflict("pending".to_string()).status_code(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        AppError::StravaApi {
            status: Some(500),
            message: "HTTP 500".to_string()
        }
        .status_code(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        AppError::Internal(anyhow::anyhow!("oops")).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_upstream_status_only_for_strava_errors() {
    let err = AppError::StravaApi {
        status: Some(404),
        message: "HTTP 404 Not Found".to_string(),
    };
    assert_eq!(err.upstream_status(), Some(404));

    let err = AppError::StravaApi {
        status: None,
        message: "connection refused".to_string(),
    };
    assert_eq!(err.upstream_status(), None);

    assert_eq!(AppError::NoActiveSubscription.upstream_status(), None);
}

#[tokio::test]
async fn test_invalid_verify_token_body() {
    let response = AppError::InvalidVerifyToken.into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "error": "Invalid verify token" }));
}
