// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook subscription lifecycle.
//!
//! The process holds at most one Strava push subscription. It is registered
//! a few seconds after the first inbound request (so the callback URL is
//! reachable when Strava sends its validation GET) and removed, best-effort,
//! on shutdown or on request.

use crate::config::Config;
use crate::error::AppError;
use crate::models::Subscription;
use crate::services::strava::StravaClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// State guarded by the manager's mutex.
#[derive(Debug, Default)]
struct SubscriptionState {
    subscription: Option<Subscription>,
    /// A subscribe or unsubscribe call is talking to Strava.
    pending: bool,
    /// The startup subscribe has been scheduled.
    startup_scheduled: bool,
}

/// Owns the single webhook subscription and serializes changes to it.
///
/// The lock is only held for in-memory updates, never across a Strava call.
#[derive(Clone)]
pub struct SubscriptionManager {
    client: StravaClient,
    callback_url: String,
    verify_token: String,
    auto_subscribe: bool,
    subscribe_delay: Duration,
    unsubscribe_delay: Duration,
    state: Arc<Mutex<SubscriptionState>>,
}

impl SubscriptionManager {
    pub fn new(client: StravaClient, config: &Config) -> Self {
        Self {
            client,
            callback_url: config.callback_url.clone(),
            verify_token: config.webhook_verify_token.clone(),
            auto_subscribe: config.auto_subscribe,
            subscribe_delay: config.subscribe_delay,
            unsubscribe_delay: config.unsubscribe_delay,
            state: Arc::new(Mutex::new(SubscriptionState::default())),
        }
    }

    /// Current subscription, if any.
    pub async fn current(&self) -> Option<Subscription> {
        self.state.lock().await.subscription
    }

    /// Register the webhook with Strava and remember its ID.
    ///
    /// Fails without contacting Strava if a subscription is already held or
    /// another subscribe/unsubscribe is in flight.
    pub async fn subscribe(&self) -> Result<u64, AppError> {
        {
            let mut state = self.state.lock().await;
            if let Some(existing) = state.subscription {
                return Err(AppError::Conflict(format!(
                    "Already subscribed (subscription {})",
                    existing.id
                )));
            }
            if state.pending {
                return Err(AppError::Conflict(
                    "A subscription change is already in progress".to_string(),
                ));
            }
            state.pending = true;
        }

        let manager = self.clone();
        let task = tokio::spawn(async move { manager.finish_subscribe().await });
        self.join_change(task).await
    }

    /// Strava call plus state update for `subscribe`. Runs in its own task so
    /// `pending` is cleared and a created ID is kept even if the caller is
    /// dropped mid-request.
    async fn finish_subscribe(&self) -> Result<u64, AppError> {
        tracing::info!(callback_url = %self.callback_url, "Subscribing to Strava webhook");

        let result = self
            .client
            .create_push_subscription(&self.callback_url, &self.verify_token)
            .await;

        let mut state = self.state.lock().await;
        state.pending = false;

        match result {
            Ok(id) => {
                state.subscription = Some(Subscription::new(id));
                tracing::info!(subscription_id = id, "Subscribed to Strava webhook");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to subscribe to Strava webhook");
                Err(e)
            }
        }
    }

    /// Delete the current subscription at Strava and forget it.
    ///
    /// Returns the removed subscription ID. On failure the subscription is
    /// kept so the caller can try again.
    pub async fn unsubscribe(&self) -> Result<u64, AppError> {
        let id = {
            let mut state = self.state.lock().await;
            if state.pending {
                return Err(AppError::Conflict(
                    "A subscription change is already in progress".to_string(),
                ));
            }
            let id = state
                .subscription
                .map(|s| s.id)
                .ok_or(AppError::NoActiveSubscription)?;
            state.pending = true;
            id
        };

        let manager = self.clone();
        let task = tokio::spawn(async move { manager.finish_unsubscribe(id).await });
        self.join_change(task).await
    }

    /// Strava call plus state update for `unsubscribe`, run detached like
    /// [`Self::finish_subscribe`].
    async fn finish_unsubscribe(&self, id: u64) -> Result<u64, AppError> {
        tracing::info!(subscription_id = id, "Unsubscribing from Strava webhook");

        let result = self.client.delete_push_subscription(id).await;

        let mut state = self.state.lock().await;
        state.pending = false;

        match result {
            Ok(()) => {
                state.subscription = None;
                tracing::info!(subscription_id = id, "Unsubscribed from Strava webhook");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    subscription_id = id,
                    "Failed to unsubscribe from Strava webhook"
                );
                Err(e)
            }
        }
    }

    /// Wait for a subscription change task. A panicked task never reached its
    /// state update, so `pending` is released here instead.
    async fn join_change(
        &self,
        task: JoinHandle<Result<u64, AppError>>,
    ) -> Result<u64, AppError> {
        match task.await {
            Ok(result) => result,
            Err(e) => {
                self.state.lock().await.pending = false;
                Err(AppError::Internal(anyhow::anyhow!(
                    "Subscription task failed: {}",
                    e
                )))
            }
        }
    }

    /// Forget the local subscription without telling Strava.
    pub async fn reset(&self) -> Option<Subscription> {
        let previous = self.state.lock().await.subscription.take();
        if let Some(sub) = previous {
            tracing::warn!(subscription_id = sub.id, "Subscription state reset locally");
        }
        previous
    }

    /// Schedule the startup subscribe, once per process.
    ///
    /// Returns `true` for the call that scheduled it.
    pub async fn ensure_started(&self) -> bool {
        if !self.auto_subscribe {
            return false;
        }

        {
            let mut state = self.state.lock().await;
            if state.startup_scheduled {
                return false;
            }
            state.startup_scheduled = true;
        }

        tracing::info!(
            delay_secs = self.subscribe_delay.as_secs(),
            "Scheduling webhook subscription"
        );

        let manager = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(manager.subscribe_delay).await;
            // Errors are already logged by subscribe(); nobody is waiting on the result.
            let _ = manager.subscribe().await;
        });

        true
    }

    /// Schedule a best-effort unsubscribe, e.g. on shutdown.
    ///
    /// The process may exit before the task finishes.
    pub fn schedule_unsubscribe(&self) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(manager.unsubscribe_delay).await;
            // Other failures are logged by unsubscribe()
            if let Err(AppError::NoActiveSubscription) = manager.unsubscribe().await {
                tracing::debug!("No webhook subscription to remove");
            }
        })
    }
}
