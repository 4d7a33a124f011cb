//! Backend that accepts every submission locally
//!
//! Used by the command-line driver when no real service is wired in. Every
//! call is logged with its payload (passwords redacted) and answered with the
//! same shapes the real service returns.

use super::traits::RemoteBackend;
use super::types::{BookingRequest, ProfileLookup, ProfileRecord, RegistrationRequest, RemoteReply};
use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

/// Latency applied to every call
const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

pub struct DryRunBackend {
    latency: Duration,
    /// When set, the provider sign-in is refused with this message
    sign_in_failure: Option<String>,
}

impl DryRunBackend {
    pub fn new() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            sign_in_failure: Some("External sign-in is not available in dry-run mode".to_string()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Accept provider sign-in instead of refusing it
    pub fn with_sign_in(mut self) -> Self {
        self.sign_in_failure = None;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for DryRunBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteBackend for DryRunBackend {
    async fn submit_registration(&self, request: RegistrationRequest) -> Result<RemoteReply> {
        self.simulate_latency().await;
        tracing::info!(
            email = %request.email,
            full_name = %request.full_name,
            "dry-run registration accepted"
        );
        Ok(RemoteReply::accepted("Registered"))
    }

    async fn submit_booking(&self, request: BookingRequest) -> Result<()> {
        self.simulate_latency().await;
        if request.is_empty() {
            bail!("Booking request is empty");
        }
        let payload = serde_json::to_string(&request)?;
        tracing::info!(%payload, "dry-run booking accepted");
        Ok(())
    }

    async fn fetch_profile(&self, email: &str) -> Result<ProfileLookup> {
        self.simulate_latency().await;
        let mut user = Map::new();
        user.insert("email".to_string(), Value::String(email.to_string()));
        tracing::debug!(email, "dry-run profile lookup");
        Ok(ProfileLookup {
            ok: true,
            user: Some(ProfileRecord(user)),
        })
    }

    async fn sign_in_with_provider(&self) -> Result<RemoteReply> {
        self.simulate_latency().await;
        Ok(match &self.sign_in_failure {
            Some(message) => RemoteReply::rejected(message.clone()),
            None => RemoteReply::accepted("Signed in"),
        })
    }
}
