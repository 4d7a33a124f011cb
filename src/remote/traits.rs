//! Trait abstraction for the remote side to enable mocking in tests

use super::types::{BookingRequest, NavigationRequest, ProfileLookup, RegistrationRequest, RemoteReply};
use anyhow::Result;
use async_trait::async_trait;

/// Remote operations the form workflows submit to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Create a visitor account
    async fn submit_registration(&self, request: RegistrationRequest) -> Result<RemoteReply>;

    /// Request a visit; resolves on acceptance, errors with a user-facing message otherwise
    async fn submit_booking(&self, request: BookingRequest) -> Result<()>;

    /// Look up the visitor profile stored for `email`
    async fn fetch_profile(&self, email: &str) -> Result<ProfileLookup>;

    /// Sign in through the external identity provider
    async fn sign_in_with_provider(&self) -> Result<RemoteReply>;
}

/// Performs route transitions on behalf of a workflow
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, request: &NavigationRequest);
}
