//! External video-meeting providers.
//!
//! The scheduling flow only needs one thing from a provider: given a start
//! time and a duration, create a meeting and hand back a join link.
//! [`MeetingProvider`] captures that contract so the API layer can hold any
//! implementation behind `Arc<dyn MeetingProvider>`:
//!
//! - [`zoom::ZoomProvider`] -- Zoom server-to-server OAuth integration.
//! - [`DisabledProvider`] -- used when no provider is configured; always fails
//!   with [`MeetingError::NotConfigured`].

pub mod zoom;

use async_trait::async_trait;
use mindnest_core::types::Timestamp;
use serde::{Deserialize, Serialize};

pub use zoom::{ZoomConfig, ZoomProvider};

/// What the caller wants scheduled.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingRequest {
    pub topic: String,
    pub start_time: Timestamp,
    pub duration_minutes: i32,
}

/// A meeting created by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Meeting {
    /// Link participants use to join.
    pub join_url: String,
    /// Host link, when the provider issues one.
    pub start_url: Option<String>,
    /// Provider-side meeting identifier.
    pub external_id: Option<String>,
}

/// Errors from a meeting provider.
#[derive(Debug, thiserror::Error)]
pub enum MeetingError {
    /// No provider credentials are configured.
    #[error("Meeting provider is not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Meeting provider error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The provider answered 2xx but the body was not usable.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Creates video meetings for accepted session requests.
#[async_trait]
pub trait MeetingProvider: Send + Sync {
    /// Short provider name for logs (e.g. `"zoom"`).
    fn name(&self) -> &'static str;

    async fn create_meeting(&self, request: &MeetingRequest) -> Result<Meeting, MeetingError>;
}

/// Provider used when no credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledProvider;

#[async_trait]
impl MeetingProvider for DisabledProvider {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn create_meeting(&self, _request: &MeetingRequest) -> Result<Meeting, MeetingError> {
        Err(MeetingError::NotConfigured)
    }
}
