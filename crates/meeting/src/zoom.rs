//! Zoom meeting provider.
//!
//! Uses Zoom's server-to-server OAuth flow: every meeting creation first
//! exchanges the account credentials for an access token, then creates a
//! scheduled meeting for the account owner (`users/me`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{Meeting, MeetingError, MeetingProvider, MeetingRequest};

/// HTTP request timeout for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Zoom meeting type for a scheduled (non-recurring) meeting.
const SCHEDULED_MEETING_TYPE: i32 = 2;

pub const DEFAULT_API_BASE: &str = "https://api.zoom.us/v2";
pub const DEFAULT_OAUTH_BASE: &str = "https://zoom.us";

/// Zoom server-to-server OAuth credentials and endpoints.
#[derive(Clone)]
pub struct ZoomConfig {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub oauth_base: String,
}

impl std::fmt::Debug for ZoomConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomConfig")
            .field("account_id", &self.account_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("oauth_base", &self.oauth_base)
            .finish()
    }
}

impl ZoomConfig {
    /// Load Zoom configuration from environment variables.
    ///
    /// | Env Var              | Required | Default                  |
    /// |----------------------|----------|--------------------------|
    /// | `ZOOM_ACCOUNT_ID`    | yes      | --                       |
    /// | `ZOOM_CLIENT_ID`     | yes      | --                       |
    /// | `ZOOM_CLIENT_SECRET` | yes      | --                       |
    /// | `ZOOM_API_BASE`      | no       | `https://api.zoom.us/v2` |
    /// | `ZOOM_OAUTH_BASE`    | no       | `https://zoom.us`        |
    ///
    /// Returns `None` unless all three credentials are set and non-empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let required = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Some(Self {
            account_id: required("ZOOM_ACCOUNT_ID")?,
            client_id: required("ZOOM_CLIENT_ID")?,
            client_secret: required("ZOOM_CLIENT_SECRET")?,
            api_base: lookup("ZOOM_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            oauth_base: lookup("ZOOM_OAUTH_BASE")
                .unwrap_or_else(|| DEFAULT_OAUTH_BASE.to_string()),
        })
    }
}

/// Response of the `/oauth/token` endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// The subset of Zoom's meeting object the scheduling flow uses.
#[derive(Debug, Deserialize)]
struct MeetingResponse {
    id: serde_json::Value,
    join_url: Option<String>,
    start_url: Option<String>,
}

/// HTTP client for the Zoom REST API.
pub struct ZoomProvider {
    client: reqwest::Client,
    config: ZoomConfig,
}

impl ZoomProvider {
    /// Create a provider with its own HTTP client.
    pub fn new(config: ZoomConfig) -> Result<Self, MeetingError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    /// Create a provider reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: ZoomConfig) -> Self {
        Self { client, config }
    }

    fn token_url(&self) -> String {
        format!("{}/oauth/token", self.config.oauth_base.trim_end_matches('/'))
    }

    /// Account-credentials token exchange, authenticated with the client
    /// id and secret.
    fn token_request(&self) -> reqwest::RequestBuilder {
        self.client
            .post(self.token_url())
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", self.config.account_id.as_str()),
            ])
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
    }

    fn meetings_url(&self) -> String {
        format!("{}/users/me/meetings", self.config.api_base.trim_end_matches('/'))
    }

    async fn fetch_access_token(&self) -> Result<String, MeetingError> {
        let response = self.token_request().send().await?;

        let token: TokenResponse = parse_response(response).await?;
        Ok(token.access_token)
    }
}

/// JSON body for `POST /users/me/meetings`.
fn meeting_body(request: &MeetingRequest) -> serde_json::Value {
    serde_json::json!({
        "topic": request.topic,
        "type": SCHEDULED_MEETING_TYPE,
        "start_time": request.start_time.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        "duration": request.duration_minutes,
        "timezone": "UTC",
    })
}

/// Turn Zoom's meeting object into a [`Meeting`].
fn into_meeting(response: MeetingResponse) -> Result<Meeting, MeetingError> {
    let join_url = response
        .join_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| MeetingError::InvalidResponse("missing join_url".into()))?;

    let external_id = match response.id {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    };

    Ok(Meeting {
        join_url,
        start_url: response.start_url,
        external_id,
    })
}

/// Ensure the response has a success status code, otherwise capture the
/// status and body text as [`MeetingError::Api`].
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, MeetingError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(MeetingError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, MeetingError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl MeetingProvider for ZoomProvider {
    fn name(&self) -> &'static str {
        "zoom"
    }

    async fn create_meeting(&self, request: &MeetingRequest) -> Result<Meeting, MeetingError> {
        let access_token = self.fetch_access_token().await?;

        let response = self
            .client
            .post(self.meetings_url())
            .bearer_auth(access_token)
            .json(&meeting_body(request))
            .send()
            .await?;

        let meeting: MeetingResponse = parse_response(response).await?;
        let meeting = into_meeting(meeting)?;

        tracing::info!(
            provider = "zoom",
            external_id = ?meeting.external_id,
            start_time = %request.start_time,
            "Meeting created"
        );
        Ok(meeting)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
