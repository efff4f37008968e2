use std::str::FromStr;

use mindnest_core::error::CoreError;
use mindnest_core::session::validate_session_ttl;
use mindnest_core::therapy_session::{resolve_duration, DEFAULT_DURATION_MINUTES};
use mindnest_meeting::ZoomConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Zoom credentials
/// are optional; without them accepted requests fall back to manual links.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Lifetime of a login session in hours (default: `24`).
    pub session_ttl_hours: i64,
    /// Meeting length used when accept does not specify one (default: `60`).
    pub default_meeting_minutes: i32,
    /// Zoom server-to-server OAuth credentials, if configured.
    pub zoom: Option<ZoomConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `SESSION_TTL_HOURS`       | `24`                    |
    /// | `DEFAULT_MEETING_MINUTES` | `60`                    |
    ///
    /// Zoom variables are documented on [`ZoomConfig::from_env`].
    ///
    /// Panics on unparseable or out-of-range values so misconfiguration
    /// fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Self {
            host,
            port: env_parse("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            session_ttl_hours: env_parse("SESSION_TTL_HOURS", 24),
            default_meeting_minutes: env_parse("DEFAULT_MEETING_MINUTES", DEFAULT_DURATION_MINUTES),
            zoom: ZoomConfig::from_env(),
        };

        if let Err(e) = config.validate() {
            panic!("Invalid server configuration: {e}");
        }
        config
    }

    /// Range-check the numeric settings.
    ///
    /// `SESSION_TTL_HOURS` must be 1..=8760 and `DEFAULT_MEETING_MINUTES`
    /// must be a valid meeting length.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_session_ttl(self.session_ttl_hours)?;
        resolve_duration(Some(self.default_meeting_minutes), DEFAULT_DURATION_MINUTES)?;
        Ok(())
    }
}

/// Read and parse `key`, falling back to `default` when unset.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid number ('{raw}'): {e}")),
        Err(_) => default,
    }
}
