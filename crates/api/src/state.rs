use std::sync::Arc;

use mindnest_meeting::MeetingProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything non-`Clone` sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: mindnest_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// External meeting provider used when accepting session requests.
    pub meeting_provider: Arc<dyn MeetingProvider>,
}
