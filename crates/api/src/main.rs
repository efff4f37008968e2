use std::net::SocketAddr;
use std::sync::Arc;

use mindnest_api::config::ServerConfig;
use mindnest_api::router::build_app_router;
use mindnest_api::state::AppState;
use mindnest_db::repositories::SessionRepo;
use mindnest_meeting::{DisabledProvider, MeetingProvider, ZoomProvider};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        zoom_configured = config.zoom.is_some(),
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = mindnest_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    mindnest_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    mindnest_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    match SessionRepo::cleanup_expired(&pool).await {
        Ok(removed) => tracing::info!(removed, "Expired login sessions removed"),
        Err(e) => tracing::warn!(error = %e, "Failed to remove expired login sessions"),
    }

    // --- Meeting provider ---
    let meeting_provider = build_meeting_provider(&config);
    tracing::info!(provider = meeting_provider.name(), "Meeting provider ready");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        meeting_provider,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mindnest_api=debug,mindnest_meeting=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Zoom when credentials are configured, otherwise the disabled provider.
fn build_meeting_provider(config: &ServerConfig) -> Arc<dyn MeetingProvider> {
    let Some(zoom) = config.zoom.clone() else {
        return Arc::new(DisabledProvider);
    };

    match ZoomProvider::new(zoom) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build Zoom client, meetings disabled");
            Arc::new(DisabledProvider)
        }
    }
}

/// Wait for SIGINT or SIGTERM to begin graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
