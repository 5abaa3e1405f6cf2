use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use msp_db::adapters::{LocalMetricsSource, PgClientRegistry, PgHistoryStore};
use msp_monitor::{HealthMonitor, MonitorConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use msp_api::background::history_retention;
use msp_api::config::ServerConfig;
use msp_api::router::build_app_router;
use msp_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "msp_api=debug,msp_monitor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        cors_origins = config.cors_origins.len(),
        "Loaded server configuration"
    );

    let monitor_config = MonitorConfig::from_env();
    tracing::info!(
        check_timeout_ms = monitor_config.check_timeout.as_millis() as u64,
        services = monitor_config.services.len(),
        retention_days = monitor_config.history_retention_days,
        "Loaded monitor configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = msp_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    msp_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    msp_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Health monitor ---
    let local_metrics = Arc::new(LocalMetricsSource::new(
        pool.clone(),
        monitor_config.reading_max_age,
    ));
    let monitor = Arc::new(
        HealthMonitor::from_config(
            Arc::new(PgClientRegistry::new(pool.clone())),
            Arc::new(PgHistoryStore::new(pool.clone())),
            local_metrics.clone(),
            &monitor_config,
        )
        .with_reading_sink(local_metrics),
    );

    // --- History retention ---
    let retention_cancel = CancellationToken::new();
    let retention_handle = tokio::spawn(history_retention::run(
        Arc::clone(&monitor),
        monitor_config.history_retention_days,
        history_retention::CLEANUP_INTERVAL,
        retention_cancel.clone(),
    ));

    // --- Router ---
    let state = AppState { monitor };
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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    retention_cancel.cancel();
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(shutdown_timeout, retention_handle)
        .await
        .is_err()
    {
        tracing::warn!("History retention job did not stop in time");
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
