use std::net::SocketAddr;
use std::sync::Arc;

use driverflow_api::bootstrap::ensure_super_admin;
use driverflow_api::config::ServerConfig;
use driverflow_api::router::build_app_router;
use driverflow_api::state::AppState;
use driverflow_api::storage::LocalBlobStore;
use driverflow_core::workflow::WorkflowEngine;
use driverflow_db::directory::PgRecipientDirectory;
use driverflow_db::store::PgWorkflowStore;
use driverflow_events::{EmailConfig, EmailDelivery, EmailNotifier, Mailer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "driverflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    // --- Database ---
    let pool = driverflow_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    driverflow_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    driverflow_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    if let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        ensure_super_admin(&pool, &username, &password)
            .await
            .expect("Failed to seed the initial administrator");
    }

    // --- Notifications ---
    let mailer: Option<Arc<dyn Mailer>> = match EmailConfig::from_env() {
        Some(email_config) => match EmailDelivery::new(&email_config) {
            Ok(delivery) => {
                tracing::info!(host = %email_config.smtp_host, "SMTP delivery enabled");
                Some(Arc::new(delivery) as Arc<dyn Mailer>)
            }
            Err(e) => {
                tracing::warn!(error = %e, "SMTP delivery misconfigured, notifications will only be logged");
                None
            }
        },
        None => {
            tracing::info!("SMTP_HOST not set, notifications will only be logged");
            None
        }
    };
    let notifier = EmailNotifier::new(Arc::new(PgRecipientDirectory::new(pool.clone())), mailer);

    // --- Workflow ---
    let engine = WorkflowEngine::new(
        Arc::new(PgWorkflowStore::new(pool.clone())),
        Arc::new(notifier),
    );
    let blobs = LocalBlobStore::new(config.upload_dir.clone());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine: Arc::new(engine),
        blobs: Arc::new(blobs),
    };
    let app = build_app_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST:PORT combination");
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
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
