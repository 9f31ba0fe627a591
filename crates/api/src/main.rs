use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexforge_api::config::{ServerConfig, StorageBackend};
use lexforge_api::router::build_app_router;
use lexforge_api::state::AppState;
use lexforge_cloud::{BlobStore, LocalBlobStore, S3BlobStore};
use lexforge_core::crypto::SensitiveValueCipher;
use lexforge_pipeline::DocumentPipeline;
use lexforge_render::chromium::{ChromiumConfig, ChromiumRenderer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexforge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = lexforge_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    lexforge_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    lexforge_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Encryption ---
    // A server that cannot encrypt substituted values must not come up.
    let cipher = SensitiveValueCipher::from_hex(&config.encryption_key_hex)
        .expect("ENCRYPTION_KEY must be 64 hex characters (AES-256)");

    // --- PDF renderer ---
    let renderer = Arc::new(ChromiumRenderer::new(ChromiumConfig::from_env()));

    // --- Blob storage ---
    let blobs: Arc<dyn BlobStore> = match config.storage_backend {
        StorageBackend::S3 => {
            let store = S3BlobStore::from_env().await;
            tracing::info!("Using S3 blob storage");
            Arc::new(store)
        }
        StorageBackend::Local => {
            tracing::info!(root = %config.blob_local_root, "Using local blob storage");
            Arc::new(LocalBlobStore::new(
                &config.blob_local_root,
                &config.blob_base_url,
            ))
        }
    };

    // --- Pipeline ---
    let pipeline = Arc::new(DocumentPipeline::new(
        pool.clone(),
        renderer,
        blobs,
        cipher,
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pipeline,
    };

    // --- Router ---
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

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
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
