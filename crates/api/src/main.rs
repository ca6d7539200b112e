use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cameo_api::config::ServerConfig;
use cameo_api::router::build_app_router;
use cameo_api::state::AppState;
use cameo_genai::{GenAiClient, GenAiConfig};
use cameo_pipeline::Studio;
use cameo_store::{FileStore, LocalStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cameo_api=debug,cameo_pipeline=debug,cameo_genai=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let genai_config = GenAiConfig::from_env();
    if !genai_config.has_credential() {
        tracing::warn!("GEMINI_API_KEY is not set; generation requests will fail");
    }
    tracing::info!(model = %genai_config.model, "Loaded generation configuration");

    // --- Generation client ---
    let generator = GenAiClient::new(genai_config).expect("Failed to build generation client");

    // --- Local store ---
    let store = LocalStore::open(FileStore::new(&config.data_dir))
        .await
        .expect("Failed to load library from DATA_DIR");
    tracing::info!(data_dir = %config.data_dir.display(), "Local store ready");

    // --- App state ---
    let state = AppState {
        studio: Studio::new(Arc::new(generator), store),
        config: Arc::new(config.clone()),
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
