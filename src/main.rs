use dealership_reviews_api::api::{self, AppState};
use dealership_reviews_api::config::AppConfig;
use dealership_reviews_api::repository;
use dealership_reviews_api::seed;
use dealership_reviews_api::storage::{DocumentStore, MemoryStore};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting Dealership Reviews API");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Server: {}", config.bind_address());
    info!("   - Seeding: {}", config.seed.enabled);

    // Initialize document store
    info!("💾 Initializing document store...");
    let store = match &config.storage.data_dir {
        Some(dir) => {
            info!("📂 Loading snapshots from {:?}", dir);
            MemoryStore::open(dir).await?
        }
        None => MemoryStore::new(),
    };
    let store = Arc::new(store);
    repository::ensure_indexes(store.as_ref()).await?;
    info!("✅ Document store ready");

    let state = AppState::new(store.clone());
    seed::start(&state, &config.seed).await;

    let app = api::router(state);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /                          - Welcome text");
    info!("   GET  /health                    - Health check");
    info!("   GET  /fetchReviews              - All reviews");
    info!("   GET  /fetchReviews/dealer/:id   - Reviews of one dealer");
    info!("   GET  /fetchDealers              - All dealerships");
    info!("   GET  /fetchDealers/:state       - Dealerships in a state");
    info!("   GET  /fetchDealer/:id           - One dealership");
    info!("   POST /insert_review             - Add new review");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Persist collections on graceful shutdown
    info!("💾 Flushing document store before shutdown...");
    match store.flush().await {
        Ok(()) => info!("✅ Store flushed"),
        Err(e) => warn!(error = %e, "⚠️  Failed to flush store"),
    }

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
