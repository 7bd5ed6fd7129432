use anyhow::{Context, Result};
use comment_service::{
    app::{build_router, load_landing_page, AppState},
    config::Config,
    elasticsearch::ElasticsearchClient,
};
use tokio::{net::TcpListener, signal};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comment_service=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!("Configuration loaded successfully");

    let search_backend = ElasticsearchClient::new(
        &config.elasticsearch_url,
        &config.elasticsearch_index,
        config.elasticsearch_timeout(),
    )
    .context("Failed to create Elasticsearch client")?;

    search_backend
        .ensure_comment_index()
        .await
        .with_context(|| format!("Failed to ensure index '{}'", config.elasticsearch_index))?;
    info!(
        url = %config.elasticsearch_url,
        index = %search_backend.comment_index(),
        "Elasticsearch ready"
    );

    let landing_page = load_landing_page(&config.template_dir)
        .await
        .context("Failed to load landing page template")?;

    let state = AppState::new(search_backend, config.hit_policy, landing_page);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("comment-service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("comment-service shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
