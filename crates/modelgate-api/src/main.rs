//! ModelGate server
//!
//! Discovers the compiled-in model plugins and serves them over HTTP.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use modelgate_api::{build_registry, create_router, AppState, Cli, ServerConfig};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting ModelGate");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    match &config.models.enabled {
        Some(enabled) => info!("Enabled model plugins: {}", enabled.join(", ")),
        None => info!("Enabled model plugins: all installed"),
    }

    let metrics_handle = init_metrics()?;

    // Load models up front so plugin failures show at startup
    let registry = build_registry(&config);
    let names = registry.register_models().await.keys().cloned().collect::<Vec<_>>();
    info!("Serving models: {}", names.join(", "));

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;
    let state = AppState::new(config, registry).with_metrics(metrics_handle);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("modelgate=debug,modelgate_api=debug,modelgate_models=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("modelgate=info,modelgate_api=info,modelgate_models=info")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "modelgate_requests_total",
        "Total number of requests by operation and model"
    );
    metrics::describe_counter!(
        "modelgate_not_implemented_total",
        "Calls to operations the underlying model does not implement"
    );
    metrics::describe_counter!("modelgate_errors_total", "Total number of errors by type");

    info!("Metrics exporter initialized");
    Ok(handle)
}
