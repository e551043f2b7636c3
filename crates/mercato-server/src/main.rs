//! # Mercato Server
//!
//! Main entry point for the Mercato marketplace API.

use mercato_config::{AppConfig, ConfigLoader};
use mercato_core::{ErrorTranslator, MercatoError, MercatoResult};
use mercato_repository::InMemoryMarketplace;
use mercato_rest::{create_router, AppState};
use mercato_server::{
    di::{build_cache_module, cache_store},
    seed::seed_demo_data,
    startup::print_startup_info,
    telemetry::{init_logging, init_metrics, metrics_router},
};
use mercato_service::MarketplaceCache;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config_loader = match ConfigLoader::from_default_location() {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    let config = config_loader.get().await;

    init_logging(&config.observability);

    info!("Starting Mercato Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> MercatoResult<()> {
    info!("Environment: {}", config.app.environment);

    let metrics_handle = if config.observability.metrics_enabled {
        init_metrics()
    } else {
        None
    };

    let cache_module = build_cache_module(&config.redis)?;
    let cache = Arc::new(MarketplaceCache::new(cache_store(&cache_module), &config.cache));

    let backend = Arc::new(InMemoryMarketplace::new());
    seed_demo_data(&backend);

    let translator = ErrorTranslator::new(config.is_production());
    let state = AppState::new(backend, cache, translator).with_bypass_header(&config.cache.bypass_header);

    let mut router = create_router(state, &config.server);
    let mut metrics_path = None;
    if let Some(handle) = metrics_handle {
        router = router.merge(metrics_router(&config.observability.metrics_path, handle));
        metrics_path = Some(config.observability.metrics_path.as_str());
    }

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MercatoError::Internal(format!("Failed to bind REST: {}", e)))?;

    print_startup_info(&addr, metrics_path);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MercatoError::Internal(format!("REST server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
