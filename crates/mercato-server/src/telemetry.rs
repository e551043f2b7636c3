//! Logging and metrics setup.

use axum::{routing::get, Router};
use mercato_config::ObservabilityConfig;
use mercato_service::register_metrics;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. The format is `json` or
/// anything else for human-readable output.
pub fn init_logging(config: &ObservabilityConfig) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

/// Installs the Prometheus recorder and describes the cache metrics.
///
/// Returns `None` if a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            register_metrics();
            info!("Prometheus metrics initialized");
            Some(handle)
        }
        Err(e) => {
            error!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

/// Serves the rendered metrics at `path`.
pub fn metrics_router(path: &str, handle: PrometheusHandle) -> Router {
    Router::new().route(
        path,
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_metrics_route() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let router = metrics_router("/metrics", handle);

        let response = router
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
