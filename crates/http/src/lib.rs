//! HTTP server facade for Shelf with Axum, error handling, and OpenAPI support.

use std::future::Future;

use anyhow::Context;
use axum::{routing::get, Json, Router};
use serde_json::json;

use shelf_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod extract;
pub mod router;

use router::RouterBuilder;

/// Body of `GET /`. Fixed regardless of `app.name`.
pub const WELCOME_MESSAGE: &str = "Welcome to Amazon Books API";

/// Start the HTTP server with the given module registry
///
/// Runs until Ctrl-C or SIGTERM is received, then drains in-flight requests.
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    serve_until(registry, settings, shutdown_signal()).await
}

/// Start the HTTP server and stop it once `shutdown` resolves
pub async fn serve_until<F>(
    registry: &ModuleRegistry,
    settings: &Settings,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = settings.bind_address();
    tracing::info!("starting HTTP server on {}", address);

    let app = build_router(registry, settings);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to address {}", address))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let openapi_spec = router::openapi_document(registry, settings);

    let mut router_builder = RouterBuilder::new()
        .route(
            "/",
            get(|| async { Json(json!({ "message": WELCOME_MESSAGE })) }),
        )
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        let module_name = module.name();
        tracing::info!(
            module = module_name,
            "mounting module routes under {}",
            router::module_mount_path(&settings.server.base_path, module_name)
        );
        router_builder =
            router_builder.mount_module(&settings.server.base_path, module_name, module.routes());
    }

    // Layers wrap the routes registered above, so they go last.
    router_builder
        .with_openapi(openapi_spec)
        .with_timeout(settings.server.request_timeout_ms)
        .with_tracing()
        .with_cors(&settings.cors)
        .with_request_id()
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;

    tracing::info!("shutdown signal received");
}
