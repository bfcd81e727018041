//! Application bootstrap shared by the `shelf-app` and `shelf` binaries.

use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Registry holding every module this application ships
pub fn build_registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry).context("failed to register modules")?;
    Ok(registry)
}

/// Run the module lifecycle around the HTTP server until shutdown
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry()?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!(
        env = ?settings.environment,
        modules = registry.module_count(),
        "shelf bootstrap complete"
    );

    let served = shelf_http::start_server(&registry, &settings).await;

    // Stop modules even when the server failed, then report the first error.
    let stopped = registry.stop_modules().await;
    served?;
    stopped
}
