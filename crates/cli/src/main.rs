use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

/// Books and reviews catalog API
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Interface to bind, overriding `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overriding `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the merged OpenAPI document as JSON
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load Shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }

            tracing::info!(
                env = ?settings.environment,
                address = %settings.bind_address(),
                "shelf serve starting"
            );
            shelf_app::run(settings).await
        }
        Command::Openapi => {
            let registry = shelf_app::build_registry()?;
            let document = shelf_http::router::openapi_document(&registry, &settings);
            let rendered = serde_json::to_string_pretty(&document)
                .context("failed to render OpenAPI document")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
