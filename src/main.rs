//! restskin: REST publication server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ traversal ──────────▶ dispatch ──────────▶ handler
//!                     (request id,     (++rest++<skin>       (lookup, permission,
//!                      trace, limits)   → layer, resource)    invoke / 405)
//!     Client Response
//!     ◀────────────── http::response ◀──────────────────────────────────────────  Payload
//!
//!     Cross-cutting: config · security (tokens, grants) · observability · lifecycle
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use restskin::config::{load_or_default, ServiceConfig};
use restskin::dispatch::Registration;
use restskin::lifecycle::{signals, Application};
use restskin::observability::{logging, metrics};
use restskin::{demo, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "restskin", version)]
#[command(about = "REST publication server with per-verb dispatch", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the sample application
    Serve {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print skins and handler registrations
    Routes {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            let config = load_or_default(config.as_deref())?;
            serve(config).await
        }
        Commands::Routes { config, json } => {
            let config = load_or_default(config.as_deref())?;
            let app = demo::application()?;
            print_routes(&app, &config, json)
        }
    }
}

async fn serve(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&config.observability.log_level);
    tracing::info!("restskin v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_bytes = config.limits.max_body_bytes,
        grants = config.security.grants.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = Arc::new(demo::application()?);
    let tree = Arc::new(demo::resource_tree()?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::listen(shutdown.clone()));

    HttpServer::new(config, app, tree).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_routes(
    app: &Application,
    config: &ServiceConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let registrations = app.table().registrations();

    if json {
        let skins: Vec<_> = app
            .skins()
            .iter()
            .map(|(tag, layer)| {
                serde_json::json!({
                    "segment": format!("{}{}", config.rest.skin_namespace, tag),
                    "layer": layer,
                })
            })
            .collect();
        let out = serde_json::json!({ "skins": skins, "handlers": registrations });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("SKINS");
    for (tag, layer) in app.skins().iter() {
        println!("  {}{:<12} {}", config.rest.skin_namespace, tag, layer);
    }
    println!();
    println!("HANDLERS");
    for Registration {
        selector,
        handler,
        permission,
        not_allowed,
    } in registrations
    {
        let handler = if not_allowed { "(refusal)".to_string() } else { handler };
        println!(
            "  {:<7} {:<22} {:<18} {:<16} {}",
            selector.verb.as_str(),
            selector.target,
            selector.layer,
            handler,
            permission
        );
    }
    Ok(())
}
