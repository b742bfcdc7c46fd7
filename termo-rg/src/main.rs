//! Report Generator (termo-rg) - Main entry point
//!
//! Thermographic inspection report service: accepts submissions over
//! HTTP, derives phase delta diagnostics, obtains the site map from the
//! configured map service, and writes a render bundle for the document
//! templating engine.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use termo_common::config::TermoConfig;
use termo_common::render::{DisabledMapRenderer, MapRenderer};
use termo_common::report::ReportBuilder;
use termo_rg::assembler::BundleAssembler;
use termo_rg::map_client::MapServiceClient;
use termo_rg::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for termo-rg
#[derive(Parser, Debug)]
#[command(name = "termo-rg")]
#[command(about = "Report Generator microservice for Termo")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "TERMO_RG_PORT")]
    port: Option<u16>,

    /// Configuration file path
    #[arg(short, long, env = "TERMO_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the docx templates (overrides the config file)
    #[arg(long, env = "TERMO_TEMPLATES_DIR")]
    templates_dir: Option<PathBuf>,

    /// Directory render bundles are written under (overrides the config file)
    #[arg(long, env = "TERMO_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        TermoConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = args.templates_dir {
        config.report.templates_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        config.report.output_dir = dir;
    }

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Termo Report Generator (termo-rg) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Templates directory: {}", config.report.templates_dir.display());
    info!("Output directory: {}", config.report.output_dir.display());
    if !config.report.templates_dir.is_dir() {
        warn!(
            "Templates directory {} does not exist; report builds will fail until it is created",
            config.report.templates_dir.display()
        );
    }

    // Wire the map collaborator; absent URL disables map rendering
    let map_renderer: Arc<dyn MapRenderer> = match &config.map.service_url {
        Some(url) => {
            info!("Map rendering via {}", url);
            Arc::new(
                MapServiceClient::new(url.clone(), config.map.timeout())
                    .context("Failed to build map service client")?,
            )
        }
        None => {
            warn!("No map service configured; reports will omit the site map");
            Arc::new(DisabledMapRenderer)
        }
    };
    let assembler = Arc::new(BundleAssembler::new(config.report.output_dir.clone()));

    let builder = Arc::new(ReportBuilder::new(
        config.report.templates_dir.clone(),
        config.report.template_pattern.clone(),
        map_renderer,
        assembler,
    ));
    let state = AppState::new(builder);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("termo-rg listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
