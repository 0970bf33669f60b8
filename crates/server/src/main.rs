mod app;
mod config;
mod error;
mod handlers;
mod response;
mod state;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use listenfd::ListenFd;
use pagerender::Renderer;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{app::create_app, config::apply_page_config, state::AppState};

/// pagerender - Serve pages assembled from a validated page configuration
#[derive(Parser, Debug)]
#[command(name = "pagerender-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,

    /// Template glob (e.g. "templates/**/*.html"); defaults to the embedded layout
    #[arg(long, env = "TEMPLATES_DIR")]
    templates: Option<String>,

    /// JSON page configuration merged at startup
    #[arg(long, short, env = "PAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Attach response headers to data-only payloads
    #[arg(long, env = "RENDER_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pagerender=debug,pagerender_server=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut renderer = Renderer::new();
    renderer.set_debug(cli.debug);
    if let Some(path) = &cli.config {
        apply_page_config(&mut renderer, path)?;
        tracing::info!(config = %path.display(), "Page configuration loaded");
    }

    let templates = match &cli.templates {
        Some(glob) => AppState::load_templates(glob)?,
        None => AppState::embedded_templates()?,
    };

    let state = AppState::new(renderer, templates);
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!(debug = cli.debug, "listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
