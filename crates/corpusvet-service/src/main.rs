use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use corpusvet_core::config;
use corpusvet_service::{build_router, AppState};

/// Port the review dashboard connects to unless configured otherwise.
const DEFAULT_PORT: u16 = 3333;

#[derive(Parser)]
#[command(
    name = "corpusvet-service",
    version,
    about = "Local HTTP service for the Corpusvet review dashboard"
)]
struct Cli {
    /// Listen port (overrides config)
    #[arg(long, env = "CORPUSVET_PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Default corpus root offered to the dashboard (overrides config)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Path to a .corpusvet.toml config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting corpusvet-service v{} (engine v{})",
        env!("CARGO_PKG_VERSION"),
        corpusvet_core::version()
    );

    let cli = Cli::parse();

    let file_config = match cli.config.as_deref() {
        Some(path) => Some(config::load_config(path)?),
        None => {
            let cwd = std::env::current_dir()?;
            let path = config::config_path(&cwd);
            if path.is_file() {
                Some(config::load_config(&path)?)
            } else {
                None
            }
        }
    };

    let default_root = config::resolve_root_dir(cli.root.as_deref(), file_config.as_ref());
    match &default_root {
        Some(root) => info!("Default review root: {}", root.display()),
        None => info!("No default review root configured"),
    }

    let port = cli
        .port
        .or(file_config.as_ref().and_then(|c| c.port))
        .unwrap_or(DEFAULT_PORT);

    let state = AppState::new(default_root);
    let app = build_router(state);

    let addr = SocketAddr::new(cli.bind, port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("corpusvet-service listening on http://{addr}");
    info!("Health check: http://{addr}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to install shutdown handler");
    }
}
