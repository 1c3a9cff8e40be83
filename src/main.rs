//! Mock Endpoint Server - CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use mock_endpoint_server::config::DEFAULT_ROUTES_YAML;
use mock_endpoint_server::MockConfig;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "mock-endpoint-server",
    about = "Mock endpoint server - canned JSON responses and delay simulation for client testing",
    version
)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "mock-routes.yaml")]
    config: PathBuf,

    /// Override the configured listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: Level,

    /// Print the built-in route table and exit
    #[arg(long)]
    print_config: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.print_config {
        println!("{}", DEFAULT_ROUTES_YAML);
        return Ok(());
    }

    // Load configuration, falling back to the built-in fixture routes.
    let mut config = if args.config.exists() {
        info!(path = ?args.config, "Loading configuration");
        MockConfig::from_file(&args.config)?
    } else if args.validate {
        anyhow::bail!("Configuration file not found: {:?}", args.config);
    } else {
        info!("Using built-in route table");
        MockConfig::from_yaml(DEFAULT_ROUTES_YAML)?
    };

    if args.validate {
        config.validate()?;
        println!("Configuration is valid ({} routes defined)", config.routes.len());
        return Ok(());
    }

    if let Some(port) = args.port {
        config.port = port;
    }

    // A port that cannot be bound is fatal.
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        addr = %addr,
        routes = config.routes.len(),
        "Mock endpoint server listening"
    );

    mock_endpoint_server::server::serve(listener, config).await?;

    Ok(())
}
