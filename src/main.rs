use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use seller_gateway::config::load_config;
use seller_gateway::observability::init_logging;
use seller_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "seller-gateway")]
#[command(about = "Same-origin API gateway for the seller dashboard", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability.log_filter);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        primary = config.upstream.primary.as_deref().unwrap_or("unset"),
        secondary = config.upstream.secondary.as_deref().unwrap_or("unset"),
        forward_timeout_secs = config.timeouts.forward_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
