mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use api_gateway::GatewayModule;
use bookshelf_bootstrap::{
    apply_common_layers, init_logging, load_layered, render_config, serve, shutdown_token,
};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::config::{ENV_PREFIX, GatewayServerConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Edge gateway
#[derive(Parser)]
#[command(name = "gateway-server")]
#[command(about = "Edge gateway: filters, routes and forwards requests to backend services")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let mut config =
        load_layered(&GatewayServerConfig::default(), cli.config.as_deref(), ENV_PREFIX)?;
    if let Some(port) = cli.port {
        config.server.override_port(port)?;
    }

    init_logging(&config.logging, cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", render_config(&config)?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => {
            config.server.socket_addr()?;
            GatewayModule::from_config(&config.gateway)?;
            println!("Configuration is valid");
            println!("{}", render_config(&config)?);
            Ok(())
        }
    }
}

async fn run_server(config: GatewayServerConfig) -> Result<()> {
    tracing::info!("Gateway server starting");

    let addr: SocketAddr = config.server.socket_addr()?;
    let module = GatewayModule::from_config(&config.gateway)?;
    let router = apply_common_layers(
        module.router(),
        "gateway",
        Duration::from_millis(config.server.request_timeout_ms),
    );

    serve(router, addr, shutdown_token()).await?;
    tracing::info!("Gateway server stopped");
    Ok(())
}
