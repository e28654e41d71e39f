mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use books::BooksModule;
use bookshelf_bootstrap::{
    apply_common_layers, init_logging, load_layered, render_config, serve, shutdown_token,
};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use service_registry_sdk::{HttpRegistryClient, NewInstance, run_registration};

use crate::config::{BooksServerConfig, ENV_PREFIX};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Books resource service
#[derive(Parser)]
#[command(name = "books-server")]
#[command(about = "Books resource service: capability-gated read and save")]
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

    // defaults -> YAML (if provided) -> env (BOOKS__*) -> CLI overrides
    let mut config = load_layered(&BooksServerConfig::default(), cli.config.as_deref(), ENV_PREFIX)?;
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
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &BooksServerConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.server.socket_addr()?;
    validate_auth(config)?;
    println!("Configuration is valid");
    println!("{}", render_config(config)?);
    Ok(())
}

/// Builds the module over a throwaway store so auth settings are checked
/// without opening the configured one.
fn validate_auth(config: &BooksServerConfig) -> Result<()> {
    BooksModule::from_parts(
        Arc::new(books::infra::storage::InMemoryBooksRepository::new()),
        &config.books,
    )
    .map(drop)
    .context("invalid books.auth settings")
}

async fn run_server(config: BooksServerConfig) -> Result<()> {
    tracing::info!("Books server starting");

    let addr = config.server.socket_addr()?;
    let module = BooksModule::init(&config.books)
        .await
        .context("failed to initialize books module")?;
    let router = apply_common_layers(
        module.router(),
        "books",
        Duration::from_millis(config.server.request_timeout_ms),
    );

    let cancel = shutdown_token();

    let registration = if config.discovery.enabled {
        let discovery = &config.discovery;
        let client = HttpRegistryClient::new(
            discovery.registry_url.clone(),
            discovery.registry_timeout(),
        )?;
        let mut instance = NewInstance::new(
            discovery.service_name.clone(),
            discovery.advertise_url(&config.server),
        );
        if let Some(id) = &discovery.instance_id {
            instance = instance.with_instance_id(id.clone());
        }
        Some(tokio::spawn(run_registration(
            Arc::new(client),
            instance,
            discovery.heartbeat_interval(),
            cancel.clone(),
        )))
    } else {
        tracing::info!("Service registry integration disabled");
        None
    };

    let served = serve(router, addr, cancel.clone()).await;
    cancel.cancel();

    if let Some(task) = registration {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "deregistration failed"),
            Err(e) => tracing::warn!(error = %e, "registration task aborted"),
        }
    }

    served?;
    tracing::info!("Books server stopped");
    Ok(())
}
