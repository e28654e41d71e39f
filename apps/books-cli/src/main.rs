mod token;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use books_sdk::{Book, BooksHttpClient, NewBook};
use bookshelf_bootstrap::{LoggingConfig, init_logging};
use clap::{Args, Parser, Subcommand};

use crate::token::{ClientCredentials, fetch_token};

/// Books command-line client
#[derive(Parser, Debug)]
#[command(name = "books")]
#[command(about = "Read and store books through the edge gateway")]
#[command(version)]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "BOOKS_GATEWAY_URL", default_value = "http://127.0.0.1:8080")]
    gateway_url: String,

    /// Bearer token to send as is
    #[arg(long, env = "BOOKS_TOKEN", hide_env_values = true, conflicts_with = "token_url")]
    token: Option<String>,

    #[command(flatten)]
    credentials: CredentialsArgs,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Client-credentials grant, used when no `--token` is given.
#[derive(Args, Debug)]
struct CredentialsArgs {
    /// OAuth2 token endpoint
    #[arg(long, env = "BOOKS_TOKEN_URL", requires_all = ["client_id", "client_secret"])]
    token_url: Option<String>,

    #[arg(long, env = "BOOKS_CLIENT_ID")]
    client_id: Option<String>,

    #[arg(long, env = "BOOKS_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    #[arg(long, env = "BOOKS_SCOPE")]
    scope: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a book; with --id an existing book is overwritten
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        id: Option<i64>,
    },
    /// Fetch a book by id
    Get { id: i64 },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: "warn".to_owned(),
        ..LoggingConfig::default()
    };
    init_logging(&logging, cli.verbose);

    let timeout = Duration::from_millis(cli.timeout_ms);
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")?;

    let token = resolve_token(&http, &cli).await?;
    let mut client = BooksHttpClient::with_client(http, &cli.gateway_url);
    if let Some(token) = token {
        client = client.with_bearer_token(token);
    }

    match cli.command {
        Commands::Add { title, author, id } => {
            let mut book = NewBook::new(title, author);
            if let Some(id) = id {
                book = book.with_id(id);
            }
            let saved = client.save_book(&book).await?;
            print_book(&saved)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Get { id } => match client.get_book(id).await? {
            Some(book) => {
                print_book(&book)?;
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("book {id} not found");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

async fn resolve_token(http: &reqwest::Client, cli: &Cli) -> Result<Option<String>> {
    if let Some(token) = &cli.token {
        return Ok(Some(token.clone()));
    }
    let creds = &cli.credentials;
    let (Some(token_url), Some(client_id), Some(client_secret)) = (
        creds.token_url.as_deref(),
        creds.client_id.as_deref(),
        creds.client_secret.as_deref(),
    ) else {
        tracing::debug!("no credentials configured, calling without a token");
        return Ok(None);
    };

    let token = fetch_token(
        http,
        &ClientCredentials {
            token_url,
            client_id,
            client_secret,
            scope: creds.scope.as_deref(),
        },
    )
    .await?;
    Ok(Some(token))
}

fn print_book(book: &Book) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(book)?);
    Ok(())
}
