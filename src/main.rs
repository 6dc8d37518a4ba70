//! Edge Redirector (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                EDGE REDIRECTOR                │
//!     Client Request     │  ┌────────┐   ┌──────────────┐               │
//!     ───────────────────┼─▶│  http  │──▶│   routing    │               │
//!                        │  │ server │   │  redirector  │               │
//!                        │  └────────┘   └──────┬───────┘               │
//!                        │          human + prefix │ otherwise           │
//!                        │                ▼        ▼                     │
//!     302 Location       │         ┌──────────┐ ┌──────────┐            │
//!     ◀──────────────────┼─────────│ response │ │ forward  │────────────┼──▶ Upstream
//!                        │         └──────────┘ └──────────┘            │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! Subcommands:
//! - `serve` (default): run the edge server
//! - `embed`: run the crawler-facing preview service
//! - `check`: classify a single URL offline and print the outcome

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use edge_redirector::config::{load_or_default, RedirectorConfig};
use edge_redirector::http::EdgeRequest;
use edge_redirector::lifecycle::{spawn_signal_listener, Shutdown};
use edge_redirector::observability::init_logging;
use edge_redirector::routing::{RedirectRules, Redirector};
use edge_redirector::{EmbedServer, HttpServer};

#[derive(Parser)]
#[command(name = "edge-redirector")]
#[command(about = "Redirect human visitors to the origin, pass crawlers through", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the edge server
    Serve,
    /// Run the crawler-facing embed service
    Embed,
    /// Classify one request and print the outcome as JSON
    Check {
        /// Absolute request URL
        #[arg(long)]
        url: String,

        /// User-Agent header value; omitted means no header
        #[arg(long)]
        user_agent: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            init_logging(&config.observability)?;
            serve(config).await?;
        }
        Commands::Embed => {
            init_logging(&config.observability)?;
            embed(config).await?;
        }
        Commands::Check { url, user_agent } => return Ok(check(&config, url, user_agent)),
    }
    Ok(ExitCode::SUCCESS)
}

async fn serve(config: RedirectorConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        "edge-redirector starting"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    let signals = spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    signals.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn embed(config: RedirectorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(&config.embed.bind_address).await?;
    let shutdown = Shutdown::new();
    let signals = spawn_signal_listener(&shutdown);

    let server = EmbedServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    signals.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(config: &RedirectorConfig, url: String, user_agent: Option<String>) -> ExitCode {
    let redirector = Redirector::new(RedirectRules::from_config(&config.redirect));
    let mut request = EdgeRequest::new(url);
    if let Some(agent) = user_agent {
        request = request.with_header("User-Agent", agent);
    }

    match redirector.handle(&request) {
        Ok(outcome) => {
            println!("{}", outcome.report());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
