mod commands;

use clap::{Parser, Subcommand};
use commands::{describe, serve};
use std::error::Error;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "roserver")]
#[command(author, version, about = "Serves self-describing OPTIONS responses for REST resources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    async fn run(self) -> Result<(), Box<dyn Error>> {
        match self.command {
            Commands::Describe(args) => describe::run(args).await,
            Commands::Serve(args) => serve::run(args).await,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the OPTIONS body for a request path
    Describe(commands::describe::DescribeArgs),

    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter (e.g. ROSERVER_LOG=debug)
    let filter = EnvFilter::try_from_env("ROSERVER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}
