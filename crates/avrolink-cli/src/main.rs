//! Avrolink CLI - Command-line interface for Schema Registry workflows.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avrolink=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schema(args) => commands::schema::run(&args).await,
        Commands::Register(args) => commands::register::run(&args).await,
        Commands::Encode(args) => commands::encode::run(&args).await,
        Commands::Decode(args) => commands::decode::run(&args).await,
        Commands::Version => {
            println!("avrolink {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
