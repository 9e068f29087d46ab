//! Schema command implementation.
//!
//! Fetches a schema from the registry by its global id.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::RegistryArgs;

/// Arguments for the schema command.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema id assigned by the registry
    #[arg(long)]
    pub id: u32,

    /// Pretty-print the schema JSON
    #[arg(long)]
    pub pretty: bool,

    /// Also print the schema fingerprint
    #[arg(long)]
    pub fingerprint: bool,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// Runs the schema command.
///
/// # Errors
///
/// Returns an error if the registry is unreachable, the id is unknown, or the
/// returned schema does not compile.
pub async fn run(args: &SchemaArgs) -> Result<()> {
    info!(id = args.id, "Fetching schema");

    let client = args.registry.client()?;
    let codec = client
        .get_schema(args.id)
        .await
        .with_context(|| format!("Failed to fetch schema {}", args.id))?;

    if args.fingerprint {
        println!("# fingerprint: {}", codec.fingerprint());
    }

    if args.pretty {
        println!("{}", pretty_schema(codec.schema_text())?);
    } else {
        println!("{}", codec.schema_text());
    }

    Ok(())
}

/// Re-indents schema text for display.
fn pretty_schema(schema_text: &str) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(schema_text).context("Schema text is not JSON")?;
    Ok(serde_json::to_string_pretty(&value)?)
}
