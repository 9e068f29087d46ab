//! Encode command implementation.
//!
//! Registers the writer schema (if needed), encodes a JSON record and prints
//! the enveloped bytes as hex.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use avrolink_registry::RecordSerializer;

use super::register::read_schema;
use super::RegistryArgs;

/// Arguments for the encode command.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Subject the writer schema is registered under
    #[arg(short, long)]
    pub subject: String,

    /// Path to the Avro writer schema file (`.avsc`)
    #[arg(long)]
    pub schema: PathBuf,

    /// Record as inline JSON, or `@path` to read it from a file
    #[arg(long)]
    pub record: String,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// Runs the encode command.
///
/// # Errors
///
/// Returns an error if the schema or record cannot be loaded, the record does
/// not match the schema, or the registry call fails.
pub async fn run(args: &EncodeArgs) -> Result<()> {
    let codec = read_schema(&args.schema)?;
    let record = load_record(&args.record)?;

    let client = Arc::new(args.registry.client()?);
    let serializer = RecordSerializer::new(client, &args.subject, codec.schema_text())
        .context("Failed to create serializer")?;

    let bytes = serializer
        .serialize_json(&record)
        .await
        .with_context(|| format!("Failed to encode record for '{}'", args.subject))?;

    info!(subject = %args.subject, bytes = bytes.len(), "Encoded record");
    println!("{}", hex::encode(bytes));
    Ok(())
}

/// Parses a record argument: inline JSON, or `@path` for a JSON file.
fn load_record(arg: &str) -> Result<serde_json::Value> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read record file {path}"))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("Record is not valid JSON")
}
