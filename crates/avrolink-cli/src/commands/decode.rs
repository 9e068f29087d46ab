//! Decode command implementation.
//!
//! Decodes a hex-encoded record envelope, fetching the writer schema by the id
//! it carries.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use avrolink_core::envelope::peek_schema_id;
use avrolink_registry::RecordDeserializer;

use super::RegistryArgs;

/// Arguments for the decode command.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Enveloped record bytes in hex (e.g., `0000000001...`)
    #[arg(long)]
    pub hex: String,

    /// Pretty-print the decoded JSON
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// Runs the decode command.
///
/// # Errors
///
/// Returns an error if the input is not valid hex or a valid envelope, the
/// schema id is unknown, or the payload does not match the schema.
pub async fn run(args: &DecodeArgs) -> Result<()> {
    let bytes = parse_hex(&args.hex)?;
    let schema_id = peek_schema_id(&bytes).context("Input is not a record envelope")?;
    info!(schema_id, bytes = bytes.len(), "Decoding record");

    let client = Arc::new(args.registry.client()?);
    let record = RecordDeserializer::new(client)
        .deserialize_json(&bytes)
        .await
        .with_context(|| format!("Failed to decode record with schema {schema_id}"))?;

    if args.pretty {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{record}");
    }
    Ok(())
}

/// Parses hex input, ignoring whitespace and an optional `0x` prefix.
fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let digits: String = trimmed
        .strip_prefix("0x")
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    hex::decode(digits).context("Input is not valid hex")
}
