//! Register command implementation.
//!
//! Registers a schema file under a subject and prints the assigned id.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use avrolink_core::AvroCodec;

use super::RegistryArgs;

/// Arguments for the register command.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Subject name (e.g., `orders-value`)
    #[arg(short, long)]
    pub subject: String,

    /// Path to the Avro schema file (`.avsc`)
    #[arg(long)]
    pub schema: PathBuf,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// Runs the register command.
///
/// # Errors
///
/// Returns an error if the schema file cannot be read or compiled, or if the
/// registry rejects the registration.
pub async fn run(args: &RegisterArgs) -> Result<()> {
    let codec = read_schema(&args.schema)?;

    info!(
        subject = %args.subject,
        fingerprint = %codec.fingerprint(),
        "Registering schema"
    );

    let client = args.registry.client()?;
    let id = client
        .create_subject(&args.subject, codec.schema_text())
        .await
        .with_context(|| format!("Failed to register schema under '{}'", args.subject))?;

    println!("{id}");
    Ok(())
}

/// Reads and compiles a schema file so bad schemas never reach the registry.
pub(crate) fn read_schema(path: &Path) -> Result<AvroCodec> {
    let schema_text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    AvroCodec::compile(schema_text.trim())
        .with_context(|| format!("Invalid schema in {}", path.display()))
}
