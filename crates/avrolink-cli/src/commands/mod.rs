//! CLI commands and argument parsing.

pub mod decode;
pub mod encode;
pub mod register;
pub mod schema;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use avrolink_core::properties::{
    SCHEMA_REGISTRY_PASSWORD, SCHEMA_REGISTRY_URL, SCHEMA_REGISTRY_USERNAME,
};
use avrolink_core::Properties;
use avrolink_registry::{Credentials, RegistryClient, RegistryConfig};

/// Avrolink - Schema Registry tooling for Avro records
#[derive(Parser)]
#[command(name = "avrolink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a schema by id
    Schema(schema::SchemaArgs),

    /// Register a schema under a subject
    Register(register::RegisterArgs),

    /// Encode a JSON record into an enveloped Avro payload
    Encode(encode::EncodeArgs),

    /// Decode an enveloped Avro payload into JSON
    Decode(decode::DecodeArgs),

    /// Print version information
    Version,
}

/// Registry connection options shared by every networked command.
#[derive(Args, Debug, Clone)]
pub struct RegistryArgs {
    /// Registry URL (e.g., `<https://registry.example.com>`)
    #[arg(short, long, env = "AVROLINK_REGISTRY_URL")]
    pub registry: Option<String>,

    /// Username (API key) for basic authentication
    #[arg(short, long, env = "AVROLINK_REGISTRY_USERNAME")]
    pub username: Option<String>,

    /// Password (API secret) for basic authentication
    #[arg(long, env = "AVROLINK_REGISTRY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Client properties file; flags take precedence over its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, default_value = "2000")]
    pub timeout_ms: u64,
}

impl RegistryArgs {
    /// Resolves flags and the optional properties file into a client config.
    pub fn to_config(&self) -> Result<RegistryConfig> {
        let properties = match &self.config {
            Some(path) => Properties::load(path)
                .with_context(|| format!("Failed to load properties from {}", path.display()))?,
            None => Properties::new(),
        };

        let url = self
            .registry
            .as_deref()
            .or_else(|| properties.get(SCHEMA_REGISTRY_URL))
            .context("No registry URL given (use --registry or schema.registry.url)")?;

        let mut config =
            RegistryConfig::new(url).with_timeout(Duration::from_millis(self.timeout_ms));
        if let Some(credentials) = determine_credentials(self, &properties)? {
            config = config.with_credentials(credentials);
        }

        Ok(config)
    }

    /// Builds a registry client from these options.
    pub fn client(&self) -> Result<RegistryClient> {
        let config = self.to_config()?;
        RegistryClient::new(config).context("Failed to create registry client")
    }
}

/// Picks credentials from flags first, then from the properties file.
fn determine_credentials(
    args: &RegistryArgs,
    properties: &Properties,
) -> Result<Option<Credentials>> {
    let username = args
        .username
        .as_deref()
        .or_else(|| properties.get(SCHEMA_REGISTRY_USERNAME));
    let password = args
        .password
        .as_deref()
        .or_else(|| properties.get(SCHEMA_REGISTRY_PASSWORD));

    match (username, password) {
        (Some(username), Some(password)) => Ok(Some(Credentials::new(username, password))),
        (None, None) => Ok(None),
        _ => anyhow::bail!("Both --username and --password are required for basic authentication"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(registry: Option<&str>) -> RegistryArgs {
        RegistryArgs {
            registry: registry.map(ToString::to_string),
            username: None,
            password: None,
            config: None,
            timeout_ms: 2000,
        }
    }

    fn properties_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_config_from_flags() {
        let mut args = args(Some("http://localhost:8081/"));
        args.username = Some("key".to_string());
        args.password = Some("secret".to_string());
        args.timeout_ms = 250;

        let config = args.to_config().unwrap();

        assert_eq!(config.url, "http://localhost:8081");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.credentials, Some(Credentials::new("key", "secret")));
    }

    #[test]
    fn test_config_from_properties_file() {
        let file = properties_file(
            "# Confluent Cloud\n\
             schema.registry.url=https://sr.example.com\n\
             schema.registry.basic.auth.user.info=key:secret\n",
        );
        let mut args = args(None);
        args.config = Some(file.path().to_path_buf());

        let config = args.to_config().unwrap();

        assert_eq!(config.url, "https://sr.example.com");
        assert_eq!(config.credentials, Some(Credentials::new("key", "secret")));
    }

    #[test]
    fn test_flags_override_properties_file() {
        let file = properties_file(
            "schema.registry.url=https://sr.example.com\n\
             schema.registry.basic.auth.user.info=key:secret\n",
        );
        let mut args = args(Some("http://localhost:8081"));
        args.config = Some(file.path().to_path_buf());
        args.username = Some("other".to_string());

        let config = args.to_config().unwrap();

        assert_eq!(config.url, "http://localhost:8081");
        assert_eq!(config.credentials, Some(Credentials::new("other", "secret")));
    }

    #[test]
    fn test_missing_url() {
        let err = args(None).to_config().unwrap_err();
        assert!(err.to_string().contains("No registry URL"));
    }

    #[test]
    fn test_missing_properties_file() {
        let mut args = args(None);
        args.config = Some(PathBuf::from("/nonexistent/client.properties"));
        let err = args.to_config().unwrap_err();
        assert!(err.to_string().contains("Failed to load properties"));
    }

    #[test]
    fn test_partial_credentials_rejected() {
        let mut args = args(Some("http://localhost:8081"));
        args.username = Some("key".to_string());
        assert!(args.to_config().is_err());
    }

    #[test]
    fn test_no_credentials() {
        let config = args(Some("http://localhost:8081")).to_config().unwrap();
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_parse_schema_command() {
        let cli = Cli::try_parse_from([
            "avrolink",
            "schema",
            "--id",
            "7",
            "--registry",
            "http://localhost:8081",
            "--timeout-ms",
            "500",
        ])
        .unwrap();

        match cli.command {
            Commands::Schema(args) => {
                assert_eq!(args.id, 7);
                assert_eq!(args.registry.timeout_ms, 500);
            }
            _ => panic!("Expected schema command"),
        }
    }

    #[test]
    fn test_parse_rejects_negative_id() {
        assert!(Cli::try_parse_from(["avrolink", "schema", "--id", "-1"]).is_err());
    }
}
