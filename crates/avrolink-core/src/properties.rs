//! Client property files.
//!
//! Reads the `key=value` files shared by producer and consumer processes,
//! e.g. a `ccloud.properties`. Two compound keys are expanded on load so
//! callers can read plain credentials:
//!
//! - `sasl.jaas.config` yields `sasl.username` and `sasl.password`.
//! - `schema.registry.basic.auth.user.info` yields
//!   `schema.registry.basic.auth.username` and
//!   `schema.registry.basic.auth.password`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Registry base URL key.
pub const SCHEMA_REGISTRY_URL: &str = "schema.registry.url";

/// Combined `user:password` registry credentials key.
pub const SCHEMA_REGISTRY_USER_INFO: &str = "schema.registry.basic.auth.user.info";

/// Registry username key (expanded from [`SCHEMA_REGISTRY_USER_INFO`]).
pub const SCHEMA_REGISTRY_USERNAME: &str = "schema.registry.basic.auth.username";

/// Registry password key (expanded from [`SCHEMA_REGISTRY_USER_INFO`]).
pub const SCHEMA_REGISTRY_PASSWORD: &str = "schema.registry.basic.auth.password";

/// JAAS login module configuration key.
pub const SASL_JAAS_CONFIG: &str = "sasl.jaas.config";

/// Broker username key (expanded from [`SASL_JAAS_CONFIG`]).
pub const SASL_USERNAME: &str = "sasl.username";

/// Broker password key (expanded from [`SASL_JAAS_CONFIG`]).
pub const SASL_PASSWORD: &str = "sasl.password";

/// An ordered set of client properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Creates an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads properties from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertiesIo`] if the file cannot be read, or
    /// [`Error::InvalidProperty`] if a line is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::PropertiesIo {
            path: path.to_path_buf(),
            source,
        })?;

        let properties = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), count = properties.len(), "Loaded properties");
        Ok(properties)
    }

    /// Parses properties from text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProperty`] if a non-comment line has no `=`,
    /// has an empty key, or carries a compound value that cannot be expanded.
    ///
    /// # Examples
    ///
    /// ```
    /// use avrolink_core::Properties;
    ///
    /// let props = Properties::parse("# registry\nschema.registry.url = http://localhost:8081\n")?;
    /// assert_eq!(props.get("schema.registry.url"), Some("http://localhost:8081"));
    /// # Ok::<(), avrolink_core::Error>(())
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let mut properties = Self::new();

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| Error::InvalidProperty {
                line: line_no,
                reason: "missing '='".to_string(),
            })?;
            let key = key.trim();
            let value = value.trim();

            if key.is_empty() {
                return Err(Error::InvalidProperty {
                    line: line_no,
                    reason: "empty key".to_string(),
                });
            }

            match key {
                SASL_JAAS_CONFIG => {
                    let (username, password) = parse_jaas_credentials(value).ok_or_else(|| {
                        Error::InvalidProperty {
                            line: line_no,
                            reason: "sasl.jaas.config has no username/password".to_string(),
                        }
                    })?;
                    properties.insert(SASL_USERNAME, username);
                    properties.insert(SASL_PASSWORD, password);
                }
                SCHEMA_REGISTRY_USER_INFO => {
                    let (username, password) =
                        value.split_once(':').ok_or_else(|| Error::InvalidProperty {
                            line: line_no,
                            reason: "user info must be 'user:password'".to_string(),
                        })?;
                    properties.insert(SCHEMA_REGISTRY_USERNAME, username.trim());
                    properties.insert(SCHEMA_REGISTRY_PASSWORD, password.trim());
                }
                _ => {}
            }

            properties.insert(key, value);
        }

        Ok(properties)
    }

    /// Inserts or replaces a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for a key, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProperty`] if the key is not set.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::MissingProperty {
            key: key.to_string(),
        })
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no properties are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Extracts `username="..."` and `password="..."` from a JAAS login line.
fn parse_jaas_credentials(value: &str) -> Option<(String, String)> {
    let mut username = None;
    let mut password = None;

    for token in value.trim_end_matches(';').split_whitespace() {
        let Some((name, raw)) = token.split_once('=') else {
            continue;
        };
        let cleaned = raw.trim_end_matches(';').trim_matches('"').to_string();
        match name {
            "username" => username = Some(cleaned),
            "password" => password = Some(cleaned),
            _ => {}
        }
    }

    username.zip(password)
}
