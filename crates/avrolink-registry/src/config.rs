//! Configuration types for the registry client.

use std::fmt;
use std::time::Duration;

use avrolink_core::properties::{
    SCHEMA_REGISTRY_PASSWORD, SCHEMA_REGISTRY_URL, SCHEMA_REGISTRY_USERNAME,
};
use avrolink_core::Properties;

/// Default request timeout.
///
/// Registry calls sit on producer and consumer hot paths, so the ceiling is
/// short.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Configuration for the registry client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Registry base URL (e.g., "<https://registry.example.com>").
    pub url: String,

    /// Basic authentication credentials, if any.
    pub credentials: Option<Credentials>,

    /// Whether resolved schemas and subject ids are cached.
    pub caching: bool,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl RegistryConfig {
    /// Creates a new registry configuration with the given URL.
    ///
    /// Trailing slashes are trimmed so request paths can be appended directly.
    ///
    /// # Examples
    ///
    /// ```
    /// use avrolink_registry::RegistryConfig;
    ///
    /// let config = RegistryConfig::new("https://registry.example.com/");
    /// assert_eq!(config.url, "https://registry.example.com");
    /// assert!(!config.caching);
    /// ```
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            credentials: None,
            caching: false,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("avrolink-registry/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Builds a configuration from client properties.
    ///
    /// Reads `schema.registry.url` and, when both are present, the basic auth
    /// username and password (see [`Properties`] for how they are expanded).
    ///
    /// # Errors
    ///
    /// Returns an error if `schema.registry.url` is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use avrolink_core::Properties;
    /// use avrolink_registry::RegistryConfig;
    ///
    /// let props = Properties::parse(
    ///     "schema.registry.url=https://sr.example.com\n\
    ///      schema.registry.basic.auth.user.info=key:secret\n",
    /// )?;
    /// let config = RegistryConfig::from_properties(&props)?;
    /// assert_eq!(config.credentials.unwrap().username, "key");
    /// # Ok::<(), avrolink_core::Error>(())
    /// ```
    pub fn from_properties(properties: &Properties) -> avrolink_core::Result<Self> {
        let mut config = Self::new(properties.require(SCHEMA_REGISTRY_URL)?);

        if let (Some(username), Some(password)) = (
            properties.get(SCHEMA_REGISTRY_USERNAME),
            properties.get(SCHEMA_REGISTRY_PASSWORD),
        ) {
            config = config.with_credentials(Credentials::new(username, password));
        }

        Ok(config)
    }

    /// Sets basic authentication credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Enables or disables caching.
    #[must_use]
    pub const fn with_caching(mut self, enabled: bool) -> Self {
        self.caching = enabled;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Username/password pair sent as HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username (or API key).
    pub username: String,
    /// Password (or API secret).
    pub password: String,
}

impl Credentials {
    /// Creates a new credential pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use avrolink_registry::Credentials;
    ///
    /// let credentials = Credentials::new("user", "pass");
    /// assert_eq!(credentials.username, "user");
    /// ```
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
