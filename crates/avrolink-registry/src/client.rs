//! Schema Registry client.
//!
//! This module provides the main client interface for resolving schema ids to
//! codecs (consumer path) and registering schemas under subjects (producer
//! path).

use std::sync::Arc;

use avrolink_core::AvroCodec;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::cache::SchemaCache;
use crate::config::{Credentials, RegistryConfig};
use crate::error::{RegistryError, Result};
use crate::transport::{self, HttpTransport, RegistryRequest, Transport};

#[derive(Debug, Deserialize)]
struct SchemaResponse {
    schema: String,
}

#[derive(Debug, Serialize)]
struct SchemaRequest<'a> {
    schema: &'a str,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: u32,
}

/// Caching client for a Confluent-compatible Schema Registry.
///
/// One instance is meant to be shared (behind an [`Arc`]) by every producer
/// and consumer loop in a process. Configure it first with
/// [`set_credentials`](Self::set_credentials) and
/// [`enable_caching`](Self::enable_caching). Once shared, the configuration is
/// frozen.
///
/// Nothing is retried. Every failure is returned to the caller and leaves the
/// cache untouched.
#[derive(Debug)]
pub struct RegistryClient {
    config: RegistryConfig,
    transport: Arc<dyn Transport>,
    cache: SchemaCache,
}

impl RegistryClient {
    /// Creates a new registry client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use avrolink_registry::{RegistryClient, RegistryConfig};
    ///
    /// let config = RegistryConfig::new("https://registry.example.com");
    /// let client = RegistryClient::new(config)?;
    /// # Ok::<(), avrolink_registry::RegistryError>(())
    /// ```
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client that sends requests through the given transport.
    #[must_use]
    pub fn with_transport(config: RegistryConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            cache: SchemaCache::new(),
        }
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the client's cache.
    #[must_use]
    pub const fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Sets the basic authentication credentials sent with every request.
    pub fn set_credentials(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.config.credentials = Some(Credentials::new(username, password));
    }

    /// Removes credentials; later requests are unauthenticated.
    pub fn clear_credentials(&mut self) {
        self.config.credentials = None;
    }

    /// Turns caching on or off for later calls.
    ///
    /// Entries already cached are kept, but are not consulted while caching is
    /// off.
    pub fn enable_caching(&mut self, enabled: bool) {
        self.config.caching = enabled;
    }

    /// Returns `true` if caching is enabled.
    #[must_use]
    pub const fn is_caching_enabled(&self) -> bool {
        self.config.caching
    }

    /// Resolves a schema id to a compiled codec.
    ///
    /// With caching enabled, a repeat lookup returns the same codec instance
    /// without a network call.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Transport`] if the registry cannot be reached in time.
    /// - [`RegistryError::Registry`] for a non-2xx answer; an unknown id has
    ///   `status == 404` (see [`RegistryError::is_not_found`]).
    /// - [`RegistryError::Serialization`] if the response is not the expected JSON.
    /// - [`RegistryError::Compile`] if the returned schema text is invalid.
    pub async fn get_schema(&self, id: u32) -> Result<Arc<AvroCodec>> {
        if self.config.caching {
            if let Some(codec) = self.cache.schema(id) {
                tracing::debug!(id, "Schema cache hit");
                return Ok(codec);
            }
            tracing::debug!(id, "Schema cache miss");
        }

        let id_segment = id.to_string();
        let request = RegistryRequest::new(Method::GET, ["schemas", "ids", id_segment.as_str()]);
        let body = self.call(request).await?;

        let response: SchemaResponse = serde_json::from_slice(&body)?;
        let codec = AvroCodec::compile(response.schema)
            .map_err(|source| RegistryError::Compile { source })?;
        let codec = Arc::new(codec);

        if self.config.caching {
            return Ok(self.cache.put_schema(id, codec));
        }

        Ok(codec)
    }

    /// Registers schema text under a subject and returns its schema id.
    ///
    /// The registry returns the existing id when the same schema is already
    /// registered, so this is safe to call on every producer start.
    ///
    /// With caching enabled, a subject that was registered once returns the
    /// cached id without a network call, even if `schema_text` differs or the
    /// subject's latest version has since changed in the registry.
    ///
    /// # Errors
    ///
    /// Same as [`get_schema`](Self::get_schema), minus the compile step.
    pub async fn create_subject(&self, subject: &str, schema_text: &str) -> Result<u32> {
        if self.config.caching {
            if let Some(id) = self.cache.subject(subject) {
                tracing::debug!(subject, id, "Subject cache hit");
                return Ok(id);
            }
            tracing::debug!(subject, "Subject cache miss");
        }

        let payload = serde_json::to_vec(&SchemaRequest {
            schema: schema_text,
        })?;
        let request = RegistryRequest::new(Method::POST, ["subjects", subject, "versions"])
            .with_body(payload);
        let body = self.call(request).await?;

        let IdResponse { id } = serde_json::from_slice(&body)?;
        tracing::info!(subject, id, "Registered schema");

        if self.config.caching {
            self.cache.put_subject(subject, id);
        }

        Ok(id)
    }

    /// Sends one request with auth and content type attached, bounded by the
    /// configured timeout.
    async fn call(&self, request: RegistryRequest) -> Result<Vec<u8>> {
        let request = request.with_headers(self.request_headers()?);
        let path = request.path();
        tracing::debug!(method = %request.method, path = %path, "Sending registry request");

        let response = tokio::time::timeout(self.config.timeout, self.transport.send(request))
            .await
            .map_err(|_| RegistryError::Transport {
                url: format!("{}{path}", self.config.url),
                message: format!("request timed out after {:?}", self.config.timeout),
                timed_out: true,
                source: None,
            })??;

        response.into_body()
    }

    /// Creates the headers sent with every request.
    fn request_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(transport::CONTENT_TYPE));

        if let Some(Credentials { username, password }) = &self.config.credentials {
            let credentials = base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                format!("{username}:{password}"),
            );
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Basic {credentials}")).map_err(|_| {
                    RegistryError::InvalidCredentials {
                        message: "Credentials cannot be encoded as a header".to_string(),
                    }
                })?,
            );
        }

        Ok(headers)
    }
}
