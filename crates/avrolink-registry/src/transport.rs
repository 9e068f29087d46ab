//! HTTP transport for registry requests.
//!
//! [`Transport`] is the seam between [`RegistryClient`](crate::RegistryClient)
//! and the network. [`HttpTransport`] is the `reqwest` implementation. Tests
//! plug in their own transport to count or script requests.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};

/// Content type of every registry request.
pub const CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";

/// Message used when an error body cannot be parsed and the status has no
/// canonical reason.
const UNRECOGNIZED_ERROR: &str = "Unrecognized error found";

/// A single registry request.
#[derive(Debug, Clone)]
pub struct RegistryRequest {
    /// HTTP method.
    pub method: Method,
    /// Path segments below the base URL, unencoded.
    pub segments: Vec<String>,
    /// Request headers (auth and content type).
    pub headers: HeaderMap,
    /// JSON body, if any.
    pub body: Option<Vec<u8>>,
}

impl RegistryRequest {
    /// Creates a request for the given path segments.
    #[must_use]
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attaches headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the unencoded request path, e.g. `/schemas/ids/1`.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.iter().fold(String::new(), |mut path, segment| {
            path.push('/');
            path.push_str(segment);
            path
        })
    }
}

impl fmt::Display for RegistryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path())
    }
}

/// A raw registry response.
#[derive(Debug, Clone)]
pub struct RegistryResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response body.
    pub body: Vec<u8>,
}

/// Error body returned by the registry.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error_code: i32,
    message: String,
}

impl RegistryResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns the body of a 2xx response, or translates any other status into
    /// [`RegistryError::Registry`].
    ///
    /// The registry's `{"error_code": .., "message": ..}` body is used when it
    /// parses. Otherwise the error carries the HTTP status as its code and the
    /// status text as its message.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Registry`] for any non-2xx status.
    pub fn into_body(self) -> Result<Vec<u8>> {
        if self.status.is_success() {
            return Ok(self.body);
        }

        let status = self.status.as_u16();
        match serde_json::from_slice::<ErrorBody>(&self.body) {
            Ok(body) => Err(RegistryError::Registry {
                status,
                code: body.error_code,
                message: body.message,
            }),
            Err(e) => {
                tracing::warn!(status, error = %e, "Unparseable registry error body, using HTTP status");
                Err(RegistryError::Registry {
                    status,
                    code: i32::from(status),
                    message: self
                        .status
                        .canonical_reason()
                        .unwrap_or(UNRECOGNIZED_ERROR)
                        .to_string(),
                })
            }
        }
    }
}

/// Sends registry requests.
///
/// Implementations report unreachable registries as
/// [`RegistryError::Transport`] and return every HTTP response, successful or
/// not, as a [`RegistryResponse`].
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends one request and returns the raw response.
    async fn send(&self, request: RegistryRequest) -> Result<RegistryResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport for the configured registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidUrl`] if the URL does not parse or
    /// cannot carry a path, or [`RegistryError::Transport`] if the HTTP client
    /// cannot be built.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url).map_err(|_| RegistryError::InvalidUrl {
            url: config.url.clone(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RegistryError::InvalidUrl {
                url: config.url.clone(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| RegistryError::Transport {
                url: config.url.clone(),
                message: e.to_string(),
                timed_out: false,
                source: Some(e),
            })?;

        Ok(Self { base_url, http })
    }

    /// Returns the registry base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the full URL for a request, percent-encoding each segment.
    fn url_for(&self, request: &RegistryRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RegistryError::InvalidUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RegistryRequest) -> Result<RegistryResponse> {
        let url = self.url_for(&request)?;

        let mut builder = self
            .http
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok(RegistryResponse::new(status, body.to_vec()))
    }
}
