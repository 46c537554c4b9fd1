//! HTTP transport for content API requests.

use async_trait::async_trait;
use imgbed_error::{StoreError, StoreErrorKind, StoreResult};
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::borrow::Cow;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Media type requested from the content API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Media type asking the content API for the file bytes themselves.
pub const GITHUB_RAW_ACCEPT: &str = "application/vnd.github.raw";

/// User agent sent with every request (the API rejects requests without one).
pub const USER_AGENT: &str = concat!("imgbed/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP verbs used by the content API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ContentMethod {
    /// Read a file or list a directory
    #[display("GET")]
    Get,
    /// Create or update a file
    #[display("PUT")]
    Put,
    /// Delete a file
    #[display("DELETE")]
    Delete,
}

/// Representation requested from the content API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentFormat {
    /// JSON records and listings
    #[default]
    Json,
    /// Raw file bytes
    Raw,
}

impl ContentFormat {
    /// Value of the `Accept` header for this format.
    pub fn accept(&self) -> &'static str {
        match self {
            ContentFormat::Json => GITHUB_ACCEPT,
            ContentFormat::Raw => GITHUB_RAW_ACCEPT,
        }
    }
}

/// One content API request.
#[derive(Clone)]
pub struct ContentRequest {
    /// HTTP method
    pub method: ContentMethod,
    /// Absolute request URL
    pub url: String,
    /// Credential sent as `Authorization: token <credential>`
    pub token: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
    /// Requested representation
    pub format: ContentFormat,
}

impl ContentRequest {
    /// Creates a request without query or body.
    pub fn new(method: ContentMethod, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            token: token.into(),
            query: Vec::new(),
            body: None,
            format: ContentFormat::Json,
        }
    }

    /// Adds a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Asks for raw file bytes instead of a JSON record.
    pub fn raw(mut self) -> Self {
        self.format = ContentFormat::Raw;
        self
    }
}

impl fmt::Debug for ContentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query", &self.query)
            .field("has_body", &self.body.is_some())
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Status and raw body of a content API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl ContentResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Performs one HTTP exchange with the content API.
///
/// Implementations must not retry. A response with any status is returned as `Ok`; only a
/// failure to obtain a response at all is an error (`RemoteUnavailable` without status).
#[async_trait]
pub trait ContentTransport: Send + Sync {
    /// Sends the request and returns the raw response.
    async fn send(&self, request: ContentRequest) -> StoreResult<ContentResponse>;
}

/// [`ContentTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default user agent and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument]
    pub fn new() -> StoreResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build HTTP client");
                StoreError::new(StoreErrorKind::RemoteUnavailable {
                    status: None,
                    message: format!("Failed to build HTTP client: {}", e),
                })
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: ContentRequest) -> StoreResult<ContentResponse> {
        let builder = match request.method {
            ContentMethod::Get => self.client.get(&request.url),
            ContentMethod::Put => self.client.put(&request.url),
            ContentMethod::Delete => self.client.delete(&request.url),
        };

        let mut builder = builder
            .header(AUTHORIZATION, format!("token {}", request.token))
            .header(ACCEPT, request.format.accept())
            .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = ?e, "Failed to send request to content API");
            StoreError::new(StoreErrorKind::RemoteUnavailable {
                status: None,
                message: format!("Request failed: {}", e),
            })
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            error!(error = ?e, status, "Failed to read response body");
            StoreError::new(StoreErrorKind::RemoteUnavailable {
                status: Some(status),
                message: format!("Failed to read response body: {}", e),
            })
        })?;

        debug!(status, body_len = body.len(), "Received content API response");
        Ok(ContentResponse::new(status, body.to_vec()))
    }
}
