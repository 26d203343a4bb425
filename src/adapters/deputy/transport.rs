//! Deputy API transport
//!
//! One authenticated HTTPS request/response exchange per call. This is the
//! only place the vendor is spoken to over the wire; everything above it
//! works in terms of decoded JSON and typed errors. The transport performs
//! no retries and no caching; a failure is terminal for the calling
//! operation.

use crate::config::SecretString;
use crate::domain::errors::ApiError;
use async_trait::async_trait;
use reqwest::{header, redirect, Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::watch;
use url::Url;

/// HTTP method for a vendor call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// API credentials, immutable for the lifetime of a transport instance
#[derive(Debug, Clone)]
pub struct Credentials {
    endpoint: String,
    token: SecretString,
    timeout: Duration,
}

impl Credentials {
    /// Create credentials for `endpoint`, e.g.
    /// `https://{install}.{geo}.deputy.com/api/v1/`.
    ///
    /// A missing trailing slash is added so that relative paths resolve
    /// under the API root instead of replacing its last segment.
    pub fn new(endpoint: impl Into<String>, token: SecretString, timeout: Duration) -> Self {
        let mut endpoint = endpoint.into();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        Self {
            endpoint,
            token,
            timeout,
        }
    }

    /// The normalized endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// The seam between the fetch layer and the network
///
/// Implemented by [`HttpTransport`] in production and by canned stubs in
/// tests, so pagination and report logic can be exercised without a server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one call against the vendor API and return the decoded JSON
    /// response (object or list, vendor-defined).
    ///
    /// The `dp-meta-option: none` header is sent unless `extended_meta` is
    /// set, which asks the vendor to include additional response metadata.
    ///
    /// # Errors
    ///
    /// Returns a distinct [`ApiError`] kind for every failure mode:
    /// malformed URL, user cancellation, timeout, socket fault, unexpected
    /// redirect, non-200 status, or a non-JSON response body.
    async fn call(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        extended_meta: bool,
    ) -> Result<Value, ApiError>;
}

/// Production transport over reqwest
///
/// Redirects are disabled: Deputy never redirects API calls, so a 3xx is
/// surfaced as [`ApiError::UnexpectedRedirect`] rather than followed. The
/// per-call timeout is fixed at construction and applied uniformly.
pub struct HttpTransport {
    base: Url,
    token: SecretString,
    client: Client,
    shutdown: Option<watch::Receiver<bool>>,
}

impl HttpTransport {
    /// Build a transport from credentials
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidEndpoint`] if the endpoint URL is
    /// malformed, or a network error if the TLS backend cannot initialize.
    pub fn new(credentials: &Credentials) -> Result<Self, ApiError> {
        let base = Url::parse(credentials.endpoint())
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {e}", credentials.endpoint())))?;

        let client = ClientBuilder::new()
            .timeout(credentials.timeout)
            .connect_timeout(credentials.timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| ApiError::Network {
                path: String::new(),
                code: None,
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            base,
            token: credentials.token.clone(),
            client,
            shutdown: None,
        })
    }

    /// Attach a shutdown signal. When the signal flips to `true` while a
    /// call is in flight, the call aborts with [`ApiError::UserCancelled`].
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    fn classify_send_error(path: &str, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            return ApiError::Timeout {
                path: path.to_string(),
            };
        }
        ApiError::Network {
            path: path.to_string(),
            code: os_error_code(&err),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        extended_meta: bool,
    ) -> Result<Value, ApiError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{path}: {e}")))?;

        let mut request = self
            .client
            .request(method.into(), url)
            .header(
                header::AUTHORIZATION,
                format!("OAuth {}", self.token.expose_secret()),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");

        if !extended_meta {
            request = request.header("dp-meta-option", "none");
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::trace!(path, method = ?method, "Issuing API call");

        let result = match &self.shutdown {
            Some(shutdown) => {
                let mut shutdown = shutdown.clone();
                tokio::select! {
                    result = request.send() => result,
                    _ = async {
                        // Sender gone: nobody can cancel us any more
                        if shutdown.wait_for(|cancelled| *cancelled).await.is_err() {
                            std::future::pending::<()>().await;
                        }
                    } => return Err(ApiError::UserCancelled),
                }
            }
            None => request.send().await,
        };

        let response = result.map_err(|e| Self::classify_send_error(path, e))?;

        let status = response.status();
        if status.is_redirection() {
            return Err(ApiError::UnexpectedRedirect {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        if status != StatusCode::OK {
            return Err(ApiError::Http {
                path: path.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| Self::classify_send_error(path, e))?;

        serde_json::from_str(&text).map_err(|e| ApiError::ResponseParse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Walk an error's source chain for an OS-level error code
///
/// Custom-payload io errors hide their payload from `source()`, so those
/// are followed through `get_ref` instead.
fn os_error_code(err: &(dyn std::error::Error + 'static)) -> Option<i32> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if let Some(code) = io.raw_os_error() {
                return Some(code);
            }
            if let Some(inner) = io.get_ref() {
                let inner: &(dyn std::error::Error + 'static) = inner;
                current = Some(inner);
                continue;
            }
        }
        current = e.source();
    }
    None
}
