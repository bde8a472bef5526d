//! HTTP transport seam.
//!
//! [`Transport`] performs the network exchange for one request and hands the
//! raw status, headers and body back to the client. [`ReqwestTransport`] is
//! the bundled implementation; tests and callers with their own HTTP stack can
//! plug in anything else.

use crate::auth::{Signer, SigningRequest};
use crate::config::ClientConfig;
use crate::error::{QnsError, SigningError, TransportError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;

/// HTTP methods used by the service API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully built request, ready to be signed and sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute path, already carrying the `/<api-version>/<account>` prefix
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub body: Option<String>,
    /// Extra time the server may hold the request open (long polling)
    pub server_wait: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: None,
            server_wait: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_server_wait(mut self, wait: Duration) -> Self {
        self.server_wait = Some(wait);
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response as received from the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header pairs in arrival order; names may repeat
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one signed HTTP exchange.
///
/// Implementations must sign each request through the provided signer right
/// before sending it, and must report connection and timeout failures as
/// errors rather than as responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        config: &ClientConfig,
        request: HttpRequest,
        signer: &dyn Signer,
    ) -> Result<HttpResponse, QnsError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
///
/// Connection pooling, TLS and redirects are left to reqwest. The timeout is
/// applied per request from the (possibly merged) configuration, extended by
/// the server-side wait of long-polling requests.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default reqwest client
    pub fn new() -> Result<Self, QnsError> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            TransportError::Request {
                message: format!("Failed to create HTTP client: {}", e),
            }
        })?;

        Ok(Self { http_client })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        config: &ClientConfig,
        request: HttpRequest,
        signer: &dyn Signer,
    ) -> Result<HttpResponse, QnsError> {
        let mut url = config.base_url()?;
        url.set_path(&request.path);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(TransportError::InvalidUrl {
                    message: format!("no host in '{}'", url),
                }
                .into())
            }
        };

        let mut headers = request.headers.clone();
        headers.insert("Host".to_string(), host.clone());

        let credentials =
            config
                .credentials
                .as_ref()
                .ok_or_else(|| SigningError::InvalidCredentials {
                    message: "No credentials configured".to_string(),
                })?;

        let signing_request = SigningRequest {
            method: request.method,
            host: &host,
            path: &request.path,
            headers: &headers,
            query: &request.query,
            body: request.body.as_deref(),
            timestamp: Utc::now(),
        };
        let auth_headers = signer.sign(&signing_request, credentials)?;

        let timeout = request_timeout(config, request.server_wait);

        let mut builder = self
            .http_client
            .request(request.method.into(), url.clone())
            .timeout(timeout)
            .header(reqwest::header::USER_AGENT, config.user_agent.as_str());

        for (name, value) in headers.iter().chain(auth_headers.iter()) {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Client timeout extended by the server-side wait, saturating at `Duration::MAX`
fn request_timeout(config: &ClientConfig, server_wait: Option<Duration>) -> Duration {
    config
        .timeout()
        .saturating_add(server_wait.unwrap_or_default())
}

fn map_reqwest_error(e: reqwest::Error) -> QnsError {
    let error = if e.is_timeout() {
        TransportError::Timeout {
            message: e.to_string(),
        }
    } else if e.is_connect() {
        TransportError::Connect {
            message: e.to_string(),
        }
    } else {
        TransportError::Request {
            message: e.to_string(),
        }
    };
    error.into()
}
