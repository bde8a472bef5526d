//! Client configuration and per-call overrides.
//!
//! A [`ClientConfig`] is fixed when the client is built. Individual calls may
//! pass [`ConfigOverrides`]; a non-empty override set produces a fresh merged
//! configuration for that call only and never touches the base.
//!
//! Configuration can also be assembled from a file plus `QNS__*` environment
//! variables:
//!
//! ```no_run
//! use qns_client::ClientConfig;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // QNS__ACCOUNT=acct QNS__CREDENTIALS__ACCESS_KEY_ID=... overrides file values
//! let config = ClientConfig::load(Some(Path::new("config/qns.yaml")))?;
//! # Ok(())
//! # }
//! ```

use crate::auth::Credentials;
use crate::error::ConfigurationError;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// API version segment placed in front of every request path
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Prefix for configuration environment variables
pub const ENV_PREFIX: &str = "QNS";

/// URL scheme used when the endpoint does not carry one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for QNS client behavior.
///
/// # Examples
///
/// ```
/// use qns_client::{ClientConfig, Credentials};
/// use std::time::Duration;
///
/// let config = ClientConfig::new("my-account", "qns.example.com")
///     .with_credentials(Credentials::new("AK", "SK"))
///     .with_timeout(Duration::from_secs(10));
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Account identifier, the second segment of every request path
    pub account: String,
    /// Service host, optionally with scheme and port
    pub endpoint: String,
    /// Scheme used when `endpoint` has none
    pub protocol: Protocol,
    /// Access keys handed to the signer
    pub credentials: Option<Credentials>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent sent with every request
    pub user_agent: String,
    /// API version path segment
    pub api_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            endpoint: String::new(),
            protocol: Protocol::default(),
            credentials: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: format!("qns-client/{}", env!("CARGO_PKG_VERSION")),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for an account at the given endpoint
    pub fn new(account: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Load configuration from an optional file and `QNS__*` environment variables.
    ///
    /// Environment variables win over file values and use a double underscore
    /// as the nesting separator, e.g. `QNS__CREDENTIALS__ACCESS_KEY_ID`. The
    /// file format is inferred from its extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the file cannot be read, a value cannot
    /// be coerced to its field type, or the result fails [`validate`](Self::validate).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            account = %config.account,
            endpoint = %config.endpoint,
            has_credentials = config.credentials.is_some(),
            "Loaded QNS client configuration"
        );

        Ok(config)
    }

    /// Check that the configuration can address the service
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.account.trim().is_empty() {
            return Err(ConfigurationError::Missing {
                key: "account".to_string(),
            });
        }

        if self.account.contains('/') {
            return Err(ConfigurationError::Invalid {
                message: "account must not contain '/'".to_string(),
            });
        }

        if self.endpoint.trim().is_empty() {
            return Err(ConfigurationError::Missing {
                key: "endpoint".to_string(),
            });
        }

        if self.api_version.trim().is_empty() {
            return Err(ConfigurationError::Missing {
                key: "api_version".to_string(),
            });
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigurationError::Invalid {
                message: "timeout_seconds must be greater than zero".to_string(),
            });
        }

        self.base_url()?;
        Ok(())
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the protocol.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the request timeout. Sub-second precision is rounded up.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_seconds = duration_to_seconds(timeout);
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Path prefix shared by every request: `/<api-version>/<account>`
    pub fn path_prefix(&self) -> String {
        format!("/{}/{}", self.api_version, self.account)
    }

    /// Base URL of the service, honoring a scheme embedded in the endpoint.
    ///
    /// The endpoint names a host (and optionally scheme and port) only; a
    /// path, query or fragment is rejected since request paths are absolute.
    pub fn base_url(&self) -> Result<Url, ConfigurationError> {
        let endpoint = self.endpoint.trim();
        let raw = if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("{}://{}", self.protocol, endpoint)
        };

        let url = Url::parse(&raw).map_err(|e| ConfigurationError::Invalid {
            message: format!("invalid endpoint '{}': {}", self.endpoint, e),
        })?;

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigurationError::Invalid {
                message: format!("endpoint '{}' has no host", self.endpoint),
            });
        }

        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigurationError::Invalid {
                message: format!(
                    "endpoint '{}' must not carry a path, query or fragment",
                    self.endpoint
                ),
            });
        }

        Ok(url)
    }

    /// Merge per-call overrides over this configuration.
    ///
    /// Empty overrides borrow `self` unchanged; otherwise a new configuration is
    /// built where every set override replaces the corresponding base value.
    pub fn merged(&self, overrides: &ConfigOverrides) -> Cow<'_, ClientConfig> {
        if overrides.is_empty() {
            return Cow::Borrowed(self);
        }

        let mut merged = self.clone();
        if let Some(endpoint) = &overrides.endpoint {
            merged.endpoint = endpoint.clone();
        }
        if let Some(protocol) = overrides.protocol {
            merged.protocol = protocol;
        }
        if let Some(credentials) = &overrides.credentials {
            merged.credentials = Some(credentials.clone());
        }
        if let Some(timeout) = overrides.timeout {
            merged.timeout_seconds = duration_to_seconds(timeout);
        }

        Cow::Owned(merged)
    }
}

/// Per-call replacements for parts of the client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub protocol: Option<Protocol>,
    pub credentials: Option<Credentials>,
    pub timeout: Option<Duration>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// True when no override is set
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.protocol.is_none()
            && self.credentials.is_none()
            && self.timeout.is_none()
    }
}

/// Options accepted by every client operation
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub overrides: ConfigOverrides,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying the given configuration overrides
    pub fn with_overrides(overrides: ConfigOverrides) -> Self {
        Self { overrides }
    }
}

fn duration_to_seconds(duration: Duration) -> u64 {
    let seconds = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        seconds.saturating_add(1)
    } else {
        seconds
    }
}
