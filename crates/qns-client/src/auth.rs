//! Request signing contract.
//!
//! The signing algorithm itself is supplied by the caller. The client hands
//! every outgoing request to a [`Signer`] exactly once, right before it is
//! sent, and attaches whatever headers the signer returns.

use crate::error::SigningError;
use crate::transport::HttpMethod;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

/// Access key pair used to authenticate against the service.
///
/// The secret is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    /// Create a new credential pair
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// True when either half of the key pair is blank
    pub fn is_empty(&self) -> bool {
        self.access_key_id.trim().is_empty() || self.secret_access_key.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .finish()
    }
}

/// Everything a signer may cover with its signature.
#[derive(Debug, Clone)]
pub struct SigningRequest<'a> {
    pub method: HttpMethod,
    /// Host the request is addressed to (endpoint without scheme)
    pub host: &'a str,
    /// Absolute request path, including the `/v1/<account>` prefix
    pub path: &'a str,
    pub headers: &'a BTreeMap<String, String>,
    pub query: &'a BTreeMap<String, String>,
    pub body: Option<&'a str>,
    pub timestamp: DateTime<Utc>,
}

/// Produces authentication headers for a single request.
///
/// Implementations must be deterministic for identical inputs and safe to
/// share across tasks. Results must not be cached across requests.
pub trait Signer: Send + Sync {
    fn sign(
        &self,
        request: &SigningRequest<'_>,
        credentials: &Credentials,
    ) -> Result<HashMap<String, String>, SigningError>;
}

impl<S: Signer + ?Sized> Signer for std::sync::Arc<S> {
    fn sign(
        &self,
        request: &SigningRequest<'_>,
        credentials: &Credentials,
    ) -> Result<HashMap<String, String>, SigningError> {
        (**self).sign(request, credentials)
    }
}
