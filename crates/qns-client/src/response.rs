//! Decoded responses and response metadata.
//!
//! Every operation returns a [`Response`] pairing the typed service payload
//! with a [`Metadata`] map built from all response headers.

use crate::error::QnsError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Deref;

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;

/// Header carrying the service-assigned request identifier
pub const REQUEST_ID_HEADER: &str = "x-bce-request-id";

/// Response headers, keyed by lower-cased header name.
///
/// Repeated headers are joined with `", "` so no value is lost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Build metadata from raw header pairs
    pub fn from_headers<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in headers {
            let name = name.as_ref().trim().to_ascii_lowercase();
            let value = value.into();
            map.entry(name)
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }
        Self(map)
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.get(REQUEST_ID_HEADER)
    }

    pub fn etag(&self) -> Option<&str> {
        self.get("etag")
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get("content-type")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

/// A decoded service payload together with its response metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub payload: T,
    pub metadata: Metadata,
}

impl<T> Response<T> {
    pub fn new(payload: T, metadata: Metadata) -> Self {
        Self { payload, metadata }
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Transform the payload while keeping the metadata
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            payload: f(self.payload),
            metadata: self.metadata,
        }
    }
}

impl<T> Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}

/// Payload of operations that return no fields on success
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Empty {}

/// Error document returned by the service on failure
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ServiceErrorBody {
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

/// Decode a success body into `T`.
///
/// An empty body decodes as an empty JSON object; anything that is not a JSON
/// object is rejected as a decode error.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, QnsError> {
    let trimmed = body.trim();
    let value = if trimmed.is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str::<serde_json::Value>(trimmed).map_err(|e| QnsError::Decode {
            message: format!("response body is not valid JSON: {}", e),
        })?
    };

    if !value.is_object() {
        return Err(QnsError::Decode {
            message: "response body is not a JSON object".to_string(),
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// Turn a non-success response into a structured service error
pub(crate) fn decode_service_error(status: u16, body: &str, metadata: &Metadata) -> QnsError {
    let parsed = serde_json::from_str::<serde_json::Value>(body.trim())
        .ok()
        .filter(serde_json::Value::is_object)
        .and_then(|value| serde_json::from_value::<ServiceErrorBody>(value).ok());

    let (code, message, request_id) = match parsed {
        Some(error) => (error.code, error.message, error.request_id),
        None => (None, None, None),
    };

    let message = message
        .or_else(|| {
            let raw = body.trim();
            (!raw.is_empty()).then(|| raw.to_string())
        })
        .unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown error")
                .to_string()
        });

    QnsError::Service {
        status,
        code: code.unwrap_or_else(|| "Unknown".to_string()),
        message,
        request_id: request_id.or_else(|| metadata.request_id().map(str::to_string)),
    }
}
