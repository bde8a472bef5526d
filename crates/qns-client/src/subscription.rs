//! Subscription attribute and listing types.

use crate::error::ValidationError;
use crate::params::{is_unset_or_blank, is_unset_or_zero};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;

/// Service default long-poll duration for receive calls
pub const DEFAULT_RECEIVE_WAIT_SECONDS: u32 = 0;

/// Service default visibility timeout
pub const DEFAULT_VISIBILITY_TIMEOUT_SECONDS: u32 = 30;

/// Push protocol version used when none is given
pub const DEFAULT_PUSH_VERSION: &str = "v1alpha";

/// Push delivery target. A subscription without one is pull-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(skip_serializing_if = "is_unset_or_blank")]
    pub version: Option<String>,
}

impl PushConfig {
    /// Push to `endpoint` using the default protocol version
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            version: Some(DEFAULT_PUSH_VERSION.to_string()),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// An empty push endpoint omits `pushConfig` from the body entirely; no
/// bare `{"version": ...}` object is sent.
fn is_pull_only(push_config: &Option<PushConfig>) -> bool {
    push_config
        .as_ref()
        .map_or(true, |config| config.endpoint.is_empty())
}

/// Subscription settings sent on create and update.
///
/// Only set, non-zero fields are transmitted. A push config with an empty
/// endpoint is dropped entirely, version included, which leaves the
/// subscription pull-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubscriptionAttributes {
    #[serde(skip_serializing_if = "is_unset_or_zero")]
    pub receive_message_wait_time_in_seconds: Option<u32>,
    #[serde(skip_serializing_if = "is_unset_or_zero")]
    pub visibility_timeout_in_seconds: Option<u32>,
    #[serde(skip_serializing_if = "is_pull_only")]
    pub push_config: Option<PushConfig>,
}

impl SubscriptionAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_receive_wait(mut self, seconds: u32) -> Self {
        self.receive_message_wait_time_in_seconds = Some(seconds);
        self
    }

    pub fn with_visibility_timeout(mut self, seconds: u32) -> Self {
        self.visibility_timeout_in_seconds = Some(seconds);
        self
    }

    pub fn with_push_config(mut self, push_config: PushConfig) -> Self {
        self.push_config = Some(push_config);
        self
    }

    /// Check that a push endpoint, when given, is an absolute URL
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(push) = self.push_config.as_ref().filter(|p| !p.endpoint.is_empty()) {
            url::Url::parse(&push.endpoint).map_err(|e| ValidationError::InvalidFormat {
                field: "push_config.endpoint".to_string(),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

/// Body of a create call: the attributes plus the bound topic
#[derive(Debug, Serialize)]
pub(crate) struct CreateSubscriptionBody<'a> {
    pub(crate) topic: &'a str,
    #[serde(flatten)]
    pub(crate) attributes: &'a SubscriptionAttributes,
}

/// A subscription as reported by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Subscription {
    pub name: String,
    /// Bound topic; empty once the topic has been deleted
    pub topic: String,
    #[serde(flatten)]
    pub attributes: SubscriptionAttributes,
    pub create_time: Option<i64>,
    pub last_modify_time: Option<i64>,
}

impl Subscription {
    pub fn is_push(&self) -> bool {
        !is_pull_only(&self.attributes.push_config)
    }
}

/// Subscriptions owned by the account or bound to one topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubscriptionList {
    pub subscriptions: Vec<Subscription>,
    pub next_marker: Option<String>,
    pub is_truncated: bool,
}
