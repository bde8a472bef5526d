//! Topic attribute and listing types.

use crate::error::ValidationError;
use crate::params::is_unset_or_zero;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "topic_tests.rs"]
mod tests;

/// Service default delivery delay for new topics
pub const DEFAULT_TOPIC_DELAY_SECONDS: u32 = 0;

/// Service default (and maximum) message size for new topics
pub const DEFAULT_MAXIMUM_MESSAGE_SIZE_BYTES: u32 = 262_144;

/// Service default message retention for new topics (14 days)
pub const DEFAULT_MESSAGE_RETENTION_SECONDS: u32 = 1_209_600;

/// Topic settings sent on create and update.
///
/// Only set, non-zero fields are transmitted, so an update touches just the
/// fields the caller provided and service defaults apply to the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopicAttributes {
    #[serde(skip_serializing_if = "is_unset_or_zero")]
    pub delay_in_seconds: Option<u32>,
    #[serde(skip_serializing_if = "is_unset_or_zero")]
    pub maximum_message_size_in_bytes: Option<u32>,
    #[serde(skip_serializing_if = "is_unset_or_zero")]
    pub message_retention_period_in_seconds: Option<u32>,
}

impl TopicAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay_in_seconds: u32) -> Self {
        self.delay_in_seconds = Some(delay_in_seconds);
        self
    }

    pub fn with_maximum_message_size(mut self, bytes: u32) -> Self {
        self.maximum_message_size_in_bytes = Some(bytes);
        self
    }

    pub fn with_message_retention_period(mut self, seconds: u32) -> Self {
        self.message_retention_period_in_seconds = Some(seconds);
        self
    }

    /// Check set values against the bounds the service enforces.
    ///
    /// Only the message size has a published client-side ceiling. Upper
    /// bounds for delay and retention are service-defined, so those values
    /// pass through and out-of-range ones come back as service errors.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(size) = self.maximum_message_size_in_bytes {
            if size > DEFAULT_MAXIMUM_MESSAGE_SIZE_BYTES {
                return Err(ValidationError::OutOfRange {
                    field: "maximum_message_size_in_bytes".to_string(),
                    message: format!("must not exceed {}", DEFAULT_MAXIMUM_MESSAGE_SIZE_BYTES),
                });
            }
        }

        Ok(())
    }
}

/// A topic as reported by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Topic {
    pub name: String,
    #[serde(flatten)]
    pub attributes: TopicAttributes,
    pub create_time: Option<i64>,
    pub last_modify_time: Option<i64>,
}

/// Topics owned by the account
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopicList {
    pub topics: Vec<Topic>,
    pub next_marker: Option<String>,
    pub is_truncated: bool,
}
