//! Resource identifiers and message types.

use crate::error::ValidationError;
use crate::params::is_unset_or_zero;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// Maximum size of a single message body in bytes (256 KiB)
pub const MAX_MESSAGE_BODY_BYTES: usize = 256 * 1024;

/// Maximum number of messages in one send call
pub const MAX_BATCH_SIZE: usize = 1000;

/// Maximum length of topic and subscription names
pub const MAX_NAME_LENGTH: usize = 256;

// ============================================================================
// Core Domain Identifiers
// ============================================================================

fn validate_resource_name(field: &str, name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            message: format!("must be 1-{} characters", MAX_NAME_LENGTH),
        });
    }

    // Names are placed verbatim in a URL path segment
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            message: "only ASCII alphanumeric, hyphens, and underscores allowed".to_string(),
        });
    }

    Ok(())
}

/// Validated topic name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicName(String);

impl TopicName {
    /// Create new topic name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_resource_name("topic_name", &name)?;
        Ok(Self(name))
    }

    /// Get topic name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TopicName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TopicName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Validated subscription name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionName(String);

impl SubscriptionName {
    /// Create new subscription name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_resource_name("subscription_name", &name)?;
        Ok(Self(name))
    }

    /// Get subscription name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubscriptionName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Opaque token identifying one in-flight delivery of a message.
///
/// Valid only until the delivery's next visible time. Deleting a message or
/// changing its visibility requires the handle of the current delivery; a
/// successful visibility change invalidates the old handle and returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptHandle(String);

impl ReceiptHandle {
    pub fn new(handle: impl Into<String>) -> Result<Self, ValidationError> {
        let handle = handle.into();
        if handle.is_empty() {
            return Err(ValidationError::Required {
                field: "receipt_handle".to_string(),
            });
        }
        Ok(Self(handle))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReceiptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReceiptHandle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// Outgoing Messages
// ============================================================================

/// A message to publish to a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub message_body: String,
    /// Per-message delivery delay, overriding the topic's delay
    #[serde(skip_serializing_if = "is_unset_or_zero")]
    pub delay_in_seconds: Option<u32>,
}

impl OutgoingMessage {
    pub fn new(message_body: impl Into<String>) -> Self {
        Self {
            message_body: message_body.into(),
            delay_in_seconds: None,
        }
    }

    pub fn with_delay(mut self, delay_in_seconds: u32) -> Self {
        self.delay_in_seconds = Some(delay_in_seconds);
        self
    }

    /// Check the body against the service size limit
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.message_body.is_empty() {
            return Err(ValidationError::Required {
                field: "message_body".to_string(),
            });
        }

        let size = self.message_body.len();
        if size > MAX_MESSAGE_BODY_BYTES {
            return Err(ValidationError::OutOfRange {
                field: "message_body".to_string(),
                message: format!(
                    "{} bytes exceeds maximum of {} bytes",
                    size, MAX_MESSAGE_BODY_BYTES
                ),
            });
        }

        Ok(())
    }
}

/// Body of a send call
#[derive(Debug, Serialize)]
pub(crate) struct SendMessagesBody<'a> {
    pub(crate) messages: &'a [OutgoingMessage],
}

/// Validate a batch before it is sent
pub(crate) fn validate_batch(messages: &[OutgoingMessage]) -> Result<(), ValidationError> {
    if messages.is_empty() {
        return Err(ValidationError::Required {
            field: "messages".to_string(),
        });
    }

    if messages.len() > MAX_BATCH_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "messages".to_string(),
            message: format!(
                "{} messages exceeds maximum of {} per call",
                messages.len(),
                MAX_BATCH_SIZE
            ),
        });
    }

    messages.iter().try_for_each(OutgoingMessage::validate)
}

// ============================================================================
// Receiving
// ============================================================================

/// Options for a receive call.
///
/// Unset values are not sent, leaving the subscription's settings in effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiveOptions {
    /// Long-poll duration; the call may block up to this long with no messages
    pub wait_in_seconds: Option<u32>,
    pub max_messages: Option<u32>,
    /// Return messages without making them invisible
    pub peek: Option<bool>,
}

impl ReceiveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wait(mut self, wait_in_seconds: u32) -> Self {
        self.wait_in_seconds = Some(wait_in_seconds);
        self
    }

    pub fn with_max_messages(mut self, max_messages: u32) -> Self {
        self.max_messages = Some(max_messages);
        self
    }

    pub fn with_peek(mut self, peek: bool) -> Self {
        self.peek = Some(peek);
        self
    }
}

/// Identifier assigned to a published message
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SentMessage {
    pub message_id: Option<String>,
    pub md5_of_body: Option<String>,
}

/// Result of a send call
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SendMessageResult {
    pub messages: Vec<SentMessage>,
}

/// A message delivered by a receive call
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReceivedMessage {
    pub message_id: Option<String>,
    pub message_body: String,
    /// Absent for peeked messages
    pub receipt_handle: Option<ReceiptHandle>,
    /// Epoch milliseconds at which the message becomes visible again
    pub next_visible_time: Option<i64>,
    pub enqueue_time: Option<i64>,
    pub first_dequeue_time: Option<i64>,
    pub dequeue_count: Option<u32>,
    pub md5_of_body: Option<String>,
}

impl ReceivedMessage {
    pub fn next_visible_at(&self) -> Option<DateTime<Utc>> {
        self.next_visible_time
            .and_then(DateTime::from_timestamp_millis)
    }

    pub fn enqueued_at(&self) -> Option<DateTime<Utc>> {
        self.enqueue_time.and_then(DateTime::from_timestamp_millis)
    }
}

/// Result of a receive call; empty when the long poll timed out
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReceiveMessageResult {
    pub messages: Vec<ReceivedMessage>,
}

/// Result of a visibility change
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeVisibilityResult {
    /// Replaces the handle used in the request
    pub receipt_handle: Option<ReceiptHandle>,
    pub next_visible_time: Option<i64>,
}

impl ChangeVisibilityResult {
    pub fn next_visible_at(&self) -> Option<DateTime<Utc>> {
        self.next_visible_time
            .and_then(DateTime::from_timestamp_millis)
    }
}
