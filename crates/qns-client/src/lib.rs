//! # QNS Client
//!
//! Client library for the QNS hosted message queue service. Producers
//! publish messages to topics; consumers pull them from subscriptions bound
//! to those topics, or have them pushed to an HTTP endpoint.
//!
//! This crate provides:
//! - Topic and subscription lifecycle management
//! - Publishing, receiving, deleting and re-timing messages
//! - Typed request attributes with wire-compatible filtering of unset values
//! - Per-call configuration overrides
//! - Pluggable request signing and HTTP transport
//!
//! Request signing is delegated to a caller-supplied [`Signer`].
//!
//! # Examples
//!
//! ## Publishing and Consuming
//!
//! ```rust,no_run
//! use qns_client::{
//!     ClientConfig, Credentials, OutgoingMessage, QnsClient, ReceiveOptions, RequestOptions,
//!     Signer, SubscriptionAttributes, SubscriptionName, TopicAttributes, TopicName,
//! };
//!
//! # async fn example(signer: impl Signer + 'static) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("my-account", "qns.example.com")
//!     .with_credentials(Credentials::new("AK", "SK"));
//! let client = QnsClient::builder(config, signer).build()?;
//! let options = RequestOptions::default();
//!
//! let topic = TopicName::new("orders")?;
//! let subscription = SubscriptionName::new("billing")?;
//!
//! client.create_topic(&topic, &TopicAttributes::new(), &options).await?;
//! client
//!     .create_subscription(&subscription, &topic, &SubscriptionAttributes::new(), &options)
//!     .await?;
//!
//! client
//!     .send_message(&topic, OutgoingMessage::new("order #1"), &options)
//!     .await?;
//!
//! let received = client
//!     .receive_message(&subscription, &ReceiveOptions::new().with_wait(10), &options)
//!     .await?;
//! for message in &received.messages {
//!     if let Some(handle) = &message.receipt_handle {
//!         client.delete_message(&subscription, handle, &options).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Per-call Overrides
//!
//! ```rust
//! use qns_client::{ClientConfig, ConfigOverrides};
//!
//! let config = ClientConfig::new("my-account", "qns.example.com");
//! let overrides = ConfigOverrides::new().with_endpoint("qns.other-region.example.com");
//!
//! let merged = config.merged(&overrides);
//! assert_eq!(merged.endpoint, "qns.other-region.example.com");
//! assert_eq!(merged.account, "my-account");
//! ```

// Public modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod response;
pub mod subscription;
pub mod topic;
pub mod transport;

mod params;

// Re-export commonly used types at crate root for convenience
pub use error::{
    ConfigurationError, QnsError, SigningError, TransportError, ValidationError,
};

pub use auth::{Credentials, Signer, SigningRequest};
pub use client::{QnsClient, QnsClientBuilder};
pub use config::{ClientConfig, ConfigOverrides, Protocol, RequestOptions};
pub use message::{
    ChangeVisibilityResult, OutgoingMessage, ReceiptHandle, ReceiveMessageResult, ReceiveOptions,
    ReceivedMessage, SendMessageResult, SentMessage, SubscriptionName, TopicName,
};
pub use response::{Empty, Metadata, Response};
pub use subscription::{PushConfig, Subscription, SubscriptionAttributes, SubscriptionList};
pub use topic::{Topic, TopicAttributes, TopicList};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
