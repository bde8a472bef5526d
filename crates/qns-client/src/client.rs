//! QNS API client.
//!
//! [`QnsClient`] turns typed calls into signed HTTP requests against the
//! service's REST API and decodes the JSON responses. Each call is a single
//! request/response round trip; the client holds no mutable state, so one
//! instance can be cloned and shared freely across tasks.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::Signer;
use crate::config::{ClientConfig, RequestOptions};
use crate::error::QnsError;
use crate::message::{
    validate_batch, ChangeVisibilityResult, OutgoingMessage, ReceiptHandle, ReceiveMessageResult,
    ReceiveOptions, SendMessageResult, SendMessagesBody, SubscriptionName, TopicName,
};
use crate::params::QueryParams;
use crate::response::{decode_body, decode_service_error, Empty, Metadata, Response};
use crate::subscription::{
    CreateSubscriptionBody, Subscription, SubscriptionAttributes, SubscriptionList,
};
use crate::topic::{Topic, TopicAttributes, TopicList};
use crate::transport::{HttpMethod, HttpRequest, ReqwestTransport, Transport};

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Content type attached to requests that carry a body
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// QNS API client.
///
/// # Examples
///
/// ```no_run
/// # use qns_client::{QnsClient, ClientConfig, Credentials, Signer, TopicName, TopicAttributes, RequestOptions};
/// # async fn example(signer: impl Signer + 'static) -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new("my-account", "qns.example.com")
///     .with_credentials(Credentials::new("AK", "SK"));
/// let client = QnsClient::builder(config, signer).build()?;
///
/// let topic = TopicName::new("orders")?;
/// client
///     .create_topic(&topic, &TopicAttributes::new().with_delay(5), &RequestOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct QnsClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    signer: Arc<dyn Signer>,
    path_prefix: String,
}

impl QnsClient {
    /// Create a new builder for constructing a QNS client.
    pub fn builder(config: ClientConfig, signer: impl Signer + 'static) -> QnsClientBuilder {
        QnsClientBuilder::new(config, Arc::new(signer))
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Path prefix shared by every request, `/<api-version>/<account>`.
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    // ========================================================================
    // Topic Operations
    // ========================================================================

    /// Create a topic.
    ///
    /// Only attributes that are set and non-zero are sent; the service applies
    /// its defaults to the rest.
    ///
    /// # Errors
    ///
    /// Returns `QnsError::Validation` if an attribute is out of range, or a
    /// service error such as `TopicAlreadyExists`.
    pub async fn create_topic(
        &self,
        topic: &TopicName,
        attributes: &TopicAttributes,
        options: &RequestOptions,
    ) -> Result<Response<Empty>, QnsError> {
        attributes.validate()?;
        let request = HttpRequest::new(HttpMethod::Put, self.path(&format!("/topic/{}", topic)))
            .with_body(to_json(attributes)?);

        self.send_request("create_topic", request, options).await
    }

    /// Delete a topic.
    ///
    /// Subscriptions bound to the topic survive; their topic becomes empty.
    pub async fn delete_topic(
        &self,
        topic: &TopicName,
        options: &RequestOptions,
    ) -> Result<Response<Empty>, QnsError> {
        let request =
            HttpRequest::new(HttpMethod::Delete, self.path(&format!("/topic/{}", topic)));

        self.send_request("delete_topic", request, options).await
    }

    /// List the account's topics.
    pub async fn list_topics(&self, options: &RequestOptions) -> Result<Response<TopicList>, QnsError> {
        let request = HttpRequest::new(HttpMethod::Get, self.path("/topic"));

        self.send_request("list_topics", request, options).await
    }

    /// List the subscriptions bound to a topic.
    pub async fn list_topic_subscriptions(
        &self,
        topic: &TopicName,
        options: &RequestOptions,
    ) -> Result<Response<SubscriptionList>, QnsError> {
        let request = HttpRequest::new(
            HttpMethod::Get,
            self.path(&format!("/topic/{}/subscription", topic)),
        );

        self.send_request("list_topic_subscriptions", request, options)
            .await
    }

    /// Get a topic's current attributes.
    pub async fn get_topic_attributes(
        &self,
        topic: &TopicName,
        options: &RequestOptions,
    ) -> Result<Response<Topic>, QnsError> {
        let request = HttpRequest::new(HttpMethod::Get, self.path(&format!("/topic/{}", topic)));

        self.send_request("get_topic_attributes", request, options)
            .await
    }

    /// Update an existing topic.
    ///
    /// Sent with `If-Match: *`, so the update overwrites unconditionally. Only
    /// the set, non-zero attributes change.
    pub async fn set_topic_attributes(
        &self,
        topic: &TopicName,
        attributes: &TopicAttributes,
        options: &RequestOptions,
    ) -> Result<Response<Empty>, QnsError> {
        attributes.validate()?;
        let request = HttpRequest::new(HttpMethod::Put, self.path(&format!("/topic/{}", topic)))
            .with_header("If-Match", "*")
            .with_body(to_json(attributes)?);

        self.send_request("set_topic_attributes", request, options)
            .await
    }

    /// Publish a single message to a topic.
    ///
    /// The request body always carries exactly one message entry.
    ///
    /// # Errors
    ///
    /// Returns `QnsError::Validation` if the body is empty or larger than
    /// 256 KiB; no request is sent in that case.
    pub async fn send_message(
        &self,
        topic: &TopicName,
        message: OutgoingMessage,
        options: &RequestOptions,
    ) -> Result<Response<SendMessageResult>, QnsError> {
        self.send_messages(topic, std::slice::from_ref(&message), options)
            .await
    }

    /// Publish a batch of up to 1000 messages to a topic in one call.
    pub async fn send_messages(
        &self,
        topic: &TopicName,
        messages: &[OutgoingMessage],
        options: &RequestOptions,
    ) -> Result<Response<SendMessageResult>, QnsError> {
        validate_batch(messages)?;
        let body = SendMessagesBody { messages };
        let request = HttpRequest::new(
            HttpMethod::Post,
            self.path(&format!("/topic/{}/message", topic)),
        )
        .with_body(to_json(&body)?);

        self.send_request("send_message", request, options).await
    }

    // ========================================================================
    // Subscription Operations
    // ========================================================================

    /// Create a subscription bound to `topic`.
    ///
    /// Without a push config (or with an empty push endpoint) the subscription
    /// is pull-only.
    pub async fn create_subscription(
        &self,
        subscription: &SubscriptionName,
        topic: &TopicName,
        attributes: &SubscriptionAttributes,
        options: &RequestOptions,
    ) -> Result<Response<Empty>, QnsError> {
        attributes.validate()?;
        let body = CreateSubscriptionBody {
            topic: topic.as_str(),
            attributes,
        };
        let request = HttpRequest::new(
            HttpMethod::Put,
            self.path(&format!("/subscription/{}", subscription)),
        )
        .with_body(to_json(&body)?);

        self.send_request("create_subscription", request, options)
            .await
    }

    /// Delete a subscription.
    pub async fn delete_subscription(
        &self,
        subscription: &SubscriptionName,
        options: &RequestOptions,
    ) -> Result<Response<Empty>, QnsError> {
        let request = HttpRequest::new(
            HttpMethod::Delete,
            self.path(&format!("/subscription/{}", subscription)),
        );

        self.send_request("delete_subscription", request, options)
            .await
    }

    /// List the account's subscriptions.
    pub async fn list_subscriptions(
        &self,
        options: &RequestOptions,
    ) -> Result<Response<SubscriptionList>, QnsError> {
        let request = HttpRequest::new(HttpMethod::Get, self.path("/subscription"));

        self.send_request("list_subscriptions", request, options)
            .await
    }

    /// Get a subscription's current attributes.
    pub async fn get_subscription_attributes(
        &self,
        subscription: &SubscriptionName,
        options: &RequestOptions,
    ) -> Result<Response<Subscription>, QnsError> {
        let request = HttpRequest::new(
            HttpMethod::Get,
            self.path(&format!("/subscription/{}", subscription)),
        );

        self.send_request("get_subscription_attributes", request, options)
            .await
    }

    /// Update an existing subscription, unconditionally (`If-Match: *`).
    pub async fn set_subscription_attributes(
        &self,
        subscription: &SubscriptionName,
        attributes: &SubscriptionAttributes,
        options: &RequestOptions,
    ) -> Result<Response<Empty>, QnsError> {
        attributes.validate()?;
        let request = HttpRequest::new(
            HttpMethod::Put,
            self.path(&format!("/subscription/{}", subscription)),
        )
        .with_header("If-Match", "*")
        .with_body(to_json(attributes)?);

        self.send_request("set_subscription_attributes", request, options)
            .await
    }

    // ========================================================================
    // Message Operations
    // ========================================================================

    /// Receive messages from a subscription.
    ///
    /// Received messages turn invisible until their next visible time unless
    /// `peek` is set. With `wait_in_seconds` the service holds the request
    /// open up to that long when no message is available; the transport
    /// timeout is extended by the same amount. Too many received but
    /// undeleted messages make the service answer `OverLimit`.
    pub async fn receive_message(
        &self,
        subscription: &SubscriptionName,
        receive: &ReceiveOptions,
        options: &RequestOptions,
    ) -> Result<Response<ReceiveMessageResult>, QnsError> {
        let query = QueryParams::new()
            .number("waitInSeconds", receive.wait_in_seconds)
            .number("maxMessages", receive.max_messages)
            .flag("peek", receive.peek)
            .into_inner();

        let mut request = HttpRequest::new(
            HttpMethod::Get,
            self.path(&format!("/subscription/{}/message", subscription)),
        )
        .with_query(query);

        if let Some(wait) = receive.wait_in_seconds.filter(|w| *w > 0) {
            request = request.with_server_wait(Duration::from_secs(u64::from(wait)));
        }

        self.send_request("receive_message", request, options).await
    }

    /// Delete a received message.
    ///
    /// Succeeds only before the delivery's next visible time. Once the message
    /// is visible again the handle is invalid and the service rejects the call.
    pub async fn delete_message(
        &self,
        subscription: &SubscriptionName,
        receipt_handle: &ReceiptHandle,
        options: &RequestOptions,
    ) -> Result<Response<Empty>, QnsError> {
        let query = QueryParams::new()
            .text("receiptHandle", receipt_handle.as_str())
            .into_inner();
        let request = HttpRequest::new(
            HttpMethod::Delete,
            self.path(&format!("/subscription/{}/message", subscription)),
        )
        .with_query(query);

        self.send_request("delete_message", request, options).await
    }

    /// Change when an invisible message becomes visible again.
    ///
    /// On success the old receipt handle is invalidated and the result
    /// carries its replacement.
    pub async fn change_message_visibility(
        &self,
        subscription: &SubscriptionName,
        receipt_handle: &ReceiptHandle,
        visibility_timeout_in_seconds: u32,
        options: &RequestOptions,
    ) -> Result<Response<ChangeVisibilityResult>, QnsError> {
        let query = QueryParams::new()
            .text("receiptHandle", receipt_handle.as_str())
            .number(
                "visibilityTimeoutInSeconds",
                Some(visibility_timeout_in_seconds),
            )
            .into_inner();
        let request = HttpRequest::new(
            HttpMethod::Put,
            self.path(&format!("/subscription/{}/message", subscription)),
        )
        .with_query(query);

        self.send_request("change_message_visibility", request, options)
            .await
    }

    // ========================================================================
    // Request Plumbing
    // ========================================================================

    fn path(&self, resource: &str) -> String {
        format!("{}{}", self.path_prefix, resource)
    }

    async fn send_request<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        mut request: HttpRequest,
        options: &RequestOptions,
    ) -> Result<Response<T>, QnsError> {
        let config = self.config.merged(&options.overrides);
        if !options.overrides.is_empty() {
            config.validate()?;
        }

        if request.body.is_some() && request.header("content-type").is_none() {
            request
                .headers
                .insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
        }

        let method = request.method;
        let path = request.path.clone();

        debug!(
            operation,
            method = %method,
            path = %path,
            endpoint = %config.endpoint,
            "Sending QNS request"
        );

        let response = self
            .transport
            .send(&config, request, self.signer.as_ref())
            .await
            .inspect_err(|e| {
                if matches!(e, QnsError::Transport(_)) {
                    warn!(operation, method = %method, path = %path, error = %e, "QNS transport failure");
                }
            })?;

        let metadata = Metadata::from_headers(response.headers);

        debug!(
            operation,
            status = response.status,
            request_id = ?metadata.request_id(),
            "Received QNS response"
        );

        if !(200..300).contains(&response.status) {
            let error = decode_service_error(response.status, &response.body, &metadata);
            warn!(
                operation,
                method = %method,
                path = %path,
                status = response.status,
                code = ?error.service_code(),
                request_id = ?metadata.request_id(),
                "QNS service returned an error"
            );
            return Err(error);
        }

        let payload = decode_body(&response.body)?;
        Ok(Response::new(payload, metadata))
    }
}

impl std::fmt::Debug for QnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QnsClient")
            .field("config", &self.config)
            .field("path_prefix", &self.path_prefix)
            .field("transport", &"<Transport>")
            .field("signer", &"<Signer>")
            .finish()
    }
}

fn to_json(value: &impl Serialize) -> Result<String, QnsError> {
    Ok(serde_json::to_string(value)?)
}

/// Builder for constructing `QnsClient` instances.
pub struct QnsClientBuilder {
    config: ClientConfig,
    signer: Arc<dyn Signer>,
    transport: Option<Arc<dyn Transport>>,
}

impl QnsClientBuilder {
    fn new(config: ClientConfig, signer: Arc<dyn Signer>) -> Self {
        Self {
            config,
            signer,
            transport: None,
        }
    }

    /// Set the transport.
    ///
    /// If not set, a [`ReqwestTransport`] is created.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_trait::async_trait;
    /// use qns_client::{
    ///     ClientConfig, Credentials, HttpRequest, HttpResponse, QnsClient, QnsError,
    ///     RequestOptions, Signer, SigningError, SigningRequest, Transport,
    /// };
    /// use std::collections::HashMap;
    ///
    /// struct Unsigned;
    ///
    /// impl Signer for Unsigned {
    ///     fn sign(
    ///         &self,
    ///         _request: &SigningRequest<'_>,
    ///         _credentials: &Credentials,
    ///     ) -> Result<HashMap<String, String>, SigningError> {
    ///         Ok(HashMap::new())
    ///     }
    /// }
    ///
    /// struct Canned;
    ///
    /// #[async_trait]
    /// impl Transport for Canned {
    ///     async fn send(
    ///         &self,
    ///         _config: &ClientConfig,
    ///         _request: HttpRequest,
    ///         _signer: &dyn Signer,
    ///     ) -> Result<HttpResponse, QnsError> {
    ///         Ok(HttpResponse::new(200, r#"{"topics":[{"name":"orders"}]}"#))
    ///     }
    /// }
    ///
    /// # tokio_test::block_on(async {
    /// let client = QnsClient::builder(ClientConfig::new("acct", "qns.example.com"), Unsigned)
    ///     .transport(Canned)
    ///     .build()
    ///     .unwrap();
    ///
    /// let topics = client.list_topics(&RequestOptions::default()).await.unwrap();
    /// assert_eq!(topics.topics[0].name, "orders");
    /// # });
    /// ```
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Use an already shared transport.
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the QNS client.
    ///
    /// # Errors
    ///
    /// Returns `QnsError::Configuration` if the configuration is invalid, or
    /// `QnsError::Transport` if the default HTTP client cannot be created.
    pub fn build(self) -> Result<QnsClient, QnsError> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?) as Arc<dyn Transport>,
        };

        let path_prefix = self.config.path_prefix();

        Ok(QnsClient {
            config: Arc::new(self.config),
            transport,
            signer: self.signer,
            path_prefix,
        })
    }
}

impl std::fmt::Debug for QnsClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QnsClientBuilder")
            .field("config", &self.config)
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}
