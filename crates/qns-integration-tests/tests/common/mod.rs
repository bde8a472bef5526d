//! Common test utilities for qns-client integration tests
//!
//! This module provides:
//! - A deterministic signer that records what it was asked to sign
//! - Helpers for building clients against a wiremock server

use qns_client::{
    ClientConfig, Credentials, QnsClient, Signer, SigningError, SigningRequest, SubscriptionName,
    TopicName,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

pub const TEST_ACCOUNT: &str = "acct";
#[allow(dead_code)]
pub const TEST_AUTHORIZATION: &str = "qns-test-auth/AK";

// ============================================================================
// Test Signer
// ============================================================================

/// Signer producing a fixed Authorization header and recording signed paths
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct TestSigner {
    signed: Arc<Mutex<Vec<(String, String)>>>,
}

impl TestSigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// (method, path) pairs in signing order
    #[allow(dead_code)]
    pub fn signed(&self) -> Vec<(String, String)> {
        self.signed.lock().unwrap().clone()
    }
}

impl Signer for TestSigner {
    fn sign(
        &self,
        request: &SigningRequest<'_>,
        credentials: &Credentials,
    ) -> Result<HashMap<String, String>, SigningError> {
        self.signed
            .lock()
            .unwrap()
            .push((request.method.to_string(), request.path.to_string()));

        Ok(HashMap::from([(
            "Authorization".to_string(),
            format!("qns-test-auth/{}", credentials.access_key_id()),
        )]))
    }
}

// ============================================================================
// Client Builders
// ============================================================================

/// Configuration pointing at the mock server
#[allow(dead_code)]
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(TEST_ACCOUNT, server.uri()).with_credentials(Credentials::new("AK", "SK"))
}

/// Client using the default reqwest transport against the mock server
#[allow(dead_code)]
pub fn create_client(server: &MockServer) -> QnsClient {
    create_client_with_signer(server, TestSigner::new())
}

#[allow(dead_code)]
pub fn create_client_with_signer(server: &MockServer, signer: TestSigner) -> QnsClient {
    QnsClient::builder(test_config(server), signer)
        .build()
        .expect("client should build")
}

#[allow(dead_code)]
pub fn topic(name: &str) -> TopicName {
    TopicName::new(name).unwrap()
}

#[allow(dead_code)]
pub fn subscription(name: &str) -> SubscriptionName {
    SubscriptionName::new(name).unwrap()
}
