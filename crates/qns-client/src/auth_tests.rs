//! Tests for credentials and the signer contract.

use super::*;
use std::sync::Arc;

struct StaticSigner;

impl Signer for StaticSigner {
    fn sign(
        &self,
        request: &SigningRequest<'_>,
        credentials: &Credentials,
    ) -> Result<HashMap<String, String>, SigningError> {
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!(
                "test/{}/{} {}",
                credentials.access_key_id(),
                request.method,
                request.path
            ),
        );
        Ok(headers)
    }
}

#[test]
fn test_credentials_debug_redacts_secret() {
    let credentials = Credentials::new("AK123", "very-secret");

    let rendered = format!("{:?}", credentials);

    assert!(rendered.contains("AK123"));
    assert!(!rendered.contains("very-secret"));
    assert!(rendered.contains("<REDACTED>"));
}

#[test]
fn test_credentials_blank_detection() {
    assert!(Credentials::new("", "secret").is_empty());
    assert!(Credentials::new("ak", "   ").is_empty());
    assert!(!Credentials::new("ak", "sk").is_empty());
}

#[test]
fn test_arc_signer_delegates() {
    let signer: Arc<dyn Signer> = Arc::new(StaticSigner);
    let headers = BTreeMap::new();
    let query = BTreeMap::new();
    let request = SigningRequest {
        method: HttpMethod::Get,
        host: "qns.example.com",
        path: "/v1/acct/topic",
        headers: &headers,
        query: &query,
        body: None,
        timestamp: Utc::now(),
    };

    let signed = signer
        .sign(&request, &Credentials::new("AK", "SK"))
        .expect("signing should succeed");

    assert_eq!(
        signed.get("Authorization").map(String::as_str),
        Some("test/AK/GET /v1/acct/topic")
    );
}
