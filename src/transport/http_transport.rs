// src/transport/http_transport.rs
//! HTTP transport for the credential endpoint.
//!
//! The client hands the transport an already serialized body and gets back a
//! [`TransportOutcome`] that separates three cases:
//! - the server answered with a success status
//! - the server answered with any other status (body and `Location` kept raw)
//! - the request never completed (connect error, timeout, broken body)
//!
//! Interpreting those cases is left to the client.

use crate::error::Result;
use crate::settings::Settings;
use crate::utils::serialization::CONTENT_TYPE_JSON;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Request style used against the credential endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    /// Create-style request (POST)
    Post,
    /// Replace-style request (PUT)
    Put,
}

/// What the transport observed for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    /// 2xx response
    Success { body: String },
    /// Any non-2xx response
    Status {
        status: StatusCode,
        body: String,
        location: Option<String>,
    },
    /// The request could not be completed; carries the transport's reason
    ConnectionFailed(String),
}

/// Sends serialized credential records to the authorization server.
#[async_trait]
pub trait CredentialTransport: Send + Sync {
    async fn send(&self, method: RequestMethod, endpoint: &Url, body: String) -> TransportOutcome;
}

/// `reqwest`-backed transport.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport with the given timeout and user agent.
    ///
    /// # Errors
    /// Returns `ClientError::Http` if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Builds a transport from client settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.request_timeout(), &settings.user_agent)
    }

    /// Wraps an existing `reqwest::Client`.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CredentialTransport for ReqwestTransport {
    async fn send(&self, method: RequestMethod, endpoint: &Url, body: String) -> TransportOutcome {
        let request = match method {
            RequestMethod::Post => self.client.post(endpoint.clone()),
            RequestMethod::Put => self.client.put(endpoint.clone()),
        };

        let response = match request
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return TransportOutcome::ConnectionFailed(e.to_string()),
        };

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return TransportOutcome::ConnectionFailed(e.to_string()),
        };

        if status.is_success() {
            TransportOutcome::Success { body }
        } else {
            TransportOutcome::Status {
                status,
                body,
                location,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{mock, Matcher};

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(Duration::from_secs(5), "transport-tests").unwrap()
    }

    fn endpoint(path: &str) -> Url {
        Url::parse(&format!("{}{}", mockito::server_url(), path)).unwrap()
    }

    #[tokio::test]
    async fn test_post_success() {
        let mock = mock("POST", "/transport-post/api/Credential")
            .match_header("content-type", "application/json")
            .match_body(Matcher::JsonString(r#"{"ok":true}"#.to_string()))
            .with_status(201)
            .with_body("created")
            .create();

        let outcome = transport()
            .send(
                RequestMethod::Post,
                &endpoint("/transport-post/api/Credential"),
                r#"{"ok":true}"#.to_string(),
            )
            .await;

        mock.assert();
        assert_eq!(
            outcome,
            TransportOutcome::Success {
                body: "created".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_put_uses_put_method() {
        let mock = mock("PUT", "/transport-put/api/Credential")
            .with_status(204)
            .create();

        let outcome = transport()
            .send(
                RequestMethod::Put,
                &endpoint("/transport-put/api/Credential"),
                "{}".to_string(),
            )
            .await;

        mock.assert();
        assert!(matches!(outcome, TransportOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn test_non_success_keeps_status_body_and_location() {
        let _mock = mock("POST", "/transport-conflict/api/Credential")
            .with_status(409)
            .with_header("location", "https://example.test/credential/abc")
            .with_body("duplicate")
            .create();

        let outcome = transport()
            .send(
                RequestMethod::Post,
                &endpoint("/transport-conflict/api/Credential"),
                "{}".to_string(),
            )
            .await;

        assert_eq!(
            outcome,
            TransportOutcome::Status {
                status: StatusCode::CONFLICT,
                body: "duplicate".to_string(),
                location: Some("https://example.test/credential/abc".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_without_location() {
        let _mock = mock("POST", "/transport-error/api/Credential")
            .with_status(500)
            .with_body("boom")
            .create();

        let outcome = transport()
            .send(
                RequestMethod::Post,
                &endpoint("/transport-error/api/Credential"),
                "{}".to_string(),
            )
            .await;

        assert_eq!(
            outcome,
            TransportOutcome::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
                location: None,
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_failure() {
        let unreachable = Url::parse("http://127.0.0.1:1/api/Credential").unwrap();

        let outcome = transport()
            .send(RequestMethod::Post, &unreachable, "{}".to_string())
            .await;

        match outcome {
            TransportOutcome::ConnectionFailed(reason) => assert!(!reason.is_empty()),
            other => panic!("expected connection failure, got {:?}", other),
        }
    }
}
