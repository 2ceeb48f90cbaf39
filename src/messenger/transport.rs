//! HTTP transport used by [`super::client::MessengerClient`].
//!
//! The client only needs "GET a url" and "POST a json body to a url"; keeping
//! that behind a trait lets tests swap reqwest for a mock.

use super::errors::ClientError;
use async_trait::async_trait;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// Raw HTTP response: status code and the full body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl GraphResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    async fn read(response: reqwest::Response) -> Result<Self, ClientError> {
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(ClientError::Transport)?;

        Ok(Self {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait GraphTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<GraphResponse, ClientError>;

    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<GraphResponse, ClientError>;
}

pub type ImplGraphTransport = Box<dyn GraphTransport>;

/// [`GraphTransport`] backed by a pooled `reqwest::Client`
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GraphTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<GraphResponse, ClientError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        GraphResponse::read(response).await
    }

    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<GraphResponse, ClientError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        GraphResponse::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ntex::test]
    async fn test_connection_refused_is_a_transport_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();

        let err = transport
            .post_json("http://127.0.0.1:1/me/messages", b"{}".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Transport(ref e) if e.is_connect()), "{err:?}");
    }

    #[test]
    fn test_only_200_is_ok() {
        let response = |status| GraphResponse {
            status,
            body: Vec::new(),
        };

        assert!(response(200).is_ok());
        assert!(!response(201).is_ok());
        assert!(!response(400).is_ok());
    }
}
