//! HTTP injection point. Production code talks to a real server through
//! [`HttpFetchClient`]; tests inject a fake (or a `wiremock::MockServer`) through the
//! same trait so the Transport never needs to know the difference.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use url::Url;

use crate::error::TransportError;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

#[async_trait]
pub trait FetchClient: Send + Sync {
    /// A single bounded request, used for the initial load and the testing-sync hook.
    async fn get(
        &self,
        url: Url,
        bearer_token: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Bytes, TransportError>;

    /// Opens the long-lived live channel as a byte stream.
    async fn stream(
        &self,
        url: Url,
        bearer_token: &str,
        user_agent: &str,
    ) -> Result<ByteStream, TransportError>;
}

/// Production [`FetchClient`] backed by `reqwest`.
pub struct HttpFetchClient {
    client: reqwest::Client,
}

impl HttpFetchClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchClient for HttpFetchClient {
    async fn get(
        &self,
        url: Url,
        bearer_token: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(bearer_token)
            .header(reqwest::header::USER_AGENT, user_agent)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?)
    }

    async fn stream(
        &self,
        url: Url,
        bearer_token: &str,
        user_agent: &str,
    ) -> Result<ByteStream, TransportError> {
        use futures_util::StreamExt;

        let response = self
            .client
            .get(url)
            .bearer_auth(bearer_token)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(TransportError::from));
        Ok(Box::pin(stream))
    }
}
