//! A scriptable [`FetchClient`] double shared by the transport-level integration tests.
//! Lets a test hand the live channel a canned initial-load body and a sequence of
//! newline-delimited chunks for the stream, without touching a real socket.

use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dynconf::error::TransportError;
use dynconf::transport::fetch::{ByteStream, FetchClient};
use futures_util::stream;
use url::Url;

/// What a single `get()` call replays. Kept as a reconstructable description rather
/// than a stored `Result` since `TransportError` isn't `Clone` (it wraps `reqwest::Error`).
#[derive(Clone)]
enum GetResponse {
    Ok(String),
    Status(u16),
    NeverReturns,
}

pub struct ScriptedFetchClient {
    get_responses: Mutex<Vec<GetResponse>>,
    stream_chunks: Mutex<Option<Vec<&'static str>>>,
}

impl ScriptedFetchClient {
    pub fn new() -> Self {
        Self {
            get_responses: Mutex::new(Vec::new()),
            stream_chunks: Mutex::new(None),
        }
    }

    /// Queues a successful `GET /config` body. Each call to `get` pops the front of
    /// the queue; once exhausted the last response repeats.
    pub fn push_get_ok(&self, body: impl Into<String>) {
        self.get_responses.lock().unwrap().push(GetResponse::Ok(body.into()));
    }

    pub fn push_get_status(&self, status: u16) {
        self.get_responses.lock().unwrap().push(GetResponse::Status(status));
    }

    /// Queues a `get()` call that never resolves, to exercise `initialization_timeout`.
    pub fn push_get_hangs(&self) {
        self.get_responses.lock().unwrap().push(GetResponse::NeverReturns);
    }

    /// Sets the chunk sequence the next `stream()` call will replay, then ends (as if
    /// the server closed the connection), so the live channel's run loop reconnects.
    pub fn set_stream_chunks(&self, lines: Vec<&'static str>) {
        *self.stream_chunks.lock().unwrap() = Some(lines);
    }
}

impl Default for ScriptedFetchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchClient for ScriptedFetchClient {
    async fn get(
        &self,
        _url: Url,
        _bearer_token: &str,
        _user_agent: &str,
        _timeout: Duration,
    ) -> Result<Bytes, TransportError> {
        let next = {
            let mut responses = self.get_responses.lock().unwrap();
            match responses.len() {
                0 => None,
                1 => Some(responses[0].clone()),
                _ => Some(responses.remove(0)),
            }
        };

        match next.unwrap_or(GetResponse::Ok("{\"configs\":[]}".to_string())) {
            GetResponse::Ok(body) => Ok(Bytes::from(body)),
            GetResponse::Status(status) => Err(TransportError::Status(status)),
            GetResponse::NeverReturns => std::future::pending().await,
        }
    }

    async fn stream(
        &self,
        _url: Url,
        _bearer_token: &str,
        _user_agent: &str,
    ) -> Result<ByteStream, TransportError> {
        let lines = self.stream_chunks.lock().unwrap().take().unwrap_or_default();
        let chunks: Vec<Result<Bytes, TransportError>> = lines
            .into_iter()
            .map(|line| Ok(Bytes::from(format!("{line}\n"))))
            .collect();
        let s: Pin<Box<dyn futures_util::Stream<Item = Result<Bytes, TransportError>> + Send>> =
            Box::pin(stream::iter(chunks));
        Ok(s)
    }
}
