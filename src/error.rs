//! Error taxonomy for the client runtime.
//!
//! Initialization errors are terminal and reject the caller; steady-state transport
//! errors never reach here — they are absorbed by the live channel's reconnect loop.

use thiserror::Error;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The overall initialization budget was exceeded.
    #[error("client initialization did not complete within the configured timeout")]
    InitializationTimeout,

    /// The server returned a non-2xx response during initialization.
    #[error("initial load request failed with status {status}")]
    RequestFailed {
        status: u16,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// A transport-level failure (DNS, connect, TLS, body read, or a stalled
    /// connection) during initialization.
    #[error("network error during initialization: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Initialization succeeded but one or more required configs never appeared.
    #[error("missing required config(s): {names:?}")]
    MissingRequired { names: Vec<String> },

    /// `get` was asked for an absent entry with no default available.
    #[error("no config named '{name}' and no default was supplied")]
    NotFound { name: String },

    /// Authentication failed; carries the HTTP status for diagnosis.
    #[error("invalid SDK key (status {status})")]
    InvalidSdkKey { status: u16 },

    /// The client has already been closed.
    #[error("client is closed")]
    Closed,

    /// The response body could not be parsed as the expected wire shape.
    #[error("malformed response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Decode { source }
    }
}

impl Error {
    /// Maps a steady-state [`TransportError`] onto the initialization-time taxonomy.
    /// Used only while the initial load is in flight — once a client is `ready`,
    /// `TransportError`s are absorbed by the live channel's reconnect loop and never
    /// reach this conversion.
    pub fn from_transport(err: TransportError) -> Error {
        match err {
            TransportError::Network(source) => Error::NetworkError {
                message: source.to_string(),
                source: Some(source),
            },
            TransportError::Status(status @ (401 | 403)) => Error::InvalidSdkKey { status },
            TransportError::Status(status) => Error::RequestFailed { status, source: None },
            TransportError::Decode(source) => Error::Decode { source },
            TransportError::Inactivity => Error::NetworkError {
                message: "connection stalled before completing".to_string(),
                source: None,
            },
            TransportError::InvalidUrl(message) => Error::NetworkError { message, source: None },
        }
    }
}

/// Steady-state transport errors that the live channel reconnect loop absorbs. Kept
/// separate from [`Error`] because these never propagate to `get`/`subscribe` callers.
/// Public so a custom [`crate::transport::fetch::FetchClient`] implementation — a test
/// double, say — can name it.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("live channel was idle past the inactivity timeout")]
    Inactivity,

    #[error("malformed delivery: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidUrl(String),
}
