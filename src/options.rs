//! Construction parameters for a [`crate::Client`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::snapshot::Snapshot;
use crate::transport::fetch::FetchClient;
use crate::value::{Context, Value};

/// Names that must be present in the Store before the client transitions to `ready`.
/// If given as a mapping, presence is checked by key only — the mapped value is
/// ignored by the gating check itself (it exists for caller ergonomics, e.g. pairing a
/// name with a human-readable reason).
#[derive(Debug, Clone, Default)]
pub enum Required {
    #[default]
    None,
    Names(Vec<String>),
    Mapping(HashMap<String, String>),
}

impl Required {
    pub(crate) fn names(&self) -> Vec<String> {
        match self {
            Required::None => Vec::new(),
            Required::Names(names) => names.clone(),
            Required::Mapping(map) => map.keys().cloned().collect(),
        }
    }
}

/// A diagnostic sink. The crate logs through `tracing` regardless; this is an
/// additional hook for callers who want structured access to the same events without
/// installing a `tracing` subscriber.
pub type Logger = Arc<dyn Fn(&str) + Send + Sync>;

/// Construction parameters for [`crate::Client::build`] and [`crate::Client::restore`].
pub struct ClientOptions {
    pub base_url: String,
    pub sdk_key: String,
    pub context: Context,
    pub defaults: HashMap<String, Value>,
    pub required: Required,
    pub request_timeout: Duration,
    pub initialization_timeout: Duration,
    pub retry_delay: Duration,
    pub inactivity_timeout: Duration,
    pub agent: String,
    pub logger: Option<Logger>,
    pub fetch_client: Option<Arc<dyn FetchClient>>,
    /// When set, restoration uses this snapshot instead of issuing an initial load.
    pub snapshot: Option<Snapshot>,
    /// Whether to start the live channel. Always `true` for [`crate::Client::build`];
    /// for [`crate::Client::restore`] this controls whether the restored view also
    /// stays live, or is a frozen read-only view.
    pub start_live_channel: bool,
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>, sdk_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            sdk_key: sdk_key.into(),
            context: Context::new(),
            defaults: HashMap::new(),
            required: Required::None,
            request_timeout: Duration::from_secs(2),
            initialization_timeout: Duration::from_secs(5),
            retry_delay: Duration::from_millis(200),
            inactivity_timeout: Duration::from_secs(30),
            agent: format!("dynconf-rust/{}", env!("CARGO_PKG_VERSION")),
            logger: None,
            fetch_client: None,
            snapshot: None,
            start_live_channel: true,
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn with_required(mut self, required: Required) -> Self {
        self.required = required;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_initialization_timeout(mut self, timeout: Duration) -> Self {
        self.initialization_timeout = timeout;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }

    pub fn with_fetch_client(mut self, client: Arc<dyn FetchClient>) -> Self {
        self.fetch_client = Some(client);
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn without_live_channel(mut self) -> Self {
        self.start_live_channel = false;
        self
    }

    pub(crate) fn log(&self, message: &str) {
        tracing::debug!("{message}");
        if let Some(logger) = &self.logger {
            logger(message);
        }
    }
}
