//! Client lifecycle: states, ordered composition of Store, Evaluator, Transport, and
//! Subscription Registry, plus the public contract (`get`, `subscribe`, `get_snapshot`,
//! `close`).

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;

use crate::error::{Error, Result};
use crate::evaluator::evaluate;
use crate::options::ClientOptions;
use crate::registry::{GlobalListener, Listener, Registry, Unsubscribe};
use crate::snapshot::Snapshot;
use crate::store::Store;
use crate::transport::fetch::HttpFetchClient;
use crate::transport::{initial, LiveChannel};
use crate::value::{Context, Value};

/// The client's lifecycle state. `Closed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Initializing,
    Ready,
    Closed,
    Failed,
}

impl ClientState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ClientState::Initializing,
            1 => ClientState::Ready,
            2 => ClientState::Closed,
            _ => ClientState::Failed,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            ClientState::Initializing => 0,
            ClientState::Ready => 1,
            ClientState::Closed => 2,
            ClientState::Failed => 3,
        }
    }
}

/// Per-call overrides to [`Client::get`].
#[derive(Default)]
pub struct GetOptions {
    pub context: Option<Context>,
    pub default: Option<Value>,
}

impl GetOptions {
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

pub struct Client {
    store: Arc<Store>,
    registry: Arc<Registry>,
    state: AtomicU8,
    options: ClientOptions,
    live_channel: Mutex<Option<LiveChannel>>,
}

impl Client {
    /// Opens the transport, loads the initial config set, validates the required set,
    /// transitions to `ready`, and starts the live channel — all raced against
    /// `initialization_timeout`.
    pub async fn build(options: ClientOptions) -> Result<Client> {
        let timeout = options.initialization_timeout;
        match tokio::time::timeout(timeout, Self::build_inner(options)).await {
            Ok(result) => result,
            Err(_) => Err(Error::InitializationTimeout),
        }
    }

    async fn build_inner(options: ClientOptions) -> Result<Client> {
        let store = Arc::new(Store::new());
        let registry = Arc::new(Registry::new());

        let base_url = normalize_base_url(&options.base_url)?;

        let fetch = options
            .fetch_client
            .clone()
            .unwrap_or_else(|| Arc::new(HttpFetchClient::new()) as _);

        options.log("opening transport for initial load");
        let entries = initial::load_initial(
            &fetch,
            &base_url,
            &options.sdk_key,
            &options.agent,
            options.request_timeout,
        )
        .await?;

        store.upsert_many(entries);

        let required_names = options.required.names();
        let present = store.names();
        let missing: Vec<String> = required_names
            .into_iter()
            .filter(|name| !present.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingRequired { names: missing });
        }

        let live_channel = if options.start_live_channel {
            options.log("initial load complete, starting live channel");
            Some(LiveChannel::spawn(
                Arc::clone(&store),
                Arc::clone(&registry),
                fetch,
                base_url,
                options.sdk_key.clone(),
                options.agent.clone(),
                crate::retry::RetryPolicy::new(options.retry_delay),
                options.inactivity_timeout,
            ))
        } else {
            None
        };

        Ok(Client {
            store,
            registry,
            state: AtomicU8::new(ClientState::Ready.to_u8()),
            options,
            live_channel: Mutex::new(live_channel),
        })
    }

    /// Constructs a client from a [`Snapshot`] synchronously: the Store is populated
    /// immediately, the client is `ready` on return, and no initial load request is
    /// issued. If `options.start_live_channel` is true and a non-empty base-url is
    /// supplied, the live channel is also started; otherwise the client is a read-only
    /// frozen view — `get` works, subscriptions never fire.
    ///
    /// Must be called from within a Tokio runtime if `start_live_channel` is true,
    /// since starting the live channel spawns a task on the ambient runtime.
    pub fn restore(snapshot: Snapshot, options: ClientOptions) -> Client {
        let store = Arc::new(Store::new());
        let registry = Arc::new(Registry::new());
        store.upsert_many(snapshot.configs);

        let live_channel = if options.start_live_channel && !options.base_url.is_empty() {
            match normalize_base_url(&options.base_url) {
                Ok(base_url) => {
                    let fetch = options
                        .fetch_client
                        .clone()
                        .unwrap_or_else(|| Arc::new(HttpFetchClient::new()) as _);
                    Some(LiveChannel::spawn(
                        Arc::clone(&store),
                        Arc::clone(&registry),
                        fetch,
                        base_url,
                        options.sdk_key.clone(),
                        options.agent.clone(),
                        crate::retry::RetryPolicy::new(options.retry_delay),
                        options.inactivity_timeout,
                    ))
                }
                Err(_) => None,
            }
        } else {
            None
        };

        let mut options = options;
        if options.context.is_empty() {
            options.context = snapshot.context.unwrap_or_default();
        }

        Client {
            store,
            registry,
            state: AtomicU8::new(ClientState::Ready.to_u8()),
            options,
            live_channel: Mutex::new(live_channel),
        }
    }

    pub fn state(&self) -> ClientState {
        ClientState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Evaluates `name` against the client's context merged with `opts.context` (the
    /// latter wins on key conflicts). If the entry is absent, returns `opts.default` if
    /// supplied, else the client-level default for `name`, else [`Error::NotFound`].
    ///
    /// Works the same whether the client is `ready` or `closed`: the Store remains
    /// readable after `close` (a best-effort stale read), it simply stops changing.
    pub fn get(&self, name: &str, opts: GetOptions) -> Result<Value> {
        match self.store.read(name) {
            Some(entry) => {
                let context = self.options.context.merged_with(opts.context.as_ref());
                Ok(evaluate(&entry, &context))
            }
            None => opts
                .default
                .or_else(|| self.options.defaults.get(name).cloned())
                .ok_or_else(|| Error::NotFound { name: name.to_string() }),
        }
    }

    /// Registers a listener invoked whenever `get(name)` would return a different
    /// value. Never invoked after the returned handle is called, or after `close`.
    pub fn subscribe(&self, name: &str, listener: Listener) -> Unsubscribe {
        if self.state() == ClientState::Closed {
            return Unsubscribe::noop();
        }
        self.registry.subscribe(name, listener)
    }

    /// Registers a listener invoked once per delivery that changes any config.
    pub fn subscribe_all(&self, listener: GlobalListener) -> Unsubscribe {
        if self.state() == ClientState::Closed {
            return Unsubscribe::noop();
        }
        self.registry.subscribe_all(listener)
    }

    /// Freezes the current Store contents and bound context into a [`Snapshot`].
    pub fn get_snapshot(&self) -> Snapshot {
        Snapshot::new(self.store.snapshot_entries(), Some(self.options.context.clone()))
    }

    /// Releases the live channel, unregisters all listeners, and transitions to
    /// `closed`. Idempotent: calling it more than once has the same effect as once.
    pub async fn close(&self) {
        let previous = self.state.swap(ClientState::Closed.to_u8(), Ordering::AcqRel);
        if ClientState::from_u8(previous) == ClientState::Closed {
            return;
        }

        self.registry.shutdown();
        let channel = self.live_channel.lock().take();
        if let Some(channel) = channel {
            channel.close().await;
        }
    }
}

/// Normalizes a base URL so `Url::join` appends rather than replaces the last path
/// segment (per `url`'s join semantics, the base must end in `/`). Rejects any URL
/// `Url::join` cannot append onto (a "cannot-be-a-base" URL, e.g. `mailto:foo@bar` or
/// `data:text/plain,x`) up front, so `transport::initial`/`transport::stream` can treat
/// `.join("config"|"live")` on an already-normalized base as infallible.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|_| Error::NetworkError {
        message: format!("invalid base-url: {raw}"),
        source: None,
    })?;

    if url.cannot_be_a_base() {
        return Err(Error::NetworkError {
            message: format!("base-url cannot be a base for relative paths: {raw}"),
            source: None,
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
