//! The live channel: a long-lived, server-push stream of delivery records, with
//! reconnection, an inactivity watchdog, and at-least-once convergence on reconnect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use url::Url;

use crate::error::TransportError;
use crate::registry::Registry;
use crate::retry::RetryPolicy;
use crate::store::Store;
use crate::transport::fetch::FetchClient;
use crate::transport::initial;
use crate::transport::wire::ConfigsEnvelope;

pub struct LiveChannel {
    cancel: Arc<AtomicBool>,
    handle: tokio::task::JoinHandle<()>,
}

#[allow(clippy::too_many_arguments)]
impl LiveChannel {
    pub fn spawn(
        store: Arc<Store>,
        registry: Arc<Registry>,
        fetch: Arc<dyn FetchClient>,
        base_url: Url,
        sdk_key: String,
        user_agent: String,
        retry_policy: RetryPolicy,
        inactivity_timeout: Duration,
    ) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let task_cancel = Arc::clone(&cancel);

        let handle = tokio::spawn(async move {
            run(
                store,
                registry,
                fetch,
                base_url,
                sdk_key,
                user_agent,
                retry_policy,
                inactivity_timeout,
                task_cancel,
            )
            .await;
        });

        Self { cancel, handle }
    }

    /// Aborts the in-flight request and the live channel atomically. No further
    /// upserts are applied after this returns.
    pub async fn close(self) {
        self.cancel.store(true, Ordering::Release);
        self.handle.abort();
        let _ = self.handle.await;
    }
}

#[allow(clippy::too_many_arguments)]
async fn run(
    store: Arc<Store>,
    registry: Arc<Registry>,
    fetch: Arc<dyn FetchClient>,
    base_url: Url,
    sdk_key: String,
    user_agent: String,
    retry_policy: RetryPolicy,
    inactivity_timeout: Duration,
    cancel: Arc<AtomicBool>,
) {
    let mut first_connection = true;

    loop {
        if cancel.load(Ordering::Acquire) {
            return;
        }

        if !first_connection {
            match initial::load_initial(
                &fetch,
                &base_url,
                &sdk_key,
                &user_agent,
                Duration::from_secs(5),
            )
            .await
            {
                Ok(entries) => {
                    let changed = store.upsert_many(entries);
                    registry.notify(&changed);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "resync before live channel reconnect failed");
                }
            }
        }
        first_connection = false;

        if cancel.load(Ordering::Acquire) {
            return;
        }

        match consume_until_idle_or_broken(
            &store,
            &registry,
            &fetch,
            &base_url,
            &sdk_key,
            &user_agent,
            inactivity_timeout,
            &cancel,
        )
        .await
        {
            Ok(()) => tracing::debug!("live channel closed by server, reconnecting"),
            Err(err) => tracing::warn!(error = %err, "live channel error, reconnecting"),
        }

        if cancel.load(Ordering::Acquire) {
            return;
        }
        retry_policy.wait().await;
    }
}

#[allow(clippy::too_many_arguments)]
async fn consume_until_idle_or_broken(
    store: &Arc<Store>,
    registry: &Arc<Registry>,
    fetch: &Arc<dyn FetchClient>,
    base_url: &Url,
    sdk_key: &str,
    user_agent: &str,
    inactivity_timeout: Duration,
    cancel: &Arc<AtomicBool>,
) -> Result<(), TransportError> {
    let url = base_url.join("live").map_err(|_| {
        TransportError::InvalidUrl(format!("base-url cannot be joined with 'live': {base_url}"))
    })?;

    let mut stream = fetch.stream(url, sdk_key, user_agent).await?;
    let mut buffer = Vec::new();

    loop {
        if cancel.load(Ordering::Acquire) {
            return Ok(());
        }

        let next = tokio::time::timeout(inactivity_timeout, stream.next()).await;
        let chunk = match next {
            Ok(Some(chunk)) => chunk?,
            Ok(None) => return Ok(()),
            Err(_) => return Err(TransportError::Inactivity),
        };

        buffer.extend_from_slice(&chunk);
        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            let line = &line[..line.len() - 1];
            if line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }
            let envelope: ConfigsEnvelope = serde_json::from_slice(line)?;
            let changed = store.upsert_many(envelope.configs);
            registry.notify(&changed);
        }
    }
}

