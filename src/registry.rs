//! Per-name and global subscription listeners. Dispatches on change, never re-invokes
//! after unsubscribe, and never lets a listener panic interrupt delivery.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

pub type Listener = Arc<dyn Fn(&str) + Send + Sync>;
pub type GlobalListener = Arc<dyn Fn() + Send + Sync>;

struct Handle<T> {
    id: u64,
    listener: T,
}

/// An unsubscribe handle. Calling it more than once, or after [`Registry::shutdown`],
/// is a safe no-op.
pub struct Unsubscribe {
    remove: Box<dyn FnOnce() + Send>,
}

impl Unsubscribe {
    pub fn call(self) {
        (self.remove)();
    }

    /// An unsubscribe handle that does nothing when called — returned for
    /// `subscribe` calls made after the client has already closed.
    pub fn noop() -> Self {
        Unsubscribe {
            remove: Box::new(|| {}),
        }
    }
}

#[derive(Default)]
pub struct Registry {
    next_id: AtomicU64,
    per_name: RwLock<HashMap<String, Vec<Handle<Listener>>>>,
    global: RwLock<Vec<Handle<GlobalListener>>>,
    closed: std::sync::atomic::AtomicBool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(self: &Arc<Self>, name: &str, listener: Listener) -> Unsubscribe {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.per_name
            .write()
            .entry(name.to_string())
            .or_default()
            .push(Handle { id, listener });

        let registry = Arc::clone(self);
        let name = name.to_string();
        Unsubscribe {
            remove: Box::new(move || {
                if let Some(list) = registry.per_name.write().get_mut(&name) {
                    list.retain(|h| h.id != id);
                }
            }),
        }
    }

    pub fn subscribe_all(self: &Arc<Self>, listener: GlobalListener) -> Unsubscribe {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.global.write().push(Handle { id, listener });

        let registry = Arc::clone(self);
        Unsubscribe {
            remove: Box::new(move || {
                registry.global.write().retain(|h| h.id != id);
            }),
        }
    }

    /// Invokes every per-name listener for each changed name, then every global
    /// listener exactly once for the whole delivery batch. Listener panics are caught
    /// and logged; they never interrupt the rest of the dispatch.
    pub fn notify(&self, changed: &std::collections::HashSet<String>) {
        if self.closed.load(Ordering::Acquire) || changed.is_empty() {
            return;
        }

        let per_name = self.per_name.read();
        for name in changed {
            if let Some(listeners) = per_name.get(name) {
                for handle in listeners {
                    let listener = Arc::clone(&handle.listener);
                    let name = name.clone();
                    if catch_unwind(AssertUnwindSafe(|| listener(&name))).is_err() {
                        tracing::error!(config = %name, "subscriber panicked during notification");
                    }
                }
            }
        }
        drop(per_name);

        let global = self.global.read();
        for handle in global.iter() {
            let listener = Arc::clone(&handle.listener);
            if catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                tracing::error!("global subscriber panicked during notification");
            }
        }
    }

    /// Marks the registry closed: no subscriber is ever invoked again. Existing
    /// unsubscribe handles remain safe to call.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        self.per_name.write().clear();
        self.global.write().clear();
    }
}
