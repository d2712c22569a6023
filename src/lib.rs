//! Client runtime for a remote dynamic-configuration / feature-flag service.
//!
//! An application process holds a live, in-memory view of a set of named configs,
//! keeps it continuously consistent with a server-side source of truth via a
//! streaming transport, and evaluates per-call overrides against a caller-supplied
//! attribute context. A server-rendered process can freeze its view into a
//! serializable [`Snapshot`] that a browser process deserializes and resumes under,
//! with or without live updates.
//!
//! The crate covers the client runtime only: the initialization protocol, the
//! streaming update channel with reconnection and backoff, the evaluation engine, and
//! the snapshot round-trip. The server itself, framework-specific view-layer adapters,
//! the administrative HTTP surface, and end-to-end test harnesses are out of scope —
//! they are external collaborators that interact with this crate only through `get`,
//! `subscribe`, `get_snapshot`, and `close`.

pub mod client;
pub mod condition;
pub mod entry;
pub mod error;
pub mod evaluator;
pub mod options;
pub mod registry;
pub mod retry;
pub mod snapshot;
pub mod store;
pub mod transport;
pub mod value;

pub use client::{Client, ClientState, GetOptions};
pub use condition::Condition;
pub use entry::{ConfigEntry, Override};
pub use error::{Error, Result};
pub use options::{ClientOptions, Required};
pub use registry::Unsubscribe;
pub use snapshot::{Snapshot, SNAPSHOT_GLOBAL};
pub use value::{Context, ContextValue, Literal, Value};
