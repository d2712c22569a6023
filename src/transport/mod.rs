//! HTTP(S) transport: a one-shot initial load and a long-lived live channel, both
//! addressed by the same bearer credential and base URL.

pub mod fetch;
pub mod initial;
pub mod stream;
pub mod wire;

pub use fetch::{FetchClient, HttpFetchClient};
pub use stream::LiveChannel;
