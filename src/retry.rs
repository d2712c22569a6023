//! Fixed-delay reconnection policy for the live channel.
//!
//! Kept deliberately simple per design: the contract only promises eventual reconnect
//! while the client is not closed, not a particular backoff curve. Exponential backoff
//! with jitter would be a reasonable extension but is not required.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn wait(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}
