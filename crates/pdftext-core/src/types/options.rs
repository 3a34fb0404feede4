//! Per-call request options.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Options for a single request.
///
/// `timeout` overrides the client's default timeout for this call only.
/// When `cancel` fires, the in-flight request is dropped and the call
/// returns [`ClientError::Cancelled`](crate::error::ClientError::Cancelled).
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a deadline for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}
