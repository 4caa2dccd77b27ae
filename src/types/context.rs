//! Per-call deadline and cancellation.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{Result, SentiqError};

/// Deadline and cancellation handle threaded through a generation call.
///
/// Honoured at the network-call boundary of each provider adapter: a
/// timeout surfaces as [`SentiqError::Timeout`] and cancellation as
/// [`SentiqError::Cancelled`]. Both are remote-class errors and advance
/// the failover loop like any other provider failure.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Upper bound for a single provider call. `None` falls back to the
    /// gateway default.
    pub timeout: Option<Duration>,
    /// Cancelling this token aborts the in-flight provider call.
    pub cancel: CancellationToken,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound each provider call by `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use an existing cancellation token (e.g. a child of a request-scoped token).
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Fill in `timeout` when the caller did not supply one.
    pub(crate) fn or_timeout(&self, default: Option<Duration>) -> Self {
        Self {
            timeout: self.timeout.or(default),
            cancel: self.cancel.clone(),
        }
    }

    /// Drive `fut` to completion unless the deadline passes or the token
    /// is cancelled first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(SentiqError::Cancelled);
        }
        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(SentiqError::Cancelled),
                result = fut => result,
            }
        };
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, guarded)
                .await
                .map_err(|_| SentiqError::Timeout(limit))?,
            None => guarded.await,
        }
    }
}
