//! Cancellation context shared by dial and call.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::CtlError;

/// One cancellation token plus an optional deadline, armed once at creation.
///
/// Cloning shares the token, so any clone can cancel the in-flight operation.
#[derive(Debug, Clone)]
pub struct CallContext {
    token: CancellationToken,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    interrupt: bool,
}

impl CallContext {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            token: CancellationToken::new(),
            timeout,
            deadline: timeout.map(|t| Instant::now() + t),
            interrupt: false,
        }
    }

    /// Also cancel on Ctrl-C.
    pub fn with_interrupt(mut self) -> Self {
        self.interrupt = true;
        self
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Drive `fut` to completion unless the context is cancelled or expires
    /// first. On early exit the future is dropped, tearing down whatever
    /// connection it owned.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, CtlError>
    where
        F: Future<Output = Result<T, CtlError>>,
    {
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        let interrupted = async {
            if self.interrupt && tokio::signal::ctrl_c().await.is_ok() {
                return;
            }
            std::future::pending::<()>().await
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(CtlError::Cancelled),
            _ = interrupted => Err(CtlError::Cancelled),
            _ = expired => Err(CtlError::Timeout(self.timeout.unwrap_or_default())),
            res = fut => res,
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new(None)
    }
}
