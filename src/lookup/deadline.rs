//! Shared cancellable deadline for a race.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};

/// Why a deadline token reported done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    Elapsed,
    Canceled,
}

/// Cancellable, time-bounded signal shared by every fetcher of a race.
///
/// Clones observe the same cancellation and the same deadline.
#[derive(Debug, Clone)]
pub struct DeadlineToken {
    token: CancellationToken,
    deadline: Instant,
}

impl DeadlineToken {
    /// Create a token that elapses `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now() + timeout,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_canceled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn has_elapsed(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Cancel the token when the returned guard is dropped.
    pub fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Resolve once the deadline elapses or the token is canceled.
    ///
    /// When both hold, the deadline wins.
    pub async fn done(&self) -> DoneReason {
        tokio::select! {
            biased;
            _ = sleep_until(self.deadline) => DoneReason::Elapsed,
            _ = self.token.cancelled() => DoneReason::Canceled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_done_after_deadline() {
        let token = DeadlineToken::after(Duration::from_millis(20));
        assert!(!token.has_elapsed());
        assert_eq!(token.done().await, DoneReason::Elapsed);
        assert!(token.has_elapsed());
        assert!(!token.is_canceled());
    }

    #[tokio::test]
    async fn test_cancel_wakes_clones() {
        let token = DeadlineToken::after(Duration::from_secs(60));
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.done().await });
        token.cancel();
        assert_eq!(handle.await.unwrap(), DoneReason::Canceled);
    }

    #[tokio::test]
    async fn test_drop_guard_cancels() {
        let token = DeadlineToken::after(Duration::from_secs(60));
        {
            let _guard = token.drop_guard();
            assert!(!token.is_canceled());
        }
        assert!(token.is_canceled());
        assert_eq!(token.done().await, DoneReason::Canceled);
    }

    #[tokio::test]
    async fn test_elapsed_wins_over_cancel() {
        let token = DeadlineToken::after(Duration::ZERO);
        token.cancel();
        assert_eq!(token.done().await, DoneReason::Elapsed);
    }
}
