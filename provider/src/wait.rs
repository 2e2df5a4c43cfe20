// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Waiting for a remote object to reach a target state.
//!
//! The state is refreshed at a fixed interval until it is one of the target states.
//! The wait ends early if the state is neither pending nor a target, if the refresh
//! fails, or if the caller cancels it.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, sleep, timeout_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChangeConf {
    pub pending: Vec<String>,
    pub target: Vec<String>,
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Time to wait before the first refresh
    pub delay: Duration,
}

impl StateChangeConf {
    #[must_use]
    pub fn new(pending: &[&str], target: &[&str]) -> Self {
        Self {
            pending: pending.iter().map(|s| (*s).to_string()).collect(),
            target: target.iter().map(|s| (*s).to_string()).collect(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Error)]
pub enum WaitError<E: std::error::Error + 'static> {
    #[error("Timeout after {timeout:?} (last state: {})", .last_state.as_deref().unwrap_or("none"))]
    Timeout {
        timeout: Duration,
        last_state: Option<String>,
    },
    #[error("Wait cancelled (last state: {})", .last_state.as_deref().unwrap_or("none"))]
    Cancelled { last_state: Option<String> },
    #[error("Unexpected state '{state}', wanted one of {expected:?}")]
    UnexpectedState { state: String, expected: Vec<String> },
    #[error("Failed to refresh state: {0}")]
    Refresh(#[source] E),
}

/// Refresh until the reported state is a target state, and return the object reported
/// along with it.
///
/// `refresh` yields the current object and its state.
pub async fn wait_for_state<T, E, F, Fut>(
    conf: &StateChangeConf,
    cancel: &CancellationToken,
    mut refresh: F,
) -> Result<T, WaitError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(T, String), E>>,
{
    let deadline = Instant::now() + conf.timeout;
    let mut last_state: Option<String> = None;

    if !conf.delay.is_zero() {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(WaitError::Cancelled { last_state }),
            () = sleep(conf.delay) => {}
        }
    }

    loop {
        let refreshed = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(WaitError::Cancelled { last_state }),
            refreshed = timeout_at(deadline, refresh()) => refreshed,
        };
        let (object, state) = match refreshed {
            Err(_) => {
                return Err(WaitError::Timeout {
                    timeout: conf.timeout,
                    last_state,
                });
            }
            Ok(Err(e)) => {
                error!("Failed to refresh state: {e}");
                return Err(WaitError::Refresh(e));
            }
            Ok(Ok(refreshed)) => refreshed,
        };

        debug!("Observed state '{state}'");
        if conf.target.contains(&state) {
            return Ok(object);
        }
        if !conf.pending.contains(&state) {
            return Err(WaitError::UnexpectedState {
                state,
                expected: conf.target.clone(),
            });
        }
        last_state = Some(state);

        if Instant::now() + conf.poll_interval > deadline {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(WaitError::Cancelled { last_state }),
                () = tokio::time::sleep_until(deadline) => {}
            }
            return Err(WaitError::Timeout {
                timeout: conf.timeout,
                last_state,
            });
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(WaitError::Cancelled { last_state }),
            () = sleep(conf.poll_interval) => {}
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    #[derive(Debug, Error)]
    #[error("refresh failed")]
    struct RefreshFailed;

    fn conf() -> StateChangeConf {
        StateChangeConf::new(&["Pending"], &["Available"])
    }

    type Phase = std::future::Ready<Result<(usize, String), RefreshFailed>>;

    /// A refresh reporting `Pending` for the first `pending` calls, then `Available`
    fn phases(pending: usize) -> (Arc<AtomicUsize>, impl FnMut() -> Phase) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let refresh = move || {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            let state = if call < pending { "Pending" } else { "Available" };
            std::future::ready(Ok((call, state.to_string())))
        };
        (calls, refresh)
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaches_target() {
        let (calls, refresh) = phases(3);
        let start = Instant::now();
        let object = wait_for_state(&conf(), &CancellationToken::new(), refresh)
            .await
            .unwrap();
        assert_eq!(object, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let (_, refresh) = phases(usize::MAX);
        let conf = conf().with_timeout(Duration::from_secs(10));
        let start = Instant::now();
        let err = wait_for_state(&conf, &CancellationToken::new(), refresh)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WaitError::Timeout { timeout, ref last_state }
                if timeout == Duration::from_secs(10) && last_state.as_deref() == Some("Pending")
        ));
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_state() {
        let refresh = || std::future::ready(Ok::<_, RefreshFailed>(((), "Failed".to_string())));
        let err = wait_for_state(&conf(), &CancellationToken::new(), refresh)
            .await
            .unwrap_err();
        assert!(matches!(err, WaitError::UnexpectedState { ref state, .. } if state == "Failed"));
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn test_refresh_error() {
        let refresh = || std::future::ready(Err::<((), String), _>(RefreshFailed));
        let err = wait_for_state(&conf(), &CancellationToken::new(), refresh)
            .await
            .unwrap_err();
        assert!(matches!(err, WaitError::Refresh(RefreshFailed)));
        assert!(logs_contain("refresh failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (calls, refresh) = phases(usize::MAX);
        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(4500)).await;
            canceller.cancel();
        });
        let err = wait_for_state(&conf(), &cancel, refresh).await.unwrap_err();
        assert!(matches!(
            err,
            WaitError::Cancelled { ref last_state } if last_state.as_deref() == Some("Pending")
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_during_delay() {
        let (calls, refresh) = phases(0);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let conf = conf().with_delay(Duration::from_secs(2));
        let err = wait_for_state(&conf, &cancel, refresh).await.unwrap_err();
        assert!(matches!(err, WaitError::Cancelled { last_state: None }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
