//! Per-source request throttling.
//!
//! [`RateLimitedScheduler`] delays work against one catalog so that at most
//! `reservoir` requests are dispatched per refill window and no two requests
//! are dispatched closer together than `min_time`. It never rejects work:
//! callers simply wait their turn.
//!
//! # Dispatch
//!
//! ```text
//!  schedule(task) ──► lock (FIFO) ──► refill? ──► spacing ok? ──► reservoir > 0? ──► unlock ──► task()
//!                                      ▲              │ no                │ no
//!                                      └──── sleep ◄──┴───────────────────┘
//! ```
//!
//! The lock is a [`tokio::sync::Mutex`], which grants access in request order,
//! so waiting callers are dispatched first-in first-out. The task itself runs
//! after the lock is released; dispatched tasks may overlap.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

use crate::config::RateLimitPolicy;
use crate::types::SourceId;

/// Horizon used in place of deadlines that would overflow [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `base + delta`, clamped to a far-future instant instead of overflowing.
fn saturating_add(base: Instant, delta: Duration) -> Instant {
    base.checked_add(delta)
        .or_else(|| base.checked_add(FAR_FUTURE))
        .unwrap_or(base)
}

/// Mutable dispatch state, only touched while holding the scheduler lock.
#[derive(Debug)]
struct SchedulerState {
    /// Dispatches left in the current window.
    reservoir: u32,
    /// Start of the next refill window.
    next_refill: Instant,
    last_dispatch: Option<Instant>,
}

impl SchedulerState {
    /// Restore the reservoir if one or more refill boundaries have passed.
    fn refill(&mut self, now: Instant, capacity: u32, interval: Duration) {
        if now < self.next_refill {
            return;
        }
        let behind = now.duration_since(self.next_refill).as_nanos();
        let windows = behind / interval.as_nanos().max(1) + 1;
        let windows = u32::try_from(windows).unwrap_or(u32::MAX);
        self.next_refill = saturating_add(self.next_refill, interval.saturating_mul(windows));
        self.reservoir = capacity;
    }
}

/// Throttles dispatch of tasks against a single external source.
///
/// Construct one per source at startup and share it (via `Arc`) with every
/// component that talks to that source. Schedulers of different sources
/// share nothing.
#[derive(Debug)]
pub struct RateLimitedScheduler {
    source: SourceId,
    capacity: u32,
    min_time: Duration,
    refresh_interval: Duration,
    state: Mutex<SchedulerState>,
}

impl RateLimitedScheduler {
    /// Create a scheduler with a full reservoir. The first refill happens
    /// one `refresh_interval_ms` after construction.
    pub fn new(source: SourceId, policy: RateLimitPolicy) -> Self {
        let refresh_interval = Duration::from_millis(policy.refresh_interval_ms.max(1));
        Self {
            source,
            capacity: policy.reservoir,
            min_time: Duration::from_millis(policy.min_time_ms),
            refresh_interval,
            state: Mutex::new(SchedulerState {
                reservoir: policy.reservoir,
                next_refill: saturating_add(Instant::now(), refresh_interval),
                last_dispatch: None,
            }),
        }
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    /// Run `task` once the rate limit allows it, returning its output.
    ///
    /// Suspends until every earlier caller has been dispatched and both the
    /// spacing and reservoir constraints are met. Errors inside the task's
    /// output are passed through untouched.
    pub async fn schedule<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.acquire().await;
        task().await
    }

    /// Dispatches still available in the current window.
    pub async fn remaining(&self) -> u32 {
        let mut state = self.state.lock().await;
        state.refill(Instant::now(), self.capacity, self.refresh_interval);
        state.reservoir
    }

    async fn acquire(&self) {
        let mut state = self.state.lock().await;
        loop {
            let now = Instant::now();
            state.refill(now, self.capacity, self.refresh_interval);

            if let Some(last) = state.last_dispatch {
                let earliest = saturating_add(last, self.min_time);
                if now < earliest {
                    tracing::trace!(source = %self.source, wait = ?(earliest - now), "spacing requests");
                    sleep_until(earliest).await;
                    continue;
                }
            }

            if state.reservoir == 0 {
                tracing::debug!(
                    source = %self.source,
                    wait = ?state.next_refill.saturating_duration_since(now),
                    "reservoir exhausted, waiting for refill"
                );
                sleep_until(state.next_refill).await;
                continue;
            }

            state.reservoir -= 1;
            state.last_dispatch = Some(now);
            return;
        }
    }
}
