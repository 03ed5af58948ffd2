//! Scoped timers for panel-local deferred work.
//!
//! A `TimerScope<E>` owns every delay, interval and simulated backend call a
//! panel has in flight. Each piece of work is a tokio task that eventually
//! sends an event `E` back to the UI thread; the paired `TimerEvents<E>`
//! receiver is drained once per frame.
//!
//! Cancellation rules:
//! - `cancel_all()` aborts every live task and bumps the scope's epoch, so
//!   events that were already queued but not yet delivered are discarded.
//! - Dropping the scope does the same, which is what happens when a panel is
//!   torn down by a step change.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::trace;

/// Shared bookkeeping between a scope and its receiver.
#[derive(Debug, Default)]
struct ScopeShared {
    epoch: AtomicU64,
    live: AtomicUsize,
    /// Signalled when `live` drops to zero.
    drained: Notify,
}

/// Decrements the live-task counter when the task finishes or is aborted.
struct LiveGuard(Arc<ScopeShared>);

impl LiveGuard {
    fn new(shared: &Arc<ScopeShared>) -> Self {
        shared.live.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(shared))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        if self.0.live.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.drained.notify_waiters();
        }
    }
}

/// Owner of a panel's scheduled work.
pub struct TimerScope<E> {
    runtime: Handle,
    tx: mpsc::UnboundedSender<(u64, E)>,
    shared: Arc<ScopeShared>,
    tasks: Vec<JoinHandle<()>>,
}

/// Receiving half of a `TimerScope`.
pub struct TimerEvents<E> {
    rx: mpsc::UnboundedReceiver<(u64, E)>,
    shared: Arc<ScopeShared>,
}

impl<E: Send + 'static> TimerScope<E> {
    /// Create a scope that spawns onto `runtime`, together with its receiver.
    pub fn new(runtime: Handle) -> (Self, TimerEvents<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(ScopeShared::default());
        let scope = Self {
            runtime,
            tx,
            shared: Arc::clone(&shared),
            tasks: Vec::new(),
        };
        (scope, TimerEvents { rx, shared })
    }

    /// Deliver `event` once, after `delay`.
    pub fn after(&mut self, delay: Duration, event: E) {
        self.resolve(async move {
            tokio::time::sleep(delay).await;
            event
        });
    }

    /// Deliver a clone of `event` every `period`, first after one full period.
    /// Periods shorter than a millisecond are raised to one.
    pub fn every(&mut self, period: Duration, event: E)
    where
        E: Clone,
    {
        let period = period.max(Duration::from_millis(1));
        let tx = self.tx.clone();
        let epoch = self.epoch();
        let guard = LiveGuard::new(&self.shared);
        let task = self.runtime.spawn(async move {
            let _guard = guard;
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                if tx.send((epoch, event.clone())).is_err() {
                    break;
                }
            }
        });
        self.track(task);
    }

    /// Run `work` to completion and deliver its output.
    pub fn resolve<F>(&mut self, work: F)
    where
        F: Future<Output = E> + Send + 'static,
    {
        let tx = self.tx.clone();
        let epoch = self.epoch();
        let guard = LiveGuard::new(&self.shared);
        let task = self.runtime.spawn(async move {
            let _guard = guard;
            let event = work.await;
            let _ = tx.send((epoch, event));
        });
        self.track(task);
    }

    /// Abort all live work and invalidate anything already queued.
    pub fn cancel_all(&mut self) {
        let aborted = self.tasks.len();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.shared.epoch.fetch_add(1, Ordering::AcqRel);
        if aborted > 0 {
            trace!(target: "timers", aborted, "timer scope cancelled");
        }
    }

    /// Number of scheduled tasks that have neither finished nor been cancelled.
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    fn epoch(&self) -> u64 {
        self.shared.epoch.load(Ordering::Acquire)
    }

    fn track(&mut self, task: JoinHandle<()>) {
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(task);
    }
}

impl<E> Drop for TimerScope<E> {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.shared.epoch.fetch_add(1, Ordering::AcqRel);
    }
}

impl<E> TimerEvents<E> {
    /// Non-blocking: the next current-epoch event, if one is queued.
    pub fn try_next(&mut self) -> Option<E> {
        loop {
            let (epoch, event) = self.rx.try_recv().ok()?;
            if self.is_current(epoch) {
                return Some(event);
            }
        }
    }

    /// Wait for the next current-epoch event.
    ///
    /// Returns `None` as soon as nothing is queued and no work is live, so
    /// callers never wait on a scope that has nothing scheduled.
    pub async fn next(&mut self) -> Option<E> {
        loop {
            match self.rx.try_recv() {
                Ok((epoch, event)) => {
                    if self.is_current(epoch) {
                        return Some(event);
                    }
                }
                Err(TryRecvError::Disconnected) => return None,
                Err(TryRecvError::Empty) => {
                    // Register for the drained signal before reading `live`,
                    // so an abort landing in between still wakes us.
                    let drained = self.shared.drained.notified();
                    tokio::pin!(drained);
                    drained.as_mut().enable();
                    if self.shared.live.load(Ordering::Acquire) == 0 {
                        return None;
                    }
                    let received = tokio::select! {
                        received = self.rx.recv() => Some(received?),
                        _ = &mut drained => None,
                    };
                    if let Some((epoch, event)) = received {
                        if self.is_current(epoch) {
                            return Some(event);
                        }
                    }
                }
            }
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        epoch == self.shared.epoch.load(Ordering::Acquire)
    }
}
