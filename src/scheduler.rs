//! Schedulers decide where and when a task runs.
//!
//! Nothing in the core depends on a particular scheduler: sources that need
//! one (such as [`timeline_on`](crate::observable::timeline_on)) take it as an
//! explicit argument, and [`ImmediateScheduler`] is only the `Default` value
//! used by the convenience constructors.
//!
//! | Scheduler | Runs the task |
//! |---|---|
//! | [`ImmediateScheduler`] | inline, on the calling thread |
//! | [`ThreadScheduler`] | on a new thread per task |
//! | `TokioScheduler` | on a Tokio runtime (feature `tokio-scheduler`) |
//! | [`TestScheduler`] | when virtual time is advanced (tests) |

mod test_scheduler;
mod thread_scheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;

use std::{
  future::Future,
  pin::Pin,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
  task::{Context, Poll},
};

pub use std::time::Duration;

use futures::task::AtomicWaker;
pub use test_scheduler::TestScheduler;
pub use thread_scheduler::ThreadScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

use crate::subscription::Subscription;

/// Runs tasks, immediately or after a delay.
pub trait Scheduler: Clone {
  /// Schedule `task` to run once `delay` has elapsed (as soon as possible
  /// for `None`). The returned handle cancels the task if it has not started.
  fn schedule<F>(&self, task: F, delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static;
}

// ==================== TaskHandle ====================

/// Handle to a scheduled task.
///
/// Unsubscribing cancels the task if it has not started yet. The handle is
/// also a future that resolves once the task finished or was cancelled.
#[derive(Clone)]
pub struct TaskHandle(Option<Arc<TaskState>>);

struct TaskState {
  cancelled: AtomicBool,
  finished: AtomicBool,
  waker: AtomicWaker,
}

impl TaskHandle {
  pub fn new() -> Self {
    Self(Some(Arc::new(TaskState {
      cancelled: AtomicBool::new(false),
      finished: AtomicBool::new(false),
      waker: AtomicWaker::new(),
    })))
  }

  /// A handle for a task that already ran.
  pub fn finished() -> Self { Self(None) }

  pub fn is_finished(&self) -> bool {
    self.0.as_ref().is_none_or(|s| s.finished.load(Ordering::Acquire))
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.as_ref().is_some_and(|s| s.cancelled.load(Ordering::Acquire))
  }

  /// Run `task` unless the handle was cancelled, then mark it finished.
  pub(crate) fn run(&self, task: impl FnOnce()) {
    if !self.is_cancelled() {
      task();
    }
    self.mark_finished();
  }

  pub(crate) fn mark_finished(&self) {
    if let Some(state) = &self.0 {
      state.finished.store(true, Ordering::Release);
      state.waker.wake();
    }
  }
}

impl Default for TaskHandle {
  fn default() -> Self { Self::new() }
}

impl Subscription for TaskHandle {
  fn unsubscribe(self) {
    if let Some(state) = &self.0 {
      state.cancelled.store(true, Ordering::Release);
      state.waker.wake();
    }
  }

  fn is_closed(&self) -> bool { self.is_finished() || self.is_cancelled() }
}

impl Future for TaskHandle {
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let Some(state) = &self.0 else {
      return Poll::Ready(());
    };
    if self.is_closed() {
      return Poll::Ready(());
    }
    state.waker.register(cx.waker());
    // Re-check after registering, the task may have finished in between.
    if self.is_closed() { Poll::Ready(()) } else { Poll::Pending }
  }
}

// ==================== ImmediateScheduler ====================

/// Runs every task inline on the calling thread, sleeping first if a delay
/// is given. This is the default scheduler.
#[derive(Clone, Copy, Default, Debug)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn schedule<F>(&self, task: F, delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    if let Some(delay) = delay.filter(|d| !d.is_zero()) {
      std::thread::sleep(delay);
    }
    task();
    TaskHandle::finished()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  };

  use super::*;

  #[rxcore_macro::test]
  fn immediate_runs_inline() {
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    let handle = ImmediateScheduler.schedule(
      move || {
        c_hits.fetch_add(1, Ordering::SeqCst);
      },
      None,
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(handle.is_finished());
    assert!(handle.is_closed());
  }

  #[rxcore_macro::test]
  fn cancelled_handle_skips_task() {
    let handle = TaskHandle::new();
    handle.clone().unsubscribe();

    let mut ran = false;
    handle.run(|| ran = true);
    assert!(!ran);
    assert!(handle.is_finished());
  }

  #[rxcore_macro::test]
  fn handle_future_resolves_when_finished() {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    let worker = std::thread::spawn(move || c_handle.run(|| {}));
    futures::executor::block_on(handle);
    worker.join().unwrap();
  }
}
