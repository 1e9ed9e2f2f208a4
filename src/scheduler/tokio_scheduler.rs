use tokio::runtime::Handle;

use super::{Duration, Scheduler, TaskHandle};

/// Spawns tasks onto a Tokio runtime; delays use `tokio::time::sleep`.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
  runtime: Handle,
}

impl TokioScheduler {
  pub fn new(runtime: Handle) -> Self { Self { runtime } }

  /// Use the runtime the caller is running on.
  ///
  /// # Panics
  ///
  /// Panics when called outside a Tokio runtime.
  pub fn current() -> Self { Self::new(Handle::current()) }
}

impl Scheduler for TokioScheduler {
  fn schedule<F>(&self, task: F, delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    self.runtime.spawn(async move {
      if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
      }
      c_handle.run(task);
    });
    handle
  }
}
