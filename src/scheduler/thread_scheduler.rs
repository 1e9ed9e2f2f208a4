use std::thread;

use super::{Duration, Scheduler, TaskHandle};

/// Runs each task on a newly spawned thread.
#[derive(Clone, Copy, Default, Debug)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
  fn schedule<F>(&self, task: F, delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    thread::spawn(move || {
      if let Some(delay) = delay {
        if c_handle.is_cancelled() {
          c_handle.mark_finished();
          return;
        }
        thread::sleep(delay);
      }
      c_handle.run(task);
    });
    handle
  }
}
