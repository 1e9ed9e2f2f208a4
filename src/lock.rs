//! `SequentialLock`: a reentrant, FIFO, fault-latching work queue.
//!
//! Actions handed to [`SequentialLock::wait`] run one at a time, in the order
//! their `wait` calls enqueued them, on whichever caller first finds the lock
//! idle. There is no worker thread and nobody blocks waiting for their turn:
//! a caller either drains the queue itself or returns immediately after
//! enqueueing.
//!
//! A recursive `wait` from inside a running action only enqueues; the frame
//! that owns the drain loop picks the new item up after the current action
//! returns. The loop never recurses into itself, so deep chains of recursive
//! enqueues use constant stack.
//!
//! # Faults
//!
//! If an action returns `Err` (or panics), the lock is faulted for good:
//! the error is returned from the one `wait` call that was draining, the rest
//! of the queue is dropped without running, and every later `wait` succeeds
//! without running its action. [`dispose`](SequentialLock::dispose) latches
//! the same inert state silently.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use rxcore::lock::SequentialLock;
//!
//! let lock = SequentialLock::<()>::new();
//! let log = Arc::new(Mutex::new(vec![]));
//!
//! let (c_lock, c_log) = (lock.clone(), log.clone());
//! lock
//!   .wait(move || {
//!     let inner_log = c_log.clone();
//!     // Runs after the outer action, not inside it.
//!     c_lock.wait(move || {
//!       inner_log.lock().unwrap().push(2);
//!       Ok(())
//!     })?;
//!     c_log.lock().unwrap().push(1);
//!     Ok(())
//!   })
//!   .unwrap();
//!
//! assert_eq!(*log.lock().unwrap(), vec![1, 2]);
//! ```

use std::{
  collections::VecDeque,
  fmt::{Debug, Formatter},
  mem,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
  thread,
};

use crate::subscription::Subscription;

type Job<E> = Box<dyn FnOnce() -> Result<(), E> + Send>;

/// Serializes deferred actions; see the [module docs](self).
pub struct SequentialLock<E> {
  inner: Arc<Mutex<LockState<E>>>,
}

struct LockState<E> {
  queue: VecDeque<Job<E>>,
  draining: bool,
  faulted: bool,
  disposed: bool,
}

impl<E> LockState<E> {
  #[inline]
  fn is_inert(&self) -> bool { self.faulted || self.disposed }
}

impl<E> SequentialLock<E> {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(Mutex::new(LockState {
        queue: VecDeque::new(),
        draining: false,
        faulted: false,
        disposed: false,
      })),
    }
  }

  /// Enqueue `action` and, if no other frame is draining, drain the queue on
  /// the calling thread.
  ///
  /// Returns `Err` only when this call owned the drain loop and one of the
  /// actions it ran failed. Reentrant and concurrent callers always get
  /// `Ok(())`; their action is run by the current drain owner.
  pub fn wait<F>(&self, action: F) -> Result<(), E>
  where
    F: FnOnce() -> Result<(), E> + Send + 'static,
  {
    {
      let mut state = self.state();
      if state.is_inert() {
        drop(state);
        drop(action);
        tracing::trace!("sequential lock is inert, dropping action");
        return Ok(());
      }
      state.queue.push_back(Box::new(action));
      if state.draining {
        return Ok(());
      }
      state.draining = true;
    }

    tracing::trace!("acquired drain ownership");
    let guard = DrainGuard { lock: self };
    let result = self.drain();
    mem::forget(guard);
    result
  }

  fn drain(&self) -> Result<(), E> {
    loop {
      let job = {
        let mut state = self.state();
        if state.is_inert() {
          state.draining = false;
          let discarded = mem::take(&mut state.queue);
          drop(state);
          drop(discarded);
          return Ok(());
        }
        match state.queue.pop_front() {
          Some(job) => job,
          None => {
            state.draining = false;
            tracing::trace!("queue drained, released drain ownership");
            return Ok(());
          }
        }
      };

      if let Err(err) = job() {
        let discarded = {
          let mut state = self.state();
          state.faulted = true;
          state.draining = false;
          mem::take(&mut state.queue)
        };
        tracing::debug!(discarded = discarded.len(), "sequential lock faulted");
        drop(discarded);
        return Err(err);
      }
    }
  }

  /// Latch the lock inert and drop everything still queued.
  ///
  /// Called from inside a running action, the drain loop stops as soon as
  /// that action returns.
  pub fn dispose(&self) {
    let discarded = {
      let mut state = self.state();
      if state.disposed {
        return;
      }
      state.disposed = true;
      mem::take(&mut state.queue)
    };
    if !discarded.is_empty() {
      tracing::debug!(discarded = discarded.len(), "sequential lock disposed with pending work");
    }
  }

  /// `true` once an action failed or the lock was disposed.
  pub fn is_faulted(&self) -> bool { self.state().is_inert() }

  pub fn is_disposed(&self) -> bool { self.state().disposed }

  /// `true` while some frame owns the drain loop.
  pub fn is_draining(&self) -> bool { self.state().draining }

  /// Number of actions queued behind the one currently running.
  pub fn pending(&self) -> usize { self.state().queue.len() }

  fn state(&self) -> MutexGuard<'_, LockState<E>> {
    // User actions never run while the guard is held, so a poisoned mutex
    // still holds consistent state.
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<E> Default for SequentialLock<E> {
  fn default() -> Self { Self::new() }
}

impl<E> Clone for SequentialLock<E> {
  fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<E> Subscription for SequentialLock<E> {
  #[inline]
  fn unsubscribe(self) { self.dispose() }

  #[inline]
  fn is_closed(&self) -> bool { self.is_faulted() }
}

impl<E> Debug for SequentialLock<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let state = self.state();
    f.debug_struct("SequentialLock")
      .field("pending", &state.queue.len())
      .field("draining", &state.draining)
      .field("faulted", &state.faulted)
      .field("disposed", &state.disposed)
      .finish()
  }
}

/// Latches the fault when an action unwinds out of the drain loop.
struct DrainGuard<'a, E> {
  lock: &'a SequentialLock<E>,
}

impl<E> Drop for DrainGuard<'_, E> {
  fn drop(&mut self) {
    if !thread::panicking() {
      return;
    }
    let discarded = {
      let mut state = self.lock.state();
      state.faulted = true;
      state.draining = false;
      mem::take(&mut state.queue)
    };
    tracing::debug!(discarded = discarded.len(), "sequential lock faulted by a panicking action");
    // Dropping a queued closure can panic too; leaking is preferable to an
    // abort while already unwinding.
    mem::forget(discarded);
  }
}
