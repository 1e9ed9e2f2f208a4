use std::{
  convert::Infallible,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, TryLockError,
  },
};

use super::Observer;
use crate::lock::SequentialLock;

/// An observer that delivers every notification through a [`SequentialLock`].
///
/// Clones share the lock and the downstream observer, so they can be handed
/// to several producers (threads, scheduler tasks) at once. The downstream
/// then sees a strictly serialized stream: no two handlers overlap, and
/// notifications issued from inside a handler are delivered after it returns
/// instead of re-entering it.
///
/// After the first terminal notification the lock is disposed, so anything
/// still queued or sent later is dropped. `is_closed` never waits for a
/// running handler.
pub struct SerializedObserver<O> {
  lock: SequentialLock<Infallible>,
  observer: Arc<Mutex<Option<O>>>,
  // Set as soon as the terminal action starts.
  closed: Arc<AtomicBool>,
}

impl<O> SerializedObserver<O> {
  pub fn new(observer: O) -> Self {
    Self {
      lock: SequentialLock::new(),
      observer: Arc::new(Mutex::new(Some(observer))),
      closed: Arc::new(AtomicBool::new(false)),
    }
  }
}

impl<O> Clone for SerializedObserver<O> {
  fn clone(&self) -> Self {
    Self { lock: self.lock.clone(), observer: self.observer.clone(), closed: self.closed.clone() }
  }
}

impl<O> SerializedObserver<O>
where
  O: Send + 'static,
{
  fn deliver(&self, action: impl FnOnce(Arc<Mutex<Option<O>>>) + Send + 'static) {
    let observer = self.observer.clone();
    // `Infallible` actions cannot fault the lock; a panicking handler still
    // unwinds through the frame that drains.
    let _ = self.lock.wait(move || {
      action(observer);
      Ok(())
    });
  }
}

impl<O, Item, Err> Observer<Item, Err> for SerializedObserver<O>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, value: Item) {
    self.deliver(move |mut observer| Observer::<Item, Err>::next(&mut observer, value));
  }

  fn error(self, err: Err) {
    let lock = self.lock.clone();
    let closed = self.closed.clone();
    self.deliver(move |observer| {
      closed.store(true, Ordering::Release);
      Observer::<Item, Err>::error(observer, err);
      lock.dispose();
    });
  }

  fn complete(self) {
    let lock = self.lock.clone();
    let closed = self.closed.clone();
    self.deliver(move |observer| {
      closed.store(true, Ordering::Release);
      Observer::<Item, Err>::complete(observer);
      lock.dispose();
    });
  }

  fn is_closed(&self) -> bool {
    if self.closed.load(Ordering::Acquire) || self.lock.is_faulted() {
      return true;
    }
    // A busy mutex means a handler is running; it has not terminated yet.
    match self.observer.try_lock() {
      Ok(observer) => Observer::<Item, Err>::is_closed(&*observer),
      Err(TryLockError::WouldBlock) => false,
      Err(TryLockError::Poisoned(poisoned)) => {
        Observer::<Item, Err>::is_closed(&*poisoned.into_inner())
      }
    }
  }
}
