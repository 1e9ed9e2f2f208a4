//! Notifications as values, and a recording observer built on them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::observer::Observer;

/// One event of the observer protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Completed,
}

impl<Item, Err> Notification<Item, Err> {
  /// `Error` and `Completed` end a stream.
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Notification::Next(_)) }

  /// Deliver to the observer held in `slot`. A terminal notification takes
  /// the observer out of the slot, so later deliveries are ignored.
  pub fn deliver<O>(self, slot: &mut Option<O>)
  where
    O: Observer<Item, Err>,
  {
    match self {
      Notification::Next(value) => Observer::<Item, Err>::next(slot, value),
      Notification::Error(err) => Observer::<Item, Err>::error(slot.take(), err),
      Notification::Completed => Observer::<Item, Err>::complete(slot.take()),
    }
  }
}

/// An observer that records everything it receives.
///
/// Clones share the same log, so one clone can be subscribed while another is
/// kept for assertions. The recorder never closes on its own, which lets a
/// test observe a producer that keeps going after a terminal notification.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// let recorder = Recorder::<i32, RxError>::new();
/// observable::from_iter([1, 2, 3]).sum().subscribe_with(recorder.clone());
/// assert_eq!(recorder.notifications(), vec![Notification::Next(6), Notification::Completed]);
/// ```
pub struct Recorder<Item, Err> {
  log: Arc<Mutex<Vec<Notification<Item, Err>>>>,
}

impl<Item, Err> Recorder<Item, Err> {
  pub fn new() -> Self { Self { log: Arc::new(Mutex::new(Vec::new())) } }

  /// Number of `Error`/`Completed` notifications received.
  pub fn terminal_count(&self) -> usize { self.log().iter().filter(|n| n.is_terminal()).count() }

  pub fn is_completed(&self) -> bool {
    self.log().iter().any(|n| matches!(n, Notification::Completed))
  }

  pub fn len(&self) -> usize { self.log().len() }

  pub fn is_empty(&self) -> bool { self.log().is_empty() }

  fn log(&self) -> MutexGuard<'_, Vec<Notification<Item, Err>>> {
    self.log.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<Item: Clone, Err: Clone> Recorder<Item, Err> {
  pub fn notifications(&self) -> Vec<Notification<Item, Err>> { self.log().clone() }

  pub fn values(&self) -> Vec<Item> {
    self
      .log()
      .iter()
      .filter_map(|n| match n {
        Notification::Next(v) => Some(v.clone()),
        _ => None,
      })
      .collect()
  }

  /// The first error received, if any.
  pub fn err(&self) -> Option<Err> {
    self.log().iter().find_map(|n| match n {
      Notification::Error(e) => Some(e.clone()),
      _ => None,
    })
  }
}

impl<Item, Err> Default for Recorder<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Clone for Recorder<Item, Err> {
  fn clone(&self) -> Self { Self { log: self.log.clone() } }
}

impl<Item, Err> Observer<Item, Err> for Recorder<Item, Err> {
  fn next(&mut self, value: Item) { self.log().push(Notification::Next(value)); }

  fn error(self, err: Err) { self.log().push(Notification::Error(err)); }

  fn complete(self) { self.log().push(Notification::Completed); }

  fn is_closed(&self) -> bool { false }
}
