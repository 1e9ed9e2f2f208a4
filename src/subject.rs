//! A hot observable that multicasts to every current subscriber.
//!
//! `Subject` is both an [`Observer`] and an observable. Clones share the same
//! subscriber list, so one clone can be handed to producers while another is
//! subscribed to.
//!
//! Emissions are funneled through a [`SequentialLock`]: concurrent producers
//! are serialized, and a `next` issued from inside a subscriber's handler is
//! delivered to everybody after the current broadcast finishes instead of
//! re-entering it. Subscribing or unsubscribing from a handler is allowed.
//!
//! After `error` or `complete` the subject stays terminated: later
//! subscribers immediately receive the same terminal notification.

use std::{
  convert::Infallible,
  mem,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
  },
};

use smallvec::SmallVec;

use crate::{
  lock::SequentialLock,
  observable::{CoreObservable, ObservableType},
  observer::{BoxedObserver, Observer},
  subscription::Subscription,
};

pub struct Subject<Item, Err> {
  state: Arc<Mutex<SubjectState<Item, Err>>>,
  lock: SequentialLock<Infallible>,
}

struct Subscriber<Item, Err> {
  id: usize,
  closed: Arc<AtomicBool>,
  observer: BoxedObserver<'static, Item, Err>,
}

#[derive(Clone)]
enum Terminal<Err> {
  Error(Err),
  Completed,
}

struct SubjectState<Item, Err> {
  subscribers: SmallVec<[Subscriber<Item, Err>; 2]>,
  next_id: usize,
  terminal: Option<Terminal<Err>>,
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self {
    Self {
      state: Arc::new(Mutex::new(SubjectState {
        subscribers: SmallVec::new(),
        next_id: 0,
        terminal: None,
      })),
      lock: SequentialLock::new(),
    }
  }

  /// Number of live subscribers.
  pub fn observer_count(&self) -> usize {
    self.state().subscribers.iter().filter(|s| !s.closed.load(Ordering::Acquire)).count()
  }

  /// Whether `error` or `complete` has been delivered.
  pub fn is_terminated(&self) -> bool { self.state().terminal.is_some() }

  fn state(&self) -> MutexGuard<'_, SubjectState<Item, Err>> { lock_state(&self.state) }
}

fn lock_state<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
  state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Self { state: self.state.clone(), lock: self.lock.clone() } }
}

impl<Item, Err> SubjectState<Item, Err> {
  /// Put the broadcast list back, keeping subscribers added meanwhile after
  /// the existing ones.
  fn restore(&mut self, mut subscribers: SmallVec<[Subscriber<Item, Err>; 2]>) {
    subscribers.retain(|s| !s.closed.load(Ordering::Acquire) && !s.observer.is_closed());
    subscribers.extend(self.subscribers.drain(..));
    self.subscribers = subscribers;
  }
}

// ==================== Observer ====================

impl<Item, Err> Observer<Item, Err> for Subject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn next(&mut self, value: Item) {
    let state = self.state.clone();
    let _ = self.lock.wait(move || {
      let mut subscribers = {
        let mut state = lock_state(&state);
        if state.terminal.is_some() {
          return Ok(());
        }
        mem::take(&mut state.subscribers)
      };
      for subscriber in subscribers.iter_mut() {
        if !subscriber.closed.load(Ordering::Acquire) {
          subscriber.observer.next(value.clone());
        }
      }
      lock_state(&state).restore(subscribers);
      Ok(())
    });
  }

  fn error(self, err: Err) { self.terminate(Terminal::Error(err)); }

  fn complete(self) { self.terminate(Terminal::Completed); }

  fn is_closed(&self) -> bool { self.lock.is_faulted() || self.is_terminated() }
}

impl<Item, Err> Subject<Item, Err>
where
  Item: Send + 'static,
  Err: Clone + Send + 'static,
{
  fn terminate(self, terminal: Terminal<Err>) {
    let state = self.state.clone();
    let lock = self.lock.clone();
    let _ = self.lock.wait(move || {
      let subscribers = {
        let mut state = lock_state(&state);
        if state.terminal.is_some() {
          return Ok(());
        }
        state.terminal = Some(terminal.clone());
        mem::take(&mut state.subscribers)
      };
      for subscriber in subscribers {
        if subscriber.closed.swap(true, Ordering::AcqRel) {
          continue;
        }
        match &terminal {
          Terminal::Error(err) => subscriber.observer.error(err.clone()),
          Terminal::Completed => subscriber.observer.complete(),
        }
      }
      lock.dispose();
      Ok(())
    });
  }
}

// ==================== Observable ====================

impl<Item, Err> ObservableType for Subject<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err, O> CoreObservable<O> for Subject<Item, Err>
where
  O: Observer<Item, Err> + Send + 'static,
  Err: Clone,
{
  type Unsub = SubjectSubscription<Item, Err>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let closed = Arc::new(AtomicBool::new(false));
    let mut state = self.state();
    if let Some(terminal) = state.terminal.clone() {
      drop(state);
      closed.store(true, Ordering::Release);
      match terminal {
        Terminal::Error(err) => observer.error(err),
        Terminal::Completed => observer.complete(),
      }
      return SubjectSubscription { id: usize::MAX, closed, state: self.state.clone() };
    }

    let id = state.next_id;
    state.next_id += 1;
    state.subscribers.push(Subscriber { id, closed: closed.clone(), observer: Box::new(observer) });
    drop(state);
    SubjectSubscription { id, closed, state: self.state.clone() }
  }
}

/// Subscription returned by [`Subject`]; unsubscribing removes the observer.
pub struct SubjectSubscription<Item, Err> {
  id: usize,
  closed: Arc<AtomicBool>,
  state: Arc<Mutex<SubjectState<Item, Err>>>,
}

impl<Item, Err> Subscription for SubjectSubscription<Item, Err> {
  fn unsubscribe(self) {
    if self.closed.swap(true, Ordering::AcqRel) {
      return;
    }
    // While a broadcast is running the list is empty and the flag alone keeps
    // the observer from being called again.
    let removed = {
      let mut state = lock_state(&self.state);
      let position = state.subscribers.iter().position(|s| s.id == self.id);
      position.map(|idx| state.subscribers.remove(idx))
    };
    drop(removed);
  }

  fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }
}

#[cfg(test)]
mod tests {
  use std::{sync::atomic::AtomicUsize, thread};

  use super::*;
  use crate::{
    notification::{Notification, Recorder},
    prelude::*,
  };

  #[rxcore_macro::test]
  fn multicasts_to_every_subscriber() {
    let mut subject = Subject::<i32, ()>::new();
    let (a, b) = (Recorder::new(), Recorder::new());
    subject.clone().subscribe_with(a.clone());
    subject.clone().subscribe_with(b.clone());

    subject.next(1);
    subject.next(2);
    subject.complete();

    let expected = vec![Notification::Next(1), Notification::Next(2), Notification::Completed];
    assert_eq!(a.notifications(), expected);
    assert_eq!(b.notifications(), expected);
  }

  #[rxcore_macro::test]
  fn unsubscribed_observer_receives_nothing_more() {
    let mut subject = Subject::<i32, ()>::new();
    let recorder = Recorder::new();
    let sub = subject.clone().subscribe_with(recorder.clone());

    subject.next(1);
    sub.unsubscribe();
    subject.next(2);
    assert_eq!(recorder.values(), vec![1]);
    assert_eq!(subject.observer_count(), 0);
  }

  #[rxcore_macro::test]
  fn late_subscriber_gets_terminal() {
    let subject = Subject::<i32, &str>::new();
    subject.clone().error("gone");

    let recorder = Recorder::new();
    let sub = subject.clone().subscribe_with(recorder.clone());
    assert!(sub.is_closed());
    assert_eq!(recorder.notifications(), vec![Notification::Error("gone")]);
  }

  #[rxcore_macro::test]
  fn nothing_after_terminal() {
    let mut subject = Subject::<i32, ()>::new();
    let recorder = Recorder::new();
    subject.clone().subscribe_with(recorder.clone());

    let mut other = subject.clone();
    subject.next(1);
    subject.complete();
    other.next(2);
    other.clone().complete();
    other.error(());
    assert_eq!(recorder.notifications(), vec![Notification::Next(1), Notification::Completed]);
  }

  #[rxcore_macro::test]
  fn reentrant_next_is_delivered_after_current_broadcast() {
    struct Echo {
      subject: Subject<i32, ()>,
      log: Arc<Mutex<Vec<i32>>>,
    }

    impl Observer<i32, ()> for Echo {
      fn next(&mut self, value: i32) {
        self.log.lock().unwrap().push(value);
        if value == 1 {
          self.subject.next(2);
        }
      }
      fn error(self, _: ()) {}
      fn complete(self) {}
      fn is_closed(&self) -> bool { false }
    }

    let mut subject = Subject::<i32, ()>::new();
    let log = Arc::new(Mutex::new(vec![]));
    let second = Recorder::new();
    subject.clone().subscribe_with(Echo { subject: subject.clone(), log: log.clone() });
    subject.clone().subscribe_with(second.clone());

    subject.next(1);
    assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    // The second subscriber saw 1 before 2 even though 2 was emitted while 1
    // was still being broadcast.
    assert_eq!(second.values(), vec![1, 2]);
  }

  #[rxcore_macro::test]
  fn subscribe_from_handler() {
    let mut subject = Subject::<i32, ()>::new();
    let late = Recorder::new();
    let c_subject = subject.clone();
    let c_late = late.clone();
    let mut once = Some(());
    subject.clone().subscribe_with(FnObserver(move |_: i32| {
      if once.take().is_some() {
        c_subject.clone().subscribe_with(c_late.clone());
      }
    }));

    subject.next(1);
    subject.next(2);
    assert_eq!(late.values(), vec![2]);
    assert_eq!(subject.observer_count(), 2);
  }

  /// A `next`-only observer with a unit error type.
  struct FnObserver<F>(F);

  impl<F: FnMut(i32)> Observer<i32, ()> for FnObserver<F> {
    fn next(&mut self, value: i32) { (self.0)(value) }
    fn error(self, _: ()) {}
    fn complete(self) {}
    fn is_closed(&self) -> bool { false }
  }

  #[rxcore_macro::test]
  fn concurrent_producers_are_serialized() {
    let subject = Subject::<usize, ()>::new();
    let busy = Arc::new(AtomicBool::new(false));
    let seen = Arc::new(AtomicUsize::new(0));
    let (c_busy, c_seen) = (busy.clone(), seen.clone());
    subject.clone().subscribe_with(FnUsize(move |_| {
      assert!(!c_busy.swap(true, Ordering::SeqCst), "overlapping delivery");
      thread::yield_now();
      c_seen.fetch_add(1, Ordering::SeqCst);
      c_busy.store(false, Ordering::SeqCst);
    }));

    let handles: Vec<_> = (0..4)
      .map(|_| {
        let mut producer = subject.clone();
        thread::spawn(move || (0..250).for_each(|i| producer.next(i)))
      })
      .collect();
    for handle in handles {
      handle.join().unwrap();
    }
    assert_eq!(seen.load(Ordering::SeqCst), 1000);
  }

  struct FnUsize<F>(F);

  impl<F: FnMut(usize)> Observer<usize, ()> for FnUsize<F> {
    fn next(&mut self, value: usize) { (self.0)(value) }
    fn error(self, _: ()) {}
    fn complete(self) {}
    fn is_closed(&self) -> bool { false }
  }
}
