//! `sequence_equal`: compares two sources element by element.
//!
//! Both sources feed one [`SequentialLock`], so their notifications are
//! processed one at a time whatever threads they arrive on. Elements that
//! arrive before their counterpart wait in a per-side queue; at most one of
//! the two queues is non-empty at any time. The result is emitted as soon as
//! it is known, and both sources are released at that point.

use std::{
  collections::VecDeque,
  convert::Infallible,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
  lock::SequentialLock,
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  ops::callback::Comparer,
  subscription::SubscriptionHandle,
};

#[derive(Clone)]
pub struct SequenceEqual<S1, S2, F> {
  left: S1,
  right: S2,
  eq: F,
}

impl<S1, S2, F> SequenceEqual<S1, S2, F> {
  pub fn new(left: S1, right: S2, eq: F) -> Self { Self { left, right, eq } }
}

impl<S1, S2, F> ObservableType for SequenceEqual<S1, S2, F>
where
  S1: ObservableType,
{
  type Item = bool;
  type Err = S1::Err;
}

impl<S1, S2, F, O, L, R, Err> CoreObservable<O> for SequenceEqual<S1, S2, F>
where
  S1: ObservableType<Item = L, Err = Err> + CoreObservable<SideObserver<L, R, O, F, true>>,
  S2: ObservableType<Item = R, Err = Err> + CoreObservable<SideObserver<L, R, O, F, false>>,
  S1::Unsub: Send + 'static,
  S2::Unsub: Send + 'static,
  L: Send + 'static,
  R: Send + 'static,
  O: Observer<bool, Err> + Send + 'static,
  F: Comparer<L, R, Err, Output = bool> + Send + 'static,
{
  type Unsub = SubscriptionHandle;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let handle = SubscriptionHandle::new();
    let lock = SequentialLock::new();
    handle.add(lock.clone());

    let inner = Arc::new(Mutex::new(Inner {
      pending: Pending {
        left: VecDeque::new(),
        right: VecDeque::new(),
        left_done: false,
        right_done: false,
        eq: self.eq,
      },
      observer: Some(observer),
    }));

    let left = SideObserver { inner: inner.clone(), lock: lock.clone(), handle: handle.clone() };
    handle.add(self.left.actual_subscribe(left));
    // The left side alone may already have decided the result.
    if !handle.is_closed() {
      let right = SideObserver { inner, lock, handle: handle.clone() };
      handle.add(self.right.actual_subscribe(right));
    }
    handle
  }
}

struct Pending<L, R, F> {
  left: VecDeque<L>,
  right: VecDeque<R>,
  left_done: bool,
  right_done: bool,
  eq: F,
}

impl<L, R, F> Pending<L, R, F> {
  fn on_left<Err>(&mut self, value: L) -> Result<Option<bool>, Err>
  where
    F: Comparer<L, R, Err, Output = bool>,
  {
    Ok(match self.right.pop_front() {
      Some(other) => (!self.eq.compare(&value, &other)?).then_some(false),
      None if self.right_done => Some(false),
      None => {
        self.left.push_back(value);
        None
      }
    })
  }

  fn on_right<Err>(&mut self, value: R) -> Result<Option<bool>, Err>
  where
    F: Comparer<L, R, Err, Output = bool>,
  {
    Ok(match self.left.pop_front() {
      Some(other) => (!self.eq.compare(&other, &value)?).then_some(false),
      None if self.left_done => Some(false),
      None => {
        self.right.push_back(value);
        None
      }
    })
  }

  fn on_left_done(&mut self) -> Option<bool> {
    self.left_done = true;
    if !self.right.is_empty() {
      Some(false)
    } else if self.right_done {
      Some(true)
    } else {
      None
    }
  }

  fn on_right_done(&mut self) -> Option<bool> {
    self.right_done = true;
    if !self.left.is_empty() {
      Some(false)
    } else if self.left_done {
      Some(true)
    } else {
      None
    }
  }
}

struct Inner<L, R, O, F> {
  pending: Pending<L, R, F>,
  // Taken once the result or an error is delivered.
  observer: Option<O>,
}

/// The observer subscribed to one side; `LEFT` tells which.
pub struct SideObserver<L, R, O, F, const LEFT: bool> {
  inner: Arc<Mutex<Inner<L, R, O, F>>>,
  lock: SequentialLock<Infallible>,
  handle: SubscriptionHandle,
}

fn lock_inner<T>(inner: &Mutex<T>) -> MutexGuard<'_, T> {
  inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<L, R, O, F, const LEFT: bool> SideObserver<L, R, O, F, LEFT>
where
  L: Send + 'static,
  R: Send + 'static,
  O: Send + 'static,
  F: Send + 'static,
{
  /// Apply `update` under the lock; a decided result, or an `Err` from the
  /// comparer, releases both sides and is delivered.
  fn settle<Err, U>(&self, update: U)
  where
    O: Observer<bool, Err>,
    U: FnOnce(&mut Pending<L, R, F>) -> Result<Option<bool>, Err> + Send + 'static,
  {
    let inner = self.inner.clone();
    let handle = self.handle.clone();
    let _ = self.lock.wait(move || {
      let decided = {
        let mut inner = lock_inner(&inner);
        if inner.observer.is_none() {
          return Ok(());
        }
        match update(&mut inner.pending) {
          Ok(None) => None,
          result => inner.observer.take().map(|observer| (observer, result)),
        }
      };
      if let Some((mut observer, result)) = decided {
        handle.dispose();
        match result {
          Ok(equal) => {
            Observer::<bool, Err>::next(&mut observer, equal.unwrap_or_default());
            Observer::<bool, Err>::complete(observer);
          }
          Err(err) => observer.error(err),
        }
      }
      Ok(())
    });
  }

  fn fail<Err>(&self, err: Err)
  where
    O: Observer<bool, Err>,
    Err: Send + 'static,
  {
    let inner = self.inner.clone();
    let handle = self.handle.clone();
    let _ = self.lock.wait(move || {
      let observer = lock_inner(&inner).observer.take();
      if let Some(observer) = observer {
        handle.dispose();
        observer.error(err);
      }
      Ok(())
    });
  }
}

impl<L, R, O, F, Err> Observer<L, Err> for SideObserver<L, R, O, F, true>
where
  L: Send + 'static,
  R: Send + 'static,
  Err: Send + 'static,
  O: Observer<bool, Err> + Send + 'static,
  F: Comparer<L, R, Err, Output = bool> + Send + 'static,
{
  fn next(&mut self, value: L) { self.settle::<Err, _>(move |pending| pending.on_left(value)); }

  fn error(self, err: Err) { self.fail(err); }

  fn complete(self) { self.settle::<Err, _>(|pending| Ok(pending.on_left_done())); }

  fn is_closed(&self) -> bool { self.handle.is_closed() }
}

impl<L, R, O, F, Err> Observer<R, Err> for SideObserver<L, R, O, F, false>
where
  L: Send + 'static,
  R: Send + 'static,
  Err: Send + 'static,
  O: Observer<bool, Err> + Send + 'static,
  F: Comparer<L, R, Err, Output = bool> + Send + 'static,
{
  fn next(&mut self, value: R) { self.settle::<Err, _>(move |pending| pending.on_right(value)); }

  fn error(self, err: Err) { self.fail(err); }

  fn complete(self) { self.settle::<Err, _>(|pending| Ok(pending.on_right_done())); }

  fn is_closed(&self) -> bool { self.handle.is_closed() }
}
