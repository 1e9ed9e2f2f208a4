//! Side effects on the terminal notifications.

use std::convert::Infallible;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

// ==================== OnError ====================

/// Hands the error to a closure; downstream sees a stream that cannot fail
/// and never completes after an error.
#[derive(Clone)]
pub struct OnError<S, F> {
  source: S,
  func: F,
}

impl<S, F> OnError<S, F> {
  pub fn new(source: S, func: F) -> Self { Self { source, func } }
}

impl<S: ObservableType, F> ObservableType for OnError<S, F> {
  type Item = S::Item;
  type Err = Infallible;
}

impl<S, F, O> CoreObservable<O> for OnError<S, F>
where
  S: CoreObservable<OnErrorObserver<O, F>>,
  F: FnOnce(S::Err),
  O: Observer<S::Item, Infallible>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(OnErrorObserver { observer, func: self.func })
  }
}

pub struct OnErrorObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for OnErrorObserver<O, F>
where
  O: Observer<Item, Infallible>,
  F: FnOnce(Err),
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(self, err: Err) { (self.func)(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

// ==================== OnComplete ====================

#[derive(Clone)]
pub struct OnComplete<S, F> {
  source: S,
  func: F,
}

impl<S, F> OnComplete<S, F> {
  pub fn new(source: S, func: F) -> Self { Self { source, func } }
}

impl<S: ObservableType, F> ObservableType for OnComplete<S, F> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, F, O> CoreObservable<O> for OnComplete<S, F>
where
  S: CoreObservable<OnCompleteObserver<O, F>>,
  F: FnOnce(),
  O: Observer<S::Item, S::Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(OnCompleteObserver { observer, func: self.func })
  }
}

pub struct OnCompleteObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for OnCompleteObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) {
    (self.func)();
    self.observer.complete();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
