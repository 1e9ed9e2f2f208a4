//! The state machine shared by every operator that reduces a sequence to a
//! single result.
//!
//! An operator supplies a [`ScalarStrategy`]: how to fold one element and what
//! to yield when the source completes. [`Scalar`] takes care of the protocol:
//!
//! - an `Err` returned by `step` is delivered downstream once and the source
//!   is unsubscribed;
//! - [`Step::Done`] ends the subscription early with `next` + `complete`;
//! - on completion `finish` applies the empty policy;
//! - a panic in `step` releases the source and unwinds to the producer; no
//!   terminal notification follows;
//! - upstream errors are forwarded verbatim;
//! - disposing the returned [`SubscriptionHandle`] releases the source and
//!   silences the operator even if the source keeps emitting.

use std::{mem, thread};

use crate::{
  error::RxError,
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  subscription::SubscriptionHandle,
};

/// Result of folding one element.
pub enum Step<S, T> {
  /// Keep going with the updated state.
  Continue(S),
  /// The result is known; the source is no longer needed.
  Done(T),
}

/// Operator-specific logic plugged into [`Scalar`].
///
/// `step` takes the state by value and hands it back in
/// [`Step::Continue`], so accumulators can be moved through user closures.
pub trait ScalarStrategy<Item, Err>: Sized {
  type Output;

  fn step(self, item: Item) -> Result<Step<Self, Self::Output>, Err>;

  /// Called when the source completes without an early result.
  fn finish(self) -> Result<Self::Output, Err>;
}

/// What an operator yields when the source completes without the element it
/// needed (`first` on an empty source, `element_at` past the end, ...).
pub trait Fallback<T, Err> {
  fn fallback(self) -> Result<T, Err>;
}

/// Fail with the given error.
#[derive(Debug, Clone)]
pub struct Require(pub RxError);

impl<T, Err: From<RxError>> Fallback<T, Err> for Require {
  #[inline]
  fn fallback(self) -> Result<T, Err> { Err(self.0.into()) }
}

/// Yield `T::default()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrDefault;

impl<T: Default, Err> Fallback<T, Err> for OrDefault {
  #[inline]
  fn fallback(self) -> Result<T, Err> { Ok(T::default()) }
}

// ============================================================================
// Scalar observable
// ============================================================================

/// An observable emitting the single result of a strategy applied to
/// `source`.
#[derive(Clone)]
pub struct Scalar<S, St> {
  source: S,
  strategy: St,
}

impl<S, St> Scalar<S, St> {
  pub fn new(source: S, strategy: St) -> Self { Self { source, strategy } }
}

impl<S, St> ObservableType for Scalar<S, St>
where
  S: ObservableType,
  St: ScalarStrategy<S::Item, S::Err>,
{
  type Item = St::Output;
  type Err = S::Err;
}

impl<S, St, O> CoreObservable<O> for Scalar<S, St>
where
  S: CoreObservable<ScalarObserver<O, St>>,
  S::Unsub: Send + 'static,
  St: ScalarStrategy<S::Item, S::Err>,
  O: Observer<St::Output, S::Err>,
{
  type Unsub = SubscriptionHandle;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = SubscriptionHandle::new();
    let observer = ScalarObserver {
      observer: Some(observer),
      strategy: Some(self.strategy),
      upstream: upstream.clone(),
    };
    // A synchronous source may finish, or be cut short, before this returns;
    // `add` on a closed handle releases the subscription on the spot.
    upstream.add(self.source.actual_subscribe(observer));
    upstream
  }
}

/// The observer [`Scalar`] subscribes to its source.
pub struct ScalarObserver<O, St> {
  observer: Option<O>,
  // `None` once a result was delivered, or after a strategy panicked.
  strategy: Option<St>,
  upstream: SubscriptionHandle,
}

impl<O, St> ScalarObserver<O, St> {
  fn emit<T, Err>(&mut self, result: Result<T, Err>)
  where
    O: Observer<T, Err>,
  {
    self.strategy = None;
    let observer = self.observer.take();
    self.upstream.dispose();
    if let Some(observer) = observer {
      deliver(observer, result);
    }
  }
}

fn deliver<O, T, Err>(mut observer: O, result: Result<T, Err>)
where
  O: Observer<T, Err>,
{
  match result {
    Ok(value) => {
      observer.next(value);
      observer.complete();
    }
    Err(err) => observer.error(err),
  }
}

/// Releases the source if a strategy panics; the strategy is already gone,
/// so the operator stays silent afterwards.
struct StepGuard<'a> {
  upstream: &'a SubscriptionHandle,
}

impl Drop for StepGuard<'_> {
  fn drop(&mut self) {
    if thread::panicking() {
      tracing::debug!("scalar strategy panicked, releasing its source");
      self.upstream.dispose();
    }
  }
}

impl<O, St, Item, Err> Observer<Item, Err> for ScalarObserver<O, St>
where
  St: ScalarStrategy<Item, Err>,
  O: Observer<St::Output, Err>,
{
  fn next(&mut self, value: Item) {
    if self.upstream.is_closed() {
      return;
    }
    let Some(strategy) = self.strategy.take() else {
      return;
    };
    let guard = StepGuard { upstream: &self.upstream };
    let stepped = strategy.step(value);
    mem::forget(guard);
    match stepped {
      Ok(Step::Continue(strategy)) => self.strategy = Some(strategy),
      Ok(Step::Done(output)) => self.emit(Ok(output)),
      Err(err) => self.emit(Err(err)),
    }
  }

  fn error(mut self, err: Err) {
    if self.upstream.is_closed() {
      return;
    }
    self.strategy = None;
    self.upstream.dispose();
    if let Some(observer) = self.observer.take() {
      observer.error(err);
    }
  }

  fn complete(mut self) {
    if self.upstream.is_closed() {
      return;
    }
    if let Some(strategy) = self.strategy.take() {
      let result = strategy.finish();
      self.emit(result);
    }
  }

  fn is_closed(&self) -> bool {
    self.strategy.is_none()
      || self.upstream.is_closed()
      || self.observer.as_ref().is_none_or(|o| o.is_closed())
  }
}
