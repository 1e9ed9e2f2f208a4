//! Bridges an observable to `async` code.
//!
//! ## Behavior
//!
//! - **Single value**: the future resolves to `Ok(value)` once the source
//!   completes.
//! - **Error**: the source's error is returned as `Err(err)`.
//! - **Empty**: `Err(RxError::NoElements.into())`.
//! - **More than one value**: `Err(RxError::MoreThanOneElement.into())` as soon
//!   as the second value arrives; the source is released at that point.
//!
//! Dropping the future before it resolves unsubscribes from the source.
//!
//! ```rust
//! use rxcore::prelude::*;
//!
//! let value = futures::executor::block_on(observable::from_iter([1, 2, 3]).sum().into_future());
//! assert_eq!(value, Ok::<_, RxError>(6));
//! ```

use std::{
  future::Future,
  pin::Pin,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
  task::{Context, Poll, Waker},
};

use crate::{
  error::RxError,
  observable::CoreObservable,
  observer::Observer,
  subscription::SubscriptionHandle,
};

struct Shared<Item, Err> {
  value: Option<Item>,
  result: Option<Result<Item, Err>>,
  resolved: bool,
  waker: Option<Waker>,
}

impl<Item, Err> Shared<Item, Err> {
  /// Store the result and hand back the waker to call once unlocked.
  fn resolve(&mut self, result: Result<Item, Err>) -> Option<Waker> {
    if self.resolved {
      return None;
    }
    self.resolved = true;
    self.value = None;
    self.result = Some(result);
    self.waker.take()
  }
}

type SharedState<Item, Err> = Arc<Mutex<Shared<Item, Err>>>;

fn lock_shared<Item, Err>(shared: &SharedState<Item, Err>) -> MutexGuard<'_, Shared<Item, Err>> {
  shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A future resolving to the single value of an observable.
pub struct ObservableFuture<Item, Err> {
  shared: SharedState<Item, Err>,
  subscription: SubscriptionHandle,
}

impl<Item, Err> ObservableFuture<Item, Err> {
  pub fn new<S>(source: S) -> Self
  where
    S: CoreObservable<FutureObserver<Item, Err>, Item = Item, Err = Err>,
    S::Unsub: Send + 'static,
    Err: From<RxError>,
  {
    let shared = Arc::new(Mutex::new(Shared {
      value: None,
      result: None,
      resolved: false,
      waker: None,
    }));
    let subscription = SubscriptionHandle::new();
    let observer = FutureObserver { shared: shared.clone(), subscription: subscription.clone() };
    subscription.add(source.actual_subscribe(observer));
    Self { shared, subscription }
  }
}

impl<Item, Err> Future for ObservableFuture<Item, Err> {
  type Output = Result<Item, Err>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut shared = lock_shared(&self.shared);
    match shared.result.take() {
      Some(result) => Poll::Ready(result),
      None => {
        shared.waker = Some(cx.waker().clone());
        Poll::Pending
      }
    }
  }
}

impl<Item, Err> Drop for ObservableFuture<Item, Err> {
  fn drop(&mut self) { self.subscription.dispose(); }
}

/// The observer [`ObservableFuture`] subscribes to its source.
pub struct FutureObserver<Item, Err> {
  shared: SharedState<Item, Err>,
  subscription: SubscriptionHandle,
}

impl<Item, Err> FutureObserver<Item, Err> {
  fn resolve(&self, result: Result<Item, Err>) {
    let waker = lock_shared(&self.shared).resolve(result);
    self.subscription.dispose();
    if let Some(waker) = waker {
      waker.wake();
    }
  }
}

impl<Item, Err> Observer<Item, Err> for FutureObserver<Item, Err>
where
  Err: From<RxError>,
{
  fn next(&mut self, value: Item) {
    let second = {
      let mut shared = lock_shared(&self.shared);
      if shared.resolved {
        return;
      }
      shared.value.replace(value).is_some()
    };
    if second {
      self.resolve(Err(RxError::MoreThanOneElement.into()));
    }
  }

  fn error(self, err: Err) { self.resolve(Err(err)); }

  fn complete(self) {
    let value = lock_shared(&self.shared).value.take();
    self.resolve(value.ok_or_else(|| RxError::NoElements.into()));
  }

  fn is_closed(&self) -> bool { lock_shared(&self.shared).resolved }
}

#[cfg(test)]
mod tests {
  use futures::executor::block_on;

  use crate::{notification::Notification, prelude::*};

  #[rxcore_macro::test]
  fn resolves_single_value() {
    assert_eq!(block_on(observable::of::<_, RxError>(42).into_future()), Ok(42));
  }

  #[rxcore_macro::test]
  fn empty_and_multiple() {
    assert_eq!(
      block_on(observable::empty::<i32, RxError>().into_future()),
      Err(RxError::NoElements)
    );

    let mut pulled = 0;
    let result = block_on(
      observable::from_iter([1, 2, 3].into_iter().inspect(|_| pulled += 1)).into_future(),
    );
    assert_eq!(result, Err::<i32, RxError>(RxError::MoreThanOneElement));
    assert_eq!(pulled, 2);
  }

  #[rxcore_macro::test]
  fn forwards_error() {
    assert_eq!(
      block_on(observable::throw_err::<i32, RxError>(RxError::Overflow).into_future()),
      Err(RxError::Overflow)
    );
  }

  #[rxcore_macro::test(shared)]
  async fn awaits_values_from_another_thread() {
    let fut = observable::timeline_on(
      vec![
        (Duration::from_millis(5), Notification::Next(1)),
        (Duration::from_millis(10), Notification::Next(2)),
        (Duration::from_millis(15), Notification::Completed),
      ],
      ThreadScheduler,
    )
    .sum()
    .into_future();
    assert_eq!(fut.await, Ok::<_, RxError>(3));
  }

  #[rxcore_macro::test]
  fn dropping_the_future_unsubscribes() {
    let subject = Subject::<i32, RxError>::new();
    let fut = subject.clone().into_future();
    assert_eq!(subject.observer_count(), 1);
    drop(fut);
    assert_eq!(subject.observer_count(), 0);
  }
}
