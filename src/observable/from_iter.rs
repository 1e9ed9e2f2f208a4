use std::{iter::Once, marker::PhantomData};

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error; the
/// error type is left open so the source can feed operators that fail with
/// their own errors. Emission stops early once the observer reports
/// [`is_closed`](Observer::is_closed).
///
/// ```rust
/// use rxcore::prelude::*;
///
/// let mut sum = 0;
/// observable::from_iter(vec![0, 1, 2, 3]).subscribe(|v| sum += v);
/// assert_eq!(sum, 6);
/// ```
pub fn from_iter<Iter, Err>(iter: Iter) -> FromIter<Iter, Err>
where
  Iter: IntoIterator,
{
  FromIter { iter, _marker: PhantomData }
}

/// Creates an observable that emits one value and completes.
pub fn of<Item, Err>(value: Item) -> FromIter<Once<Item>, Err> { from_iter(std::iter::once(value)) }

#[derive(Clone)]
pub struct FromIter<Iter, Err> {
  iter: Iter,
  _marker: PhantomData<fn() -> Err>,
}

impl<Iter, Err> ObservableType for FromIter<Iter, Err>
where
  Iter: IntoIterator,
{
  type Item = Iter::Item;
  type Err = Err;
}

impl<Iter, Err, O> CoreObservable<O> for FromIter<Iter, Err>
where
  Iter: IntoIterator,
  O: Observer<Iter::Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    let mut iter = self.iter.into_iter();
    while !observer.is_closed() {
      match iter.next() {
        Some(v) => observer.next(v),
        None => return observer.complete(),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    notification::{Notification, Recorder},
    prelude::*,
  };

  #[rxcore_macro::test]
  fn from_range() {
    let mut hit_count = 0;
    let mut completed = false;
    observable::from_iter(0..100).on_complete(|| completed = true).subscribe(|_| hit_count += 1);

    assert_eq!(hit_count, 100);
    assert!(completed);
  }

  #[rxcore_macro::test]
  fn of_emits_once() {
    let recorder = Recorder::<&str, ()>::new();
    observable::of("x").subscribe_with(recorder.clone());
    assert_eq!(recorder.notifications(), vec![Notification::Next("x"), Notification::Completed]);
  }

  #[rxcore_macro::test]
  fn stops_when_observer_closes() {
    let mut pulled = 0;
    let recorder = Recorder::<bool, RxError>::new();
    observable::from_iter((0..10).inspect(|_| pulled += 1))
      .any_with(|v| *v == 2)
      .subscribe_with(recorder.clone());

    assert_eq!(pulled, 3);
    assert_eq!(recorder.values(), vec![true]);
  }
}
