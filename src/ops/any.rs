//! Boolean quantifiers. Each one stops pulling from its source as soon as the
//! answer is known.

use crate::ops::{
  callback::Selector,
  scalar::{ScalarStrategy, Step},
};

pub struct Any<P> {
  predicate: P,
}

impl<P> Any<P> {
  pub fn new(predicate: P) -> Self { Self { predicate } }
}

impl<Item, Err, P> ScalarStrategy<Item, Err> for Any<P>
where
  P: Selector<Item, Err, Output = bool>,
{
  type Output = bool;

  fn step(mut self, item: Item) -> Result<Step<Self, bool>, Err> {
    if self.predicate.select(&item)? { Ok(Step::Done(true)) } else { Ok(Step::Continue(self)) }
  }

  fn finish(self) -> Result<bool, Err> { Ok(false) }
}

pub struct All<P> {
  predicate: P,
}

impl<P> All<P> {
  pub fn new(predicate: P) -> Self { Self { predicate } }
}

impl<Item, Err, P> ScalarStrategy<Item, Err> for All<P>
where
  P: Selector<Item, Err, Output = bool>,
{
  type Output = bool;

  fn step(mut self, item: Item) -> Result<Step<Self, bool>, Err> {
    if self.predicate.select(&item)? { Ok(Step::Continue(self)) } else { Ok(Step::Done(false)) }
  }

  fn finish(self) -> Result<bool, Err> { Ok(true) }
}

pub struct IsEmpty;

impl<Item, Err> ScalarStrategy<Item, Err> for IsEmpty {
  type Output = bool;

  fn step(self, _: Item) -> Result<Step<Self, bool>, Err> { Ok(Step::Done(false)) }

  fn finish(self) -> Result<bool, Err> { Ok(true) }
}

#[cfg(test)]
mod tests {
  use crate::{
    notification::{Notification, Recorder},
    prelude::*,
  };

  #[rxcore_macro::test]
  fn any_stops_at_first_match() {
    let mut seen = vec![];
    let recorder = Recorder::<bool, ()>::new();
    observable::from_iter([-2, 3, -4])
      .any_with(|v| {
        seen.push(*v);
        *v > 0
      })
      .subscribe_with(recorder.clone());

    assert_eq!(seen, vec![-2, 3]);
    assert_eq!(recorder.notifications(), vec![Notification::Next(true), Notification::Completed]);
  }

  #[rxcore_macro::test]
  fn any_on_empty_is_false() {
    let recorder = Recorder::<bool, ()>::new();
    observable::empty::<i32, ()>().any().subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![false]);

    let recorder = Recorder::<bool, ()>::new();
    observable::of::<_, ()>(1).any().subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![true]);
  }

  #[rxcore_macro::test]
  fn failing_predicate_is_delivered() {
    let recorder = Recorder::<bool, &str>::new();
    observable::from_iter([1, 2, 3])
      .try_any(|v| if *v == 2 { Err("boom") } else { Ok(false) })
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.notifications(), vec![Notification::Error("boom")]);
  }

  #[rxcore_macro::test]
  fn all_stops_at_first_failure() {
    let mut seen = 0;
    let recorder = Recorder::<bool, ()>::new();
    observable::from_iter([2, 4, 5, 6])
      .all(|v| {
        seen += 1;
        v % 2 == 0
      })
      .subscribe_with(recorder.clone());
    assert_eq!(seen, 3);
    assert_eq!(recorder.values(), vec![false]);

    let recorder = Recorder::<bool, ()>::new();
    observable::empty::<i32, ()>().all(|_| false).subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![true]);
  }

  #[rxcore_macro::test]
  fn try_all_passes_through() {
    let recorder = Recorder::<bool, String>::new();
    observable::from_iter([1, 2]).try_all(|v| Ok(*v > 0)).subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![true]);
  }

  #[rxcore_macro::test]
  fn is_empty() {
    let recorder = Recorder::<bool, ()>::new();
    observable::never::<i32, ()>().is_empty().subscribe_with(recorder.clone());
    assert!(recorder.is_empty());

    observable::of::<_, ()>(1).is_empty().subscribe_with(recorder.clone());
    observable::empty::<i32, ()>().is_empty().subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![false, true]);
  }
}
