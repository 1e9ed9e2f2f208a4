use crate::ops::scalar::{Fallback, ScalarStrategy, Step};

/// The first element; `Fb` decides what an empty source yields.
pub struct First<Fb> {
  fallback: Fb,
}

impl<Fb> First<Fb> {
  pub fn new(fallback: Fb) -> Self { Self { fallback } }
}

impl<Item, Err, Fb> ScalarStrategy<Item, Err> for First<Fb>
where
  Fb: Fallback<Item, Err>,
{
  type Output = Item;

  #[inline]
  fn step(self, item: Item) -> Result<Step<Self, Item>, Err> { Ok(Step::Done(item)) }

  fn finish(self) -> Result<Item, Err> { self.fallback.fallback() }
}

#[cfg(test)]
mod tests {
  use crate::{
    notification::{Notification, Recorder},
    prelude::*,
  };

  #[rxcore_macro::test]
  fn takes_first_and_releases_source() {
    let recorder = Recorder::<i32, RxError>::new();
    let mut subject = Subject::<i32, RxError>::new();
    subject.clone().first().subscribe_with(recorder.clone());

    subject.next(7);
    assert_eq!(subject.observer_count(), 0);
    subject.next(8);
    assert_eq!(recorder.notifications(), vec![Notification::Next(7), Notification::Completed]);
  }

  #[rxcore_macro::test]
  fn empty() {
    let recorder = Recorder::<i32, RxError>::new();
    observable::empty::<i32, RxError>().first().subscribe_with(recorder.clone());
    assert_eq!(recorder.notifications(), vec![Notification::Error(RxError::NoElements)]);

    let recorder = Recorder::<i32, ()>::new();
    observable::empty::<i32, ()>().first_or_default().subscribe_with(recorder.clone());
    assert_eq!(recorder.notifications(), vec![Notification::Next(0), Notification::Completed]);
  }
}
