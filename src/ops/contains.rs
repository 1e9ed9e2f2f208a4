use crate::ops::{
  callback::Comparer,
  scalar::{ScalarStrategy, Step},
};

/// `true` at the first element equal to `value` under `eq`.
pub struct Contains<T, F> {
  value: T,
  eq: F,
}

impl<T, F> Contains<T, F> {
  pub fn new(value: T, eq: F) -> Self { Self { value, eq } }
}

impl<Item, Err, T, F> ScalarStrategy<Item, Err> for Contains<T, F>
where
  F: Comparer<Item, T, Err, Output = bool>,
{
  type Output = bool;

  fn step(mut self, item: Item) -> Result<Step<Self, bool>, Err> {
    if self.eq.compare(&item, &self.value)? {
      Ok(Step::Done(true))
    } else {
      Ok(Step::Continue(self))
    }
  }

  fn finish(self) -> Result<bool, Err> { Ok(false) }
}

#[cfg(test)]
mod tests {
  use crate::{
    notification::{Notification, Recorder},
    prelude::*,
  };

  #[rxcore_macro::test]
  fn finds_value() {
    let recorder = Recorder::<bool, ()>::new();
    observable::from_iter(["a", "b", "c"]).contains("b").subscribe_with(recorder.clone());
    observable::from_iter(["a", "b", "c"]).contains("z").subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![true, false]);
  }

  #[rxcore_macro::test]
  fn custom_equality() {
    let recorder = Recorder::<bool, ()>::new();
    observable::from_iter(["Apple", "Pear"])
      .contains_by("PEAR".to_string(), |item, value| item.eq_ignore_ascii_case(value))
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![true]);
  }

  #[rxcore_macro::test]
  fn failing_equality() {
    let recorder = Recorder::<bool, &str>::new();
    observable::from_iter([Some(1), None, Some(3)])
      .try_contains_by(3, |item, value| item.map(|v| v == *value).ok_or("missing value"))
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.notifications(), vec![Notification::Error("missing value")]);
  }
}
