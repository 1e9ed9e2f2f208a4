use crate::{
  error::RxError,
  ops::{
    callback::{Finisher, Folder},
    scalar::{ScalarStrategy, Step},
  },
};

/// Seedless fold: the first element is the initial accumulator.
pub struct Aggregate<Item, F> {
  acc: Option<Item>,
  f: F,
}

impl<Item, F> Aggregate<Item, F> {
  pub fn new(f: F) -> Self { Self { acc: None, f } }
}

impl<Item, Err, F> ScalarStrategy<Item, Err> for Aggregate<Item, F>
where
  F: Folder<Item, Item, Err, Output = Item>,
  Err: From<RxError>,
{
  type Output = Item;

  fn step(mut self, item: Item) -> Result<Step<Self, Item>, Err> {
    let acc = match self.acc.take() {
      Some(acc) => self.f.fold(acc, item)?,
      None => item,
    };
    self.acc = Some(acc);
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<Item, Err> { self.acc.ok_or_else(|| RxError::NoElements.into()) }
}

/// Seeded fold with a final projection of the accumulator.
pub struct AggregateWith<Acc, F, R> {
  acc: Acc,
  f: F,
  result: R,
}

impl<Acc, F, R> AggregateWith<Acc, F, R> {
  pub fn new(seed: Acc, f: F, result: R) -> Self { Self { acc: seed, f, result } }
}

impl<Item, Err, Acc, F, R> ScalarStrategy<Item, Err> for AggregateWith<Acc, F, R>
where
  F: Folder<Acc, Item, Err, Output = Acc>,
  R: Finisher<Acc, Err>,
{
  type Output = R::Output;

  fn step(self, item: Item) -> Result<Step<Self, R::Output>, Err> {
    let Self { acc, mut f, result } = self;
    let acc = f.fold(acc, item)?;
    Ok(Step::Continue(Self { acc, f, result }))
  }

  fn finish(self) -> Result<R::Output, Err> { self.result.apply(self.acc) }
}

#[cfg(test)]
mod tests {
  use crate::{
    notification::{Notification, Recorder},
    prelude::*,
  };

  #[rxcore_macro::test]
  fn seedless_folds_from_first_element() {
    let recorder = Recorder::<i32, RxError>::new();
    observable::from_iter([1, 2, 3, 4])
      .aggregate(|acc, v| acc * 10 + v)
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![1234]);
  }

  #[rxcore_macro::test]
  fn seedless_on_empty_fails() {
    let recorder = Recorder::<i32, RxError>::new();
    observable::empty::<i32, RxError>()
      .aggregate(|acc, v| acc + v)
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.notifications(), vec![Notification::Error(RxError::NoElements)]);
  }

  #[rxcore_macro::test]
  fn seeded_on_empty_yields_seed() {
    let recorder = Recorder::<i32, ()>::new();
    observable::empty::<i32, ()>()
      .aggregate_seeded(42, |acc, v| acc + v)
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.notifications(), vec![Notification::Next(42), Notification::Completed]);
  }

  #[rxcore_macro::test]
  fn result_selector_maps_accumulator() {
    let recorder = Recorder::<String, ()>::new();
    observable::from_iter(["a", "b", "c"])
      .aggregate_with(
        String::new(),
        |mut acc, v| {
          acc.push_str(v);
          acc
        },
        |acc| acc.to_uppercase(),
      )
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec!["ABC".to_string()]);
  }

  #[rxcore_macro::test]
  fn failing_accumulator_stops_the_fold() {
    let recorder = Recorder::<i32, String>::new();
    let mut calls = 0;
    observable::from_iter([1, 2, 3, 4])
      .try_aggregate_seeded(0, |acc, v| {
        calls += 1;
        if v == 3 { Err(format!("bad {v}")) } else { Ok(acc + v) }
      })
      .subscribe_with(recorder.clone());

    assert_eq!(calls, 3);
    assert_eq!(recorder.notifications(), vec![Notification::Error("bad 3".to_string())]);
  }

  #[rxcore_macro::test]
  fn seedless_failing_accumulator() {
    let recorder = Recorder::<i32, RxError>::new();
    observable::from_iter([1, 2, 3])
      .try_aggregate(|acc: i32, v| acc.checked_mul(v * 1_000_000).ok_or(RxError::Overflow))
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.notifications(), vec![Notification::Error(RxError::Overflow)]);
  }

  #[rxcore_macro::test]
  fn failing_result_selector() {
    let recorder = Recorder::<u8, String>::new();
    observable::from_iter([100, 200])
      .try_aggregate_with(
        0u32,
        |acc, v| Ok(acc + v),
        |acc| u8::try_from(acc).map_err(|_| format!("{acc} does not fit")),
      )
      .subscribe_with(recorder.clone());
    assert_eq!(recorder.err(), Some("300 does not fit".to_string()));
  }
}
