use crate::{
  error::RxError,
  ops::scalar::{ScalarStrategy, Step},
};

/// Element types that can be summed with overflow detection.
pub trait CheckedSum: Sized {
  fn zero() -> Self;

  /// `None` if the addition overflows.
  fn checked_sum(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_checked_sum_int {
  ($($t:ty),*) => {$(
    impl CheckedSum for $t {
      #[inline]
      fn zero() -> Self { 0 }

      #[inline]
      fn checked_sum(self, rhs: Self) -> Option<Self> { self.checked_add(rhs) }
    }
  )*};
}

impl_checked_sum_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

// Floats saturate to infinity instead of overflowing.
macro_rules! impl_checked_sum_float {
  ($($t:ty),*) => {$(
    impl CheckedSum for $t {
      #[inline]
      fn zero() -> Self { 0.0 }

      #[inline]
      fn checked_sum(self, rhs: Self) -> Option<Self> { Some(self + rhs) }
    }
  )*};
}

impl_checked_sum_float!(f32, f64);

/// `None` elements are skipped; the sum is always `Some`, starting at zero.
impl<T: CheckedSum> CheckedSum for Option<T> {
  fn zero() -> Self { Some(T::zero()) }

  fn checked_sum(self, rhs: Self) -> Option<Self> {
    match (self, rhs) {
      (Some(acc), Some(v)) => acc.checked_sum(v).map(Some),
      (acc, None) => Some(acc),
      (None, v) => Some(v),
    }
  }
}

pub struct Sum<T> {
  total: T,
}

impl<T: CheckedSum> Sum<T> {
  pub fn new() -> Self { Self { total: T::zero() } }
}

impl<T: CheckedSum> Default for Sum<T> {
  fn default() -> Self { Self::new() }
}

impl<T, Err> ScalarStrategy<T, Err> for Sum<T>
where
  T: CheckedSum,
  Err: From<RxError>,
{
  type Output = T;

  fn step(self, item: T) -> Result<Step<Self, T>, Err> {
    let total = self.total.checked_sum(item).ok_or(RxError::Overflow)?;
    Ok(Step::Continue(Self { total }))
  }

  fn finish(self) -> Result<T, Err> { Ok(self.total) }
}

#[cfg(test)]
mod tests {
  use float_cmp::approx_eq;

  use crate::{
    notification::{Notification, Recorder},
    prelude::*,
  };

  #[rxcore_macro::test]
  fn sums_integers() {
    let recorder = Recorder::<u64, RxError>::new();
    observable::from_iter(1..=100u64).sum().subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![5050]);
  }

  #[rxcore_macro::test]
  fn empty_sum_is_zero() {
    let recorder = Recorder::<i32, RxError>::new();
    observable::empty::<i32, RxError>().sum().subscribe_with(recorder.clone());
    assert_eq!(recorder.notifications(), vec![Notification::Next(0), Notification::Completed]);
  }

  #[rxcore_macro::test]
  fn overflow_stops_at_the_offending_element() {
    let mut pulled = 0;
    let recorder = Recorder::<i32, RxError>::new();
    observable::from_iter([i32::MAX, 1, 2].into_iter().inspect(|_| pulled += 1))
      .sum()
      .subscribe_with(recorder.clone());

    assert_eq!(pulled, 2);
    assert_eq!(recorder.notifications(), vec![Notification::Error(RxError::Overflow)]);
  }

  #[rxcore_macro::test]
  fn sums_floats() {
    let recorder = Recorder::<f64, RxError>::new();
    observable::from_iter([0.1, 0.2, 0.3]).sum().subscribe_with(recorder.clone());
    assert!(approx_eq!(f64, recorder.values()[0], 0.6, ulps = 2));
  }

  #[rxcore_macro::test]
  fn skips_none() {
    let recorder = Recorder::<Option<i32>, RxError>::new();
    observable::from_iter([Some(1), None, Some(4)]).sum().subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![Some(5)]);

    let recorder = Recorder::<Option<i32>, RxError>::new();
    observable::from_iter([None::<i32>, None]).sum().subscribe_with(recorder.clone());
    assert_eq!(recorder.values(), vec![Some(0)]);
  }
}
