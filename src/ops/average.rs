use crate::{
  error::RxError,
  ops::scalar::{ScalarStrategy, Step},
};

/// Element types with an arithmetic mean.
///
/// | Element | Result | Empty |
/// |---|---|---|
/// | integers up to 64 bits | `f64`, summed in `i128` | `NoElements` |
/// | `f32` | `f32`, summed in `f64` | `NoElements` |
/// | `f64` | `f64` | `NoElements` |
/// | `Option<T>` | `Option<T::Output>`, `None` skipped | `None` |
pub trait Averageable: Sized {
  type Acc: Default;
  type Output;

  /// Fold one element; `None` on overflow.
  fn accumulate(acc: Self::Acc, item: Self) -> Option<Self::Acc>;

  fn mean(acc: Self::Acc) -> Result<Self::Output, RxError>;
}

/// Running sum and element count.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mean<S> {
  sum: S,
  count: u64,
}

macro_rules! impl_average_int {
  ($($t:ty),*) => {$(
    impl Averageable for $t {
      type Acc = Mean<i128>;
      type Output = f64;

      fn accumulate(acc: Mean<i128>, item: Self) -> Option<Mean<i128>> {
        Some(Mean { sum: acc.sum.checked_add(item as i128)?, count: acc.count.checked_add(1)? })
      }

      fn mean(acc: Mean<i128>) -> Result<f64, RxError> {
        if acc.count == 0 {
          return Err(RxError::NoElements);
        }
        Ok(acc.sum as f64 / acc.count as f64)
      }
    }
  )*};
}

impl_average_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Averageable for f32 {
  type Acc = Mean<f64>;
  type Output = f32;

  fn accumulate(acc: Mean<f64>, item: Self) -> Option<Mean<f64>> {
    Some(Mean { sum: acc.sum + f64::from(item), count: acc.count.checked_add(1)? })
  }

  fn mean(acc: Mean<f64>) -> Result<f32, RxError> {
    if acc.count == 0 {
      return Err(RxError::NoElements);
    }
    Ok((acc.sum / acc.count as f64) as f32)
  }
}

impl Averageable for f64 {
  type Acc = Mean<f64>;
  type Output = f64;

  fn accumulate(acc: Mean<f64>, item: Self) -> Option<Mean<f64>> {
    Some(Mean { sum: acc.sum + item, count: acc.count.checked_add(1)? })
  }

  fn mean(acc: Mean<f64>) -> Result<f64, RxError> {
    if acc.count == 0 {
      return Err(RxError::NoElements);
    }
    Ok(acc.sum / acc.count as f64)
  }
}

impl<T: Averageable> Averageable for Option<T> {
  type Acc = T::Acc;
  type Output = Option<T::Output>;

  fn accumulate(acc: T::Acc, item: Self) -> Option<T::Acc> {
    match item {
      Some(v) => T::accumulate(acc, v),
      None => Some(acc),
    }
  }

  fn mean(acc: T::Acc) -> Result<Self::Output, RxError> {
    match T::mean(acc) {
      Ok(v) => Ok(Some(v)),
      Err(RxError::NoElements) => Ok(None),
      Err(e) => Err(e),
    }
  }
}

pub struct Average<T: Averageable> {
  acc: T::Acc,
}

impl<T: Averageable> Average<T> {
  pub fn new() -> Self { Self { acc: T::Acc::default() } }
}

impl<T: Averageable> Default for Average<T> {
  fn default() -> Self { Self::new() }
}

impl<T, Err> ScalarStrategy<T, Err> for Average<T>
where
  T: Averageable,
  Err: From<RxError>,
{
  type Output = T::Output;

  fn step(self, item: T) -> Result<Step<Self, T::Output>, Err> {
    let acc = T::accumulate(self.acc, item).ok_or(RxError::Overflow)?;
    Ok(Step::Continue(Self { acc }))
  }

  fn finish(self) -> Result<T::Output, Err> { T::mean(self.acc).map_err(Err::from) }
}
