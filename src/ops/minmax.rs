//! `min`, `max` and their comparer and key-selector forms.
//!
//! Ties keep the element seen first. [`Extremum`] decides, per element type,
//! how elements compare and what an empty source yields: plain values fail
//! with `NoElements`, while `Option<T>` skips `None` and yields `None` when
//! nothing was left to compare.

use std::{cmp::Ordering, time::Duration};

use crate::{
  error::RxError,
  ops::{
    callback::{Comparer, Selector},
    scalar::{ScalarStrategy, Step},
  },
};

pub trait Extremum: Sized {
  /// What actually gets compared.
  type Value;
  type Output;

  /// `None` skips the element.
  fn into_value(self) -> Option<Self::Value>;

  fn compare(a: &Self::Value, b: &Self::Value) -> Ordering;

  /// The result for the best value seen, `None` if there was none.
  fn finish(best: Option<Self::Value>) -> Result<Self::Output, RxError>;
}

macro_rules! impl_extremum_ord {
  ($($t:ty),*) => {$(
    impl Extremum for $t {
      type Value = Self;
      type Output = Self;

      #[inline]
      fn into_value(self) -> Option<Self> { Some(self) }

      #[inline]
      fn compare(a: &Self, b: &Self) -> Ordering { a.cmp(b) }

      fn finish(best: Option<Self>) -> Result<Self, RxError> { best.ok_or(RxError::NoElements) }
    }
  )*};
}

impl_extremum_ord!(
  i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char, bool, String, Duration
);

impl<'a> Extremum for &'a str {
  type Value = Self;
  type Output = Self;

  fn into_value(self) -> Option<Self> { Some(self) }

  fn compare(a: &Self, b: &Self) -> Ordering { a.cmp(b) }

  fn finish(best: Option<Self>) -> Result<Self, RxError> { best.ok_or(RxError::NoElements) }
}

// NaN orders below every number, so `min` returns NaN if there is one and
// `max` ignores it unless every element is NaN.
macro_rules! impl_extremum_float {
  ($($t:ty),*) => {$(
    impl Extremum for $t {
      type Value = Self;
      type Output = Self;

      #[inline]
      fn into_value(self) -> Option<Self> { Some(self) }

      fn compare(a: &Self, b: &Self) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
          (true, true) => Ordering::Equal,
          (true, false) => Ordering::Less,
          (false, true) => Ordering::Greater,
          (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        }
      }

      fn finish(best: Option<Self>) -> Result<Self, RxError> { best.ok_or(RxError::NoElements) }
    }
  )*};
}

impl_extremum_float!(f32, f64);

impl<T: Extremum> Extremum for Option<T> {
  type Value = T::Value;
  type Output = Option<T::Output>;

  fn into_value(self) -> Option<T::Value> { self.and_then(T::into_value) }

  fn compare(a: &T::Value, b: &T::Value) -> Ordering { T::compare(a, b) }

  fn finish(best: Option<T::Value>) -> Result<Self::Output, RxError> {
    match best {
      Some(v) => T::finish(Some(v)).map(Some),
      None => Ok(None),
    }
  }
}

// ==================== Extreme ====================

/// `min` / `max` over an [`Extremum`] element type.
pub struct Extreme<T: Extremum> {
  best: Option<T::Value>,
  replace_when: Ordering,
}

impl<T: Extremum> Extreme<T> {
  pub fn min() -> Self { Self { best: None, replace_when: Ordering::Less } }

  pub fn max() -> Self { Self { best: None, replace_when: Ordering::Greater } }
}

impl<T, Err> ScalarStrategy<T, Err> for Extreme<T>
where
  T: Extremum,
  Err: From<RxError>,
{
  type Output = T::Output;

  fn step(mut self, item: T) -> Result<Step<Self, T::Output>, Err> {
    if let Some(value) = item.into_value() {
      let replace = match &self.best {
        Some(best) => T::compare(&value, best) == self.replace_when,
        None => true,
      };
      if replace {
        self.best = Some(value);
      }
    }
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<T::Output, Err> { T::finish(self.best).map_err(Err::from) }
}

// ==================== ExtremeBy ====================

/// `min_by_cmp` / `max_by_cmp`: the first best element under a comparer.
pub struct ExtremeBy<Item, F> {
  best: Option<Item>,
  cmp: F,
  replace_when: Ordering,
}

impl<Item, F> ExtremeBy<Item, F> {
  pub fn min(cmp: F) -> Self { Self { best: None, cmp, replace_when: Ordering::Less } }

  pub fn max(cmp: F) -> Self { Self { best: None, cmp, replace_when: Ordering::Greater } }
}

impl<Item, Err, F> ScalarStrategy<Item, Err> for ExtremeBy<Item, F>
where
  F: Comparer<Item, Item, Err, Output = Ordering>,
  Err: From<RxError>,
{
  type Output = Item;

  fn step(mut self, item: Item) -> Result<Step<Self, Item>, Err> {
    let replace = match &self.best {
      Some(best) => self.cmp.compare(&item, best)? == self.replace_when,
      None => true,
    };
    if replace {
      self.best = Some(item);
    }
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<Item, Err> { self.best.ok_or_else(|| RxError::NoElements.into()) }
}

// ==================== ExtremaBy ====================

/// `min_by` / `max_by`: every element sharing the best key.
pub struct ExtremaBy<Item, K, F> {
  best: Option<K>,
  items: Vec<Item>,
  key: F,
  replace_when: Ordering,
}

impl<Item, K, F> ExtremaBy<Item, K, F> {
  pub fn min(key: F) -> Self {
    Self { best: None, items: Vec::new(), key, replace_when: Ordering::Less }
  }

  pub fn max(key: F) -> Self {
    Self { best: None, items: Vec::new(), key, replace_when: Ordering::Greater }
  }
}

impl<Item, Err, K, F> ScalarStrategy<Item, Err> for ExtremaBy<Item, K, F>
where
  K: Ord,
  F: Selector<Item, Err, Output = K>,
{
  type Output = Vec<Item>;

  fn step(mut self, item: Item) -> Result<Step<Self, Vec<Item>>, Err> {
    let key = self.key.select(&item)?;
    let ordering = match &self.best {
      Some(best) => key.cmp(best),
      None => self.replace_when,
    };
    if ordering == self.replace_when {
      self.best = Some(key);
      self.items.clear();
      self.items.push(item);
    } else if ordering == Ordering::Equal {
      self.items.push(item);
    }
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<Vec<Item>, Err> { Ok(self.items) }
}
