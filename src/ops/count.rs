use crate::{
  error::RxError,
  ops::{
    callback::Selector,
    scalar::{ScalarStrategy, Step},
  },
};

/// Counts the elements matching a predicate. Fails with `Overflow` if the
/// count no longer fits in `usize`.
pub struct Count<P> {
  count: usize,
  predicate: P,
}

impl<P> Count<P> {
  pub fn new(predicate: P) -> Self { Self { count: 0, predicate } }
}

impl<Item, Err, P> ScalarStrategy<Item, Err> for Count<P>
where
  P: Selector<Item, Err, Output = bool>,
  Err: From<RxError>,
{
  type Output = usize;

  fn step(mut self, item: Item) -> Result<Step<Self, usize>, Err> {
    if self.predicate.select(&item)? {
      self.count = self.count.checked_add(1).ok_or(RxError::Overflow)?;
    }
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<usize, Err> { Ok(self.count) }
}
