use crate::ops::scalar::{Fallback, ScalarStrategy, Step};

/// The element at a zero-based index; `Fb` decides what a source that
/// completes before reaching it yields.
pub struct ElementAt<Fb> {
  remaining: usize,
  fallback: Fb,
}

impl<Fb> ElementAt<Fb> {
  pub fn new(index: usize, fallback: Fb) -> Self { Self { remaining: index, fallback } }
}

impl<Item, Err, Fb> ScalarStrategy<Item, Err> for ElementAt<Fb>
where
  Fb: Fallback<Item, Err>,
{
  type Output = Item;

  fn step(mut self, item: Item) -> Result<Step<Self, Item>, Err> {
    if self.remaining == 0 {
      return Ok(Step::Done(item));
    }
    self.remaining -= 1;
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<Item, Err> { self.fallback.fallback() }
}
