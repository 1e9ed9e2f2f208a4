use crate::ops::scalar::{Fallback, ScalarStrategy, Step};

/// The last element; `Fb` decides what an empty source yields.
pub struct Last<Item, Fb> {
  last: Option<Item>,
  fallback: Fb,
}

impl<Item, Fb> Last<Item, Fb> {
  pub fn new(fallback: Fb) -> Self { Self { last: None, fallback } }
}

impl<Item, Err, Fb> ScalarStrategy<Item, Err> for Last<Item, Fb>
where
  Fb: Fallback<Item, Err>,
{
  type Output = Item;

  fn step(mut self, item: Item) -> Result<Step<Self, Item>, Err> {
    self.last = Some(item);
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<Item, Err> {
    match self.last {
      Some(last) => Ok(last),
      None => self.fallback.fallback(),
    }
  }
}
