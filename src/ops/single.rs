use crate::{
  error::RxError,
  ops::scalar::{Fallback, ScalarStrategy, Step},
};

/// The only element. A second element fails with `MoreThanOneElement` right
/// away; `Fb` decides what an empty source yields.
pub struct Single<Item, Fb> {
  seen: Option<Item>,
  fallback: Fb,
}

impl<Item, Fb> Single<Item, Fb> {
  pub fn new(fallback: Fb) -> Self { Self { seen: None, fallback } }
}

impl<Item, Err, Fb> ScalarStrategy<Item, Err> for Single<Item, Fb>
where
  Fb: Fallback<Item, Err>,
  Err: From<RxError>,
{
  type Output = Item;

  fn step(mut self, item: Item) -> Result<Step<Self, Item>, Err> {
    if self.seen.is_some() {
      return Err(RxError::MoreThanOneElement.into());
    }
    self.seen = Some(item);
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<Item, Err> {
    match self.seen {
      Some(item) => Ok(item),
      None => self.fallback.fallback(),
    }
  }
}
