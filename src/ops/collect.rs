use std::{
  collections::{hash_map::Entry, HashMap},
  hash::Hash,
};

use crate::{
  error::RxError,
  ops::{
    callback::{Projector, Selector},
    scalar::{ScalarStrategy, Step},
  },
};

pub struct ToVec<Item> {
  items: Vec<Item>,
}

impl<Item> Default for ToVec<Item> {
  fn default() -> Self { Self { items: Vec::new() } }
}

impl<Item, Err> ScalarStrategy<Item, Err> for ToVec<Item> {
  type Output = Vec<Item>;

  fn step(mut self, item: Item) -> Result<Step<Self, Vec<Item>>, Err> {
    self.items.push(item);
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<Vec<Item>, Err> { Ok(self.items) }
}

/// Collects into a `HashMap`; a repeated key fails with `DuplicateKey`.
pub struct ToMap<K, V, KF, VF> {
  map: HashMap<K, V>,
  key: KF,
  element: VF,
}

impl<K, V, KF, VF> ToMap<K, V, KF, VF> {
  pub fn new(key: KF, element: VF) -> Self { Self { map: HashMap::new(), key, element } }
}

impl<Item, Err, K, V, KF, VF> ScalarStrategy<Item, Err> for ToMap<K, V, KF, VF>
where
  K: Eq + Hash,
  KF: Selector<Item, Err, Output = K>,
  VF: Projector<Item, Err, Output = V>,
  Err: From<RxError>,
{
  type Output = HashMap<K, V>;

  fn step(mut self, item: Item) -> Result<Step<Self, HashMap<K, V>>, Err> {
    match self.map.entry(self.key.select(&item)?) {
      Entry::Occupied(_) => return Err(RxError::DuplicateKey.into()),
      Entry::Vacant(slot) => {
        slot.insert(self.element.project(item)?);
      }
    }
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<HashMap<K, V>, Err> { Ok(self.map) }
}

/// Groups elements by key, keeping encounter order inside each group.
pub struct ToLookup<K, Item, KF> {
  groups: HashMap<K, Vec<Item>>,
  key: KF,
}

impl<K, Item, KF> ToLookup<K, Item, KF> {
  pub fn new(key: KF) -> Self { Self { groups: HashMap::new(), key } }
}

impl<Item, Err, K, KF> ScalarStrategy<Item, Err> for ToLookup<K, Item, KF>
where
  K: Eq + Hash,
  KF: Selector<Item, Err, Output = K>,
{
  type Output = HashMap<K, Vec<Item>>;

  fn step(mut self, item: Item) -> Result<Step<Self, Self::Output>, Err> {
    let key = self.key.select(&item)?;
    self.groups.entry(key).or_default().push(item);
    Ok(Step::Continue(self))
  }

  fn finish(self) -> Result<Self::Output, Err> { Ok(self.groups) }
}
