use std::marker::PhantomData;

use crate::{
  observable::{CoreObservable, ObservableType},
  observer::Observer,
};

/// Creates an observable that completes without emitting.
pub fn empty<Item, Err>() -> Empty<Item, Err> { Empty(PhantomData) }

/// Creates an observable that never emits, completes or fails.
pub fn never<Item, Err>() -> Never<Item, Err> { Never(PhantomData) }

/// Creates an observable that emits no items, just terminates with an error.
pub fn throw_err<Item, Err>(err: Err) -> Throw<Item, Err> { Throw(err, PhantomData) }

pub struct Empty<Item, Err>(PhantomData<fn() -> (Item, Err)>);

pub struct Never<Item, Err>(PhantomData<fn() -> (Item, Err)>);

pub struct Throw<Item, Err>(Err, PhantomData<fn() -> Item>);

impl<Item, Err> Clone for Empty<Item, Err> {
  fn clone(&self) -> Self { Self(PhantomData) }
}

impl<Item, Err> Clone for Never<Item, Err> {
  fn clone(&self) -> Self { Self(PhantomData) }
}

impl<Item, Err: Clone> Clone for Throw<Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone(), PhantomData) }
}

impl<Item, Err> ObservableType for Empty<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err> ObservableType for Never<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err> ObservableType for Throw<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err, O> CoreObservable<O> for Empty<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.complete() }
}

impl<Item, Err, O> CoreObservable<O> for Never<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, _observer: O) -> Self::Unsub {}
}

impl<Item, Err, O> CoreObservable<O> for Throw<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.error(self.0) }
}
