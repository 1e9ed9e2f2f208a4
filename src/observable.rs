//! Observable traits and source factories.
//!
//! The observable side is split in three traits:
//!
//! - [`ObservableType`] declares the `Item` and `Err` a source produces;
//! - [`CoreObservable<O>`] binds a concrete observer `O` and returns the
//!   subscription;
//! - [`Observable`] is the user-facing extension trait, implemented for every
//!   [`ObservableType`], carrying `subscribe` and the operators.
//!
//! # Example
//!
//! ```rust
//! use rxcore::prelude::*;
//!
//! let recorder = Recorder::<bool, RxError>::new();
//! observable::from_iter([-2, 3, -4]).any_with(|v| *v > 0).subscribe_with(recorder.clone());
//! assert_eq!(recorder.values(), vec![true]);
//! ```

mod create;
mod from_iter;
mod timeline;
mod trivial;

use std::{cmp::Ordering, convert::Infallible, hash::Hash};

pub use create::*;
pub use from_iter::*;
pub use timeline::*;
pub use trivial::*;

use crate::{
  error::RxError,
  observer::{FnMutObserver, Observer},
  ops::{
    aggregate::{Aggregate, AggregateWith},
    any::{All, Any, IsEmpty},
    average::{Average, Averageable},
    callback::{Fallible, Plain},
    collect::{ToLookup, ToMap, ToVec},
    contains::Contains,
    count::Count,
    element_at::ElementAt,
    first::First,
    into_future::{FutureObserver, ObservableFuture},
    last::Last,
    lifecycle::{OnComplete, OnError},
    minmax::{ExtremaBy, Extreme, ExtremeBy, Extremum},
    scalar::{OrDefault, Require, Scalar, ScalarStrategy},
    sequence_equal::SequenceEqual,
    serialize::Serialize,
    single::Single,
    sum::{CheckedSum, Sum},
  },
  subscription::Subscription,
};

/// The item and error types a source produces.
pub trait ObservableType {
  type Item;
  type Err;
}

/// Binds an observer of type `O` to a source.
pub trait CoreObservable<O>: ObservableType {
  type Unsub: Subscription;

  /// Start the source. Synchronous sources may deliver everything, terminal
  /// notification included, before this returns.
  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// User-facing API of every observable.
pub trait Observable: ObservableType + Sized {
  /// Subscribe a closure as the `next` handler.
  ///
  /// Only available for sources that cannot fail; handle errors first with
  /// [`on_error`](Observable::on_error).
  fn subscribe<F>(self, next: F) -> <Self as CoreObservable<FnMutObserver<F>>>::Unsub
  where
    F: FnMut(Self::Item),
    Self: CoreObservable<FnMutObserver<F>, Err = Infallible>,
  {
    self.actual_subscribe(FnMutObserver(next))
  }

  /// Subscribe a full observer.
  fn subscribe_with<O>(self, observer: O) -> <Self as CoreObservable<O>>::Unsub
  where
    O: Observer<Self::Item, Self::Err>,
    Self: CoreObservable<O>,
  {
    self.actual_subscribe(observer)
  }

  /// Deliver every notification through a
  /// [`SerializedObserver`](crate::observer::SerializedObserver), so
  /// concurrent or reentrant producers reach the observer one at a time.
  fn serialize(self) -> Serialize<Self> { Serialize::new(self) }

  /// Run `f` on error. The resulting stream cannot fail.
  fn on_error<F>(self, f: F) -> OnError<Self, F>
  where
    F: FnOnce(Self::Err),
  {
    OnError::new(self, f)
  }

  /// Run `f` right before completion is forwarded.
  fn on_complete<F>(self, f: F) -> OnComplete<Self, F>
  where
    F: FnOnce(),
  {
    OnComplete::new(self, f)
  }

  /// Resolve to the single value this observable emits.
  ///
  /// Resolves to `NoElements` if it completes empty and to
  /// `MoreThanOneElement` if a second value arrives. Dropping the future
  /// unsubscribes.
  #[allow(clippy::type_complexity)]
  fn into_future(self) -> ObservableFuture<Self::Item, Self::Err>
  where
    <Self as ObservableType>::Err: From<RxError>,
    Self: CoreObservable<
      FutureObserver<<Self as ObservableType>::Item, <Self as ObservableType>::Err>,
    >,
    <Self as CoreObservable<
      FutureObserver<<Self as ObservableType>::Item, <Self as ObservableType>::Err>,
    >>::Unsub: Send + 'static,
  {
    ObservableFuture::new(self)
  }

  // ==================== Generic scalar entry point ====================

  /// Reduce the source with a custom [`ScalarStrategy`].
  fn scalar<St>(self, strategy: St) -> Scalar<Self, St>
  where
    St: ScalarStrategy<Self::Item, Self::Err>,
  {
    Scalar::new(self, strategy)
  }

  // ==================== Aggregate ====================

  /// Fold the source with `f`, starting from its first element. Fails with
  /// `NoElements` on an empty source.
  fn aggregate<F>(self, f: F) -> Scalar<Self, Aggregate<Self::Item, Plain<F>>>
  where
    F: FnMut(Self::Item, Self::Item) -> Self::Item,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Aggregate::new(Plain(f)))
  }

  /// [`aggregate`](Observable::aggregate) with a fallible accumulator.
  fn try_aggregate<F>(self, f: F) -> Scalar<Self, Aggregate<Self::Item, Fallible<F>>>
  where
    F: FnMut(Self::Item, Self::Item) -> Result<Self::Item, Self::Err>,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Aggregate::new(Fallible(f)))
  }

  /// Fold the source into `seed`. An empty source yields `seed`.
  #[allow(clippy::type_complexity)]
  fn aggregate_seeded<Acc, F>(
    self, seed: Acc, f: F,
  ) -> Scalar<Self, AggregateWith<Acc, Plain<F>, Plain<fn(Acc) -> Acc>>>
  where
    F: FnMut(Acc, Self::Item) -> Acc,
  {
    let identity: fn(Acc) -> Acc = std::convert::identity;
    Scalar::new(self, AggregateWith::new(seed, Plain(f), Plain(identity)))
  }

  /// Like [`aggregate_seeded`](Observable::aggregate_seeded) with a fallible
  /// accumulator; the first `Err` is delivered as the error notification.
  #[allow(clippy::type_complexity)]
  fn try_aggregate_seeded<Acc, F>(
    self, seed: Acc, f: F,
  ) -> Scalar<Self, AggregateWith<Acc, Fallible<F>, Plain<fn(Acc) -> Acc>>>
  where
    F: FnMut(Acc, Self::Item) -> Result<Acc, Self::Err>,
  {
    let identity: fn(Acc) -> Acc = std::convert::identity;
    Scalar::new(self, AggregateWith::new(seed, Fallible(f), Plain(identity)))
  }

  /// Fold the source into `seed`, then map the accumulator with `result`.
  fn aggregate_with<Acc, F, R, Out>(
    self, seed: Acc, f: F, result: R,
  ) -> Scalar<Self, AggregateWith<Acc, Plain<F>, Plain<R>>>
  where
    F: FnMut(Acc, Self::Item) -> Acc,
    R: FnOnce(Acc) -> Out,
  {
    Scalar::new(self, AggregateWith::new(seed, Plain(f), Plain(result)))
  }

  /// [`aggregate_with`](Observable::aggregate_with) where both the
  /// accumulator and the result selector may fail.
  fn try_aggregate_with<Acc, F, R, Out>(
    self, seed: Acc, f: F, result: R,
  ) -> Scalar<Self, AggregateWith<Acc, Fallible<F>, Fallible<R>>>
  where
    F: FnMut(Acc, Self::Item) -> Result<Acc, Self::Err>,
    R: FnOnce(Acc) -> Result<Out, Self::Err>,
  {
    Scalar::new(self, AggregateWith::new(seed, Fallible(f), Fallible(result)))
  }

  // ==================== Count / Sum / Average ====================

  fn count(self) -> Scalar<Self, Count<Plain<fn(&Self::Item) -> bool>>>
  where
    Self::Err: From<RxError>,
  {
    let always: fn(&Self::Item) -> bool = |_| true;
    Scalar::new(self, Count::new(Plain(always)))
  }

  /// Count the elements matching `predicate`.
  fn count_where<P>(self, predicate: P) -> Scalar<Self, Count<Plain<P>>>
  where
    P: FnMut(&Self::Item) -> bool,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Count::new(Plain(predicate)))
  }

  fn try_count_where<P>(self, predicate: P) -> Scalar<Self, Count<Fallible<P>>>
  where
    P: FnMut(&Self::Item) -> Result<bool, Self::Err>,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Count::new(Fallible(predicate)))
  }

  /// Checked sum; fails with `Overflow` at the element that overflows.
  fn sum(self) -> Scalar<Self, Sum<Self::Item>>
  where
    Self::Item: CheckedSum,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Sum::new())
  }

  /// Arithmetic mean; see [`Averageable`] for the result type per element
  /// type.
  fn average(self) -> Scalar<Self, Average<Self::Item>>
  where
    Self::Item: Averageable,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Average::new())
  }

  // ==================== Min / Max ====================

  /// The smallest element. The empty policy is decided by [`Extremum`].
  fn min(self) -> Scalar<Self, Extreme<Self::Item>>
  where
    Self::Item: Extremum,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Extreme::min())
  }

  /// The largest element. The empty policy is decided by [`Extremum`].
  fn max(self) -> Scalar<Self, Extreme<Self::Item>>
  where
    Self::Item: Extremum,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Extreme::max())
  }

  /// The first smallest element according to `cmp`; `NoElements` on empty.
  fn min_by_cmp<F>(self, cmp: F) -> Scalar<Self, ExtremeBy<Self::Item, Plain<F>>>
  where
    F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, ExtremeBy::min(Plain(cmp)))
  }

  /// The first largest element according to `cmp`; `NoElements` on empty.
  fn max_by_cmp<F>(self, cmp: F) -> Scalar<Self, ExtremeBy<Self::Item, Plain<F>>>
  where
    F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, ExtremeBy::max(Plain(cmp)))
  }

  fn try_min_by_cmp<F>(self, cmp: F) -> Scalar<Self, ExtremeBy<Self::Item, Fallible<F>>>
  where
    F: FnMut(&Self::Item, &Self::Item) -> Result<Ordering, Self::Err>,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, ExtremeBy::min(Fallible(cmp)))
  }

  fn try_max_by_cmp<F>(self, cmp: F) -> Scalar<Self, ExtremeBy<Self::Item, Fallible<F>>>
  where
    F: FnMut(&Self::Item, &Self::Item) -> Result<Ordering, Self::Err>,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, ExtremeBy::max(Fallible(cmp)))
  }

  /// Every element whose key is the smallest, in encounter order.
  fn min_by<K, F>(self, key: F) -> Scalar<Self, ExtremaBy<Self::Item, K, Plain<F>>>
  where
    K: Ord,
    F: FnMut(&Self::Item) -> K,
  {
    Scalar::new(self, ExtremaBy::min(Plain(key)))
  }

  /// Every element whose key is the largest, in encounter order.
  fn max_by<K, F>(self, key: F) -> Scalar<Self, ExtremaBy<Self::Item, K, Plain<F>>>
  where
    K: Ord,
    F: FnMut(&Self::Item) -> K,
  {
    Scalar::new(self, ExtremaBy::max(Plain(key)))
  }

  fn try_min_by<K, F>(self, key: F) -> Scalar<Self, ExtremaBy<Self::Item, K, Fallible<F>>>
  where
    K: Ord,
    F: FnMut(&Self::Item) -> Result<K, Self::Err>,
  {
    Scalar::new(self, ExtremaBy::min(Fallible(key)))
  }

  fn try_max_by<K, F>(self, key: F) -> Scalar<Self, ExtremaBy<Self::Item, K, Fallible<F>>>
  where
    K: Ord,
    F: FnMut(&Self::Item) -> Result<K, Self::Err>,
  {
    Scalar::new(self, ExtremaBy::max(Fallible(key)))
  }

  // ==================== Any / All / Contains ====================

  /// `true` as soon as the source emits anything.
  fn any(self) -> Scalar<Self, Any<Plain<fn(&Self::Item) -> bool>>> {
    let always: fn(&Self::Item) -> bool = |_| true;
    Scalar::new(self, Any::new(Plain(always)))
  }

  /// `true` at the first element matching `predicate`; the source is released
  /// right away.
  fn any_with<P>(self, predicate: P) -> Scalar<Self, Any<Plain<P>>>
  where
    P: FnMut(&Self::Item) -> bool,
  {
    Scalar::new(self, Any::new(Plain(predicate)))
  }

  fn try_any<P>(self, predicate: P) -> Scalar<Self, Any<Fallible<P>>>
  where
    P: FnMut(&Self::Item) -> Result<bool, Self::Err>,
  {
    Scalar::new(self, Any::new(Fallible(predicate)))
  }

  /// `false` at the first element failing `predicate`.
  fn all<P>(self, predicate: P) -> Scalar<Self, All<Plain<P>>>
  where
    P: FnMut(&Self::Item) -> bool,
  {
    Scalar::new(self, All::new(Plain(predicate)))
  }

  fn try_all<P>(self, predicate: P) -> Scalar<Self, All<Fallible<P>>>
  where
    P: FnMut(&Self::Item) -> Result<bool, Self::Err>,
  {
    Scalar::new(self, All::new(Fallible(predicate)))
  }

  #[allow(clippy::type_complexity)]
  fn contains(
    self, value: Self::Item,
  ) -> Scalar<Self, Contains<Self::Item, Plain<fn(&Self::Item, &Self::Item) -> bool>>>
  where
    Self::Item: PartialEq,
  {
    let eq: fn(&Self::Item, &Self::Item) -> bool = PartialEq::eq;
    Scalar::new(self, Contains::new(value, Plain(eq)))
  }

  /// Like [`contains`](Observable::contains) with a custom equality.
  fn contains_by<T, F>(self, value: T, eq: F) -> Scalar<Self, Contains<T, Plain<F>>>
  where
    F: FnMut(&Self::Item, &T) -> bool,
  {
    Scalar::new(self, Contains::new(value, Plain(eq)))
  }

  fn try_contains_by<T, F>(self, value: T, eq: F) -> Scalar<Self, Contains<T, Fallible<F>>>
  where
    F: FnMut(&Self::Item, &T) -> Result<bool, Self::Err>,
  {
    Scalar::new(self, Contains::new(value, Fallible(eq)))
  }

  /// `true` if the source completes without emitting.
  fn is_empty(self) -> Scalar<Self, IsEmpty> { Scalar::new(self, IsEmpty) }

  // ==================== Element selection ====================

  fn first(self) -> Scalar<Self, First<Require>>
  where
    Self::Err: From<RxError>,
  {
    Scalar::new(self, First::new(Require(RxError::NoElements)))
  }

  fn first_or_default(self) -> Scalar<Self, First<OrDefault>>
  where
    Self::Item: Default,
  {
    Scalar::new(self, First::new(OrDefault))
  }

  fn last(self) -> Scalar<Self, Last<Self::Item, Require>>
  where
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Last::new(Require(RxError::NoElements)))
  }

  fn last_or_default(self) -> Scalar<Self, Last<Self::Item, OrDefault>>
  where
    Self::Item: Default,
  {
    Scalar::new(self, Last::new(OrDefault))
  }

  /// The only element; `MoreThanOneElement` as soon as a second one arrives.
  fn single(self) -> Scalar<Self, Single<Self::Item, Require>>
  where
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Single::new(Require(RxError::NoElements)))
  }

  /// Like [`single`](Observable::single), but an empty source yields the
  /// default value. A second element is still an error.
  fn single_or_default(self) -> Scalar<Self, Single<Self::Item, OrDefault>>
  where
    Self::Item: Default,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, Single::new(OrDefault))
  }

  /// The element at zero-based `index`; `ArgumentOutOfRange` if the source
  /// completes first.
  fn element_at(self, index: usize) -> Scalar<Self, ElementAt<Require>>
  where
    Self::Err: From<RxError>,
  {
    Scalar::new(self, ElementAt::new(index, Require(RxError::ArgumentOutOfRange { index })))
  }

  fn element_at_or_default(self, index: usize) -> Scalar<Self, ElementAt<OrDefault>>
  where
    Self::Item: Default,
  {
    Scalar::new(self, ElementAt::new(index, OrDefault))
  }

  // ==================== Collections ====================

  fn to_vec(self) -> Scalar<Self, ToVec<Self::Item>> { Scalar::new(self, ToVec::default()) }

  /// Collect into a map keyed by `key`; a repeated key fails with
  /// `DuplicateKey`.
  #[allow(clippy::type_complexity)]
  fn to_map<K, KF>(
    self, key: KF,
  ) -> Scalar<Self, ToMap<K, Self::Item, Plain<KF>, Plain<fn(Self::Item) -> Self::Item>>>
  where
    K: Eq + Hash,
    KF: FnMut(&Self::Item) -> K,
    Self::Err: From<RxError>,
  {
    let identity: fn(Self::Item) -> Self::Item = std::convert::identity;
    Scalar::new(self, ToMap::new(Plain(key), Plain(identity)))
  }

  #[allow(clippy::type_complexity)]
  fn try_to_map<K, KF>(
    self, key: KF,
  ) -> Scalar<Self, ToMap<K, Self::Item, Fallible<KF>, Plain<fn(Self::Item) -> Self::Item>>>
  where
    K: Eq + Hash,
    KF: FnMut(&Self::Item) -> Result<K, Self::Err>,
    Self::Err: From<RxError>,
  {
    let identity: fn(Self::Item) -> Self::Item = std::convert::identity;
    Scalar::new(self, ToMap::new(Fallible(key), Plain(identity)))
  }

  /// Like [`to_map`](Observable::to_map) with the stored value mapped by
  /// `element`.
  #[allow(clippy::type_complexity)]
  fn to_map_with<K, V, KF, VF>(
    self, key: KF, element: VF,
  ) -> Scalar<Self, ToMap<K, V, Plain<KF>, Plain<VF>>>
  where
    K: Eq + Hash,
    KF: FnMut(&Self::Item) -> K,
    VF: FnMut(Self::Item) -> V,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, ToMap::new(Plain(key), Plain(element)))
  }

  #[allow(clippy::type_complexity)]
  fn try_to_map_with<K, V, KF, VF>(
    self, key: KF, element: VF,
  ) -> Scalar<Self, ToMap<K, V, Fallible<KF>, Fallible<VF>>>
  where
    K: Eq + Hash,
    KF: FnMut(&Self::Item) -> Result<K, Self::Err>,
    VF: FnMut(Self::Item) -> Result<V, Self::Err>,
    Self::Err: From<RxError>,
  {
    Scalar::new(self, ToMap::new(Fallible(key), Fallible(element)))
  }

  /// Group the elements by `key`, keeping encounter order inside each group.
  fn to_lookup<K, KF>(self, key: KF) -> Scalar<Self, ToLookup<K, Self::Item, Plain<KF>>>
  where
    K: Eq + Hash,
    KF: FnMut(&Self::Item) -> K,
  {
    Scalar::new(self, ToLookup::new(Plain(key)))
  }

  fn try_to_lookup<K, KF>(self, key: KF) -> Scalar<Self, ToLookup<K, Self::Item, Fallible<KF>>>
  where
    K: Eq + Hash,
    KF: FnMut(&Self::Item) -> Result<K, Self::Err>,
  {
    Scalar::new(self, ToLookup::new(Fallible(key)))
  }

  // ==================== SequenceEqual ====================

  /// `true` if both sources emit equal elements in the same order and then
  /// complete.
  #[allow(clippy::type_complexity)]
  fn sequence_equal<S>(
    self, other: S,
  ) -> SequenceEqual<Self, S, Plain<fn(&Self::Item, &Self::Item) -> bool>>
  where
    S: ObservableType<Item = Self::Item, Err = Self::Err>,
    Self::Item: PartialEq,
  {
    let eq: fn(&Self::Item, &Self::Item) -> bool = PartialEq::eq;
    SequenceEqual::new(self, other, Plain(eq))
  }

  fn sequence_equal_by<S, F>(self, other: S, eq: F) -> SequenceEqual<Self, S, Plain<F>>
  where
    S: ObservableType<Err = Self::Err>,
    F: FnMut(&Self::Item, &S::Item) -> bool,
  {
    SequenceEqual::new(self, other, Plain(eq))
  }

  /// [`sequence_equal_by`](Observable::sequence_equal_by) with a fallible
  /// comparer; its `Err` releases both sources and is delivered downstream.
  fn try_sequence_equal_by<S, F>(self, other: S, eq: F) -> SequenceEqual<Self, S, Fallible<F>>
  where
    S: ObservableType<Err = Self::Err>,
    F: FnMut(&Self::Item, &S::Item) -> Result<bool, Self::Err>,
  {
    SequenceEqual::new(self, other, Fallible(eq))
  }
}

impl<T: ObservableType> Observable for T {}
