//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).
//!
//! # Protocol
//!
//! An observer receives zero or more `next` calls, optionally followed by
//! exactly one of `error` or `complete`. Both terminal methods consume the
//! observer, so an owned observer cannot be notified after it terminated.
//! Shared forms (`Option<O>`, [`SerializedObserver`], subjects) take the
//! inner observer on the terminal call and ignore whatever arrives later.
//!
//! A panic raised by a handler is never swallowed: it unwinds into the code
//! that delivered the notification.

mod serialized;

use std::{
  convert::Infallible,
  sync::{Arc, Mutex, PoisonError},
};

pub use serialized::SerializedObserver;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable.
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable
  ///
  /// This consumes the observer, as no more values can be emitted after an
  /// error
  fn error(self, err: Err);

  /// Handle completion of the observable
  ///
  /// This consumes the observer, as no more values can be emitted after
  /// completion
  fn complete(self);

  /// Checks if the observer is closed.
  ///
  /// Sources (like `from_iter`) use this to stop emitting early once a
  /// downstream operator has its result or has been disposed.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// Emitter Trait
// ============================================================================

/// A trait for emitting items to an Observer via mutable reference.
///
/// Unlike `Observer`, `Emitter` takes `&mut self` for all methods, which
/// keeps it object safe: `create` hands its closure a `&mut dyn Emitter`
/// without leaking the concrete downstream observer type into the source.
/// Calls after a terminal notification are ignored.
pub trait Emitter<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: Err);
  fn complete(&mut self);
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Helper trait to enable object-safe Observers (Box<dyn Observer>)
///
/// Standard Observer trait is not object-safe because the terminal methods
/// take `self` by value. DynObserver mirrors the interface for vtables.
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { self.error(err); }
  fn box_complete(self: Box<Self>) { self.complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// Boxed observer usable from any thread.
pub type BoxedObserver<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + Send + 'a>;

impl<'a, Item, Err> Observer<Item, Err> for BoxedObserver<'a, Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// FnMutObserver - Closure adapter
// ============================================================================

/// Closure adapter used by `Observable::subscribe`.
///
/// The closure becomes the `next` handler. The error type is `Infallible`, so
/// a stream that can fail must handle its errors first (see `on_error`).
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item> Observer<Item, Infallible> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, v: Item) { (self.0)(v); }

  #[inline]
  fn error(self, _err: Infallible) {}

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// Observer implementations for Option and shared Option wrappers
// ============================================================================

/// Option observer - None ignores all events, Some delegates to inner
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().is_none_or(Observer::<Item, Err>::is_closed) }
}

/// Shared observer slot: the first terminal call takes the inner observer, so
/// every clone turns inert together.
///
/// The slot is locked while the inner handler runs, so a handler must not
/// notify the same slot again. Use [`SerializedObserver`] when it might.
impl<O, Item, Err> Observer<Item, Err> for Arc<Mutex<Option<O>>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let mut inner = self.lock().unwrap_or_else(PoisonError::into_inner);
    Observer::<Item, Err>::next(&mut *inner, value);
  }

  fn error(self, err: Err) {
    let inner = self.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(inner) = inner {
      inner.error(err);
    }
  }

  fn complete(self) {
    let inner = self.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(inner) = inner {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool {
    let inner = self.lock().unwrap_or_else(PoisonError::into_inner);
    Observer::<Item, Err>::is_closed(&*inner)
  }
}

// ============================================================================
// Tests
// ============================================================================
