//! Subscriptions: the handles that release work on cancellation.
//!
//! A [`Subscription`] is returned by every `subscribe` call. Unsubscribing
//! guarantees that no new notification starts delivery once the call returns;
//! a notification already in flight may still finish.
//!
//! - [`SubscriptionHandle`] is the shared, idempotent, composable form. It is
//!   what operators return and what they use to hold their upstream.
//! - [`BoxedSubscription`] erases the concrete type so heterogeneous
//!   subscriptions can be stored together.
//! - [`SubscriptionGuard`] unsubscribes on drop.

mod boxed;
mod handle;

pub use boxed::*;
pub use handle::*;

/// A cancellable binding between an observable and an observer.
pub trait Subscription {
  /// Stop any further notification from starting.
  fn unsubscribe(self);

  /// Whether the subscription has been released (or never held anything).
  fn is_closed(&self) -> bool;
}

/// The unit subscription owns nothing, so it is always closed.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<S: Subscription> Subscription for Option<S> {
  fn unsubscribe(self) {
    if let Some(inner) = self {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().is_none_or(Subscription::is_closed) }
}

/// Runs a closure on unsubscribe.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// let sub = ClosureSubscription(|| println!("released"));
/// sub.unsubscribe();
/// ```
pub struct ClosureSubscription<F>(pub F);

impl<F: FnOnce()> Subscription for ClosureSubscription<F> {
  #[inline]
  fn unsubscribe(self) { (self.0)() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// An RAII wrapper: the subscription is released when the guard is dropped.
///
/// If you don't bind the guard to a variable, it is dropped (and the
/// subscription released) immediately.
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(Option<T>);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(Some(subscription)) }

  /// Gives the subscription back without releasing it.
  pub fn into_inner(mut self) -> Option<T> { self.0.take() }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) {
    if let Some(subscription) = self.0.take() {
      subscription.unsubscribe();
    }
  }
}
