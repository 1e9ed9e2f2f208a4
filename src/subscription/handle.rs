use std::{
  fmt::{Debug, Formatter},
  mem,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use smallvec::SmallVec;

use super::{BoxedSubscription, Subscription};

/// A shared, idempotent, composite subscription.
///
/// Clones refer to the same handle. Teardowns added with [`add`] are released
/// exactly once, the first time any clone is disposed; a teardown added after
/// that is released on the spot.
///
/// Operators return a handle to their caller and keep a clone for
/// themselves, which lets them drop their upstream early (for example `any`
/// on its first match) even when the upstream subscription only becomes
/// available after a synchronous source has already finished emitting.
///
/// [`add`]: SubscriptionHandle::add
#[derive(Clone, Default)]
pub struct SubscriptionHandle(Arc<Mutex<Inner>>);

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[BoxedSubscription; 1]>,
}

impl SubscriptionHandle {
  pub fn new() -> Self { Self::default() }

  /// Register a teardown released together with this handle.
  pub fn add(&self, subscription: impl Subscription + Send + 'static) {
    let mut inner = self.lock();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
    } else {
      inner.teardown.retain(|v| !v.is_closed());
      inner.teardown.push(BoxedSubscription::new(subscription));
    }
  }

  /// Release every teardown. Calls after the first are no-ops.
  ///
  /// The teardowns run after the internal lock is released, so they may call
  /// back into this handle.
  pub fn dispose(&self) {
    let teardown = {
      let mut inner = self.lock();
      if inner.closed {
        return;
      }
      inner.closed = true;
      mem::take(&mut inner.teardown)
    };
    for subscription in teardown {
      subscription.unsubscribe();
    }
  }

  #[inline]
  pub fn is_closed(&self) -> bool { self.lock().closed }

  /// Number of live teardowns currently held.
  pub fn teardown_size(&self) -> usize { self.lock().teardown.len() }

  fn lock(&self) -> MutexGuard<'_, Inner> { self.0.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl Subscription for SubscriptionHandle {
  #[inline]
  fn unsubscribe(self) { self.dispose() }

  #[inline]
  fn is_closed(&self) -> bool { SubscriptionHandle::is_closed(self) }
}

impl Debug for SubscriptionHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.lock();
    f.debug_struct("SubscriptionHandle")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}
