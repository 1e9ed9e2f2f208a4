//! # rxcore: the serialization and protocol core of Reactive Extensions
//!
//! A [`SequentialLock`] that serializes work without blocking, the
//! [`Observer`]/[`Observable`] protocol built on it, and the operators that
//! reduce a sequence to a single value.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxcore::prelude::*;
//!
//! let recorder = Recorder::<Vec<(i32, char)>, RxError>::new();
//! observable::from_iter([(3, 'a'), (2, 'b'), (3, 'c'), (2, 'd'), (4, 'e'), (4, 'f')])
//!   .max_by(|v| v.0)
//!   .subscribe_with(recorder.clone());
//!
//! assert_eq!(recorder.values(), vec![vec![(4, 'e'), (4, 'f')]]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SequentialLock`] | FIFO, reentrant, fault-latching work queue |
//! | [`Observable`] | The extension trait carrying `subscribe` and the operators |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Subject`] | A hot, multicasting source that is also an observer |
//!
//! ## Feature Flags
//!
//! - **`tokio-scheduler`**: a scheduler running tasks on a Tokio runtime
//!
//! [`SequentialLock`]: lock::SequentialLock
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject

pub mod error;
pub mod lock;
pub mod notification;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod subject;
pub mod subscription;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
