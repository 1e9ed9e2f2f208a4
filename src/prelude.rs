//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  error::RxError,
  lock::SequentialLock,
  notification::{Notification, Recorder},
  observable::{self, CoreObservable, Observable, ObservableType},
  observer::{BoxedObserver, Emitter, FnMutObserver, Observer, SerializedObserver},
  ops::{
    average::Averageable,
    into_future::ObservableFuture,
    minmax::Extremum,
    scalar::{Fallback, OrDefault, Require, Scalar, ScalarStrategy, Step},
    sum::CheckedSum,
  },
  scheduler::{Duration, ImmediateScheduler, Scheduler, TaskHandle, TestScheduler, ThreadScheduler},
  subject::{Subject, SubjectSubscription},
  subscription::*,
};

#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
